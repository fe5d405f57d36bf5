//! Rebuildable combined index for fast lookups.
//!
//! [`LogIndex`] owns an entry collection together with a [`SearchIndex`] and a
//! [`GraphIndex`] derived from it. Derived structures are never patched in
//! place: any change to the collection goes through [`LogIndex::rebuild`].

use crate::config::QueryConfig;
use crate::entry::LogEntry;
use crate::error::{LeanLogError, Result};
use crate::graph::{CausalGraph, Direction};
use crate::query::last_n_entries;
use crate::reasoning::reasoning_with;
use crate::search::{Field, SearchIndex};
use crate::traversal::Traversal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Causal graph with ancestors and descendants precomputed for every node.
///
/// Cached lists hold entry positions in the collection the index was built
/// from.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    graph: CausalGraph,
    ancestors: HashMap<String, Vec<usize>>,
    descendants: HashMap<String, Vec<usize>>,
}

impl GraphIndex {
    /// Build the graph and run one ancestor and one descendant walk per node.
    pub fn build(entries: &[LogEntry]) -> Self {
        let graph = CausalGraph::build(entries);
        let (ancestors, descendants) = {
            let traversal = Traversal::with_graph(entries, &graph);
            let mut ancestors = HashMap::with_capacity(graph.node_count());
            let mut descendants = HashMap::with_capacity(graph.node_count());
            for id in graph.ids() {
                ancestors.insert(
                    id.to_string(),
                    traversal.reachable_positions(id, Direction::Causes),
                );
                descendants.insert(
                    id.to_string(),
                    traversal.reachable_positions(id, Direction::Effects),
                );
            }
            (ancestors, descendants)
        };

        debug!(
            nodes = graph.node_count(),
            cached = ancestors.len(),
            "built graph index"
        );
        Self {
            graph,
            ancestors,
            descendants,
        }
    }

    pub fn graph(&self) -> &CausalGraph {
        &self.graph
    }

    /// Cached ancestor positions of `id` (empty for unknown ids).
    pub fn ancestor_positions(&self, id: &str) -> &[usize] {
        self.ancestors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cached descendant positions of `id` (empty for unknown ids).
    pub fn descendant_positions(&self, id: &str) -> &[usize] {
        self.descendants.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of nodes with a cached ancestor list.
    pub fn ancestors_cached(&self) -> usize {
        self.ancestors.len()
    }

    /// Number of nodes with a cached descendant list.
    pub fn descendants_cached(&self) -> usize {
        self.descendants.len()
    }
}

/// Size and cache-population counts of a [`LogIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatistics {
    pub total_entries: usize,
    pub name_tokens: usize,
    pub problem_tokens: usize,
    pub solution_tokens: usize,
    pub tags: usize,
    pub files: usize,
    pub tech_stack: usize,
    pub graph_nodes: usize,
    pub ancestors_cached: usize,
    pub descendants_cached: usize,
}

impl IndexStatistics {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LeanLogError::Serialization(e.to_string()))
    }
}

/// Entry collection with its search and graph indexes.
///
/// # Examples
///
/// ```
/// use leanlog_core::{EntryDraft, LogIndex};
///
/// let entries = vec![
///     EntryDraft::new("Login fails", "Token expired").id("1").effect_ids("2").build().unwrap(),
///     EntryDraft::new("Refresh tokens", "Token refresh missing").id("2").cause_ids("1").build().unwrap(),
/// ];
///
/// let index = LogIndex::build(entries);
/// let chain: Vec<&str> = index.causal_chain("2").iter().map(|e| e.id.as_str()).collect();
/// assert_eq!(chain, vec!["1", "2"]);
/// assert_eq!(index.search("token").len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogIndex {
    entries: Vec<LogEntry>,
    search: SearchIndex,
    graph: GraphIndex,
    config: QueryConfig,
}

impl LogIndex {
    /// Index `entries` with default query settings.
    pub fn build(entries: Vec<LogEntry>) -> Self {
        Self::with_config(entries, QueryConfig::default())
    }

    /// Index `entries` with the given query settings.
    pub fn with_config(entries: Vec<LogEntry>, config: QueryConfig) -> Self {
        let search = SearchIndex::build(&entries);
        let graph = GraphIndex::build(&entries);
        debug!(entries = entries.len(), "built log index");
        Self {
            entries,
            search,
            graph,
            config,
        }
    }

    /// Replace the collection and rebuild every index from scratch.
    pub fn rebuild(&mut self, entries: Vec<LogEntry>) {
        *self = Self::with_config(entries, self.config);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Give the collection back, dropping the indexes.
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    pub fn graph_index(&self) -> &GraphIndex {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with `id` (the first one when ids repeat).
    pub fn get(&self, id: &str) -> Option<&LogEntry> {
        self.search.get(&self.entries, id)
    }

    fn resolve(&self, positions: &[usize]) -> Vec<&LogEntry> {
        positions
            .iter()
            .filter_map(|&position| self.entries.get(position))
            .collect()
    }

    /// Token search across all indexed fields.
    pub fn search(&self, query: &str) -> Vec<&LogEntry> {
        self.search.search(&self.entries, query)
    }

    /// Token search capped at the configured `search_limit`.
    pub fn top_matches(&self, query: &str) -> Vec<&LogEntry> {
        let mut results = self.search(query);
        results.truncate(self.config.search_limit);
        results
    }

    /// Entries carrying any of `tags` (case-insensitive).
    pub fn filter_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&LogEntry> {
        self.search.filter_by_tags(&self.entries, tags)
    }

    /// Cached ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: &str) -> Vec<&LogEntry> {
        self.resolve(self.graph.ancestor_positions(id))
    }

    /// Cached descendants of `id`, nearest first.
    pub fn descendants(&self, id: &str) -> Vec<&LogEntry> {
        self.resolve(self.graph.descendant_positions(id))
    }

    /// Ancestors earliest-first, the entry itself, then descendants, from the
    /// caches. Same ordering as [`Traversal::causal_chain`].
    pub fn causal_chain(&self, id: &str) -> Vec<&LogEntry> {
        let Some(subject) = self.get(id) else {
            return Vec::new();
        };

        let mut chain = self.ancestors(id);
        chain.reverse();
        chain.push(subject);
        chain.extend(self.descendants(id));
        chain
    }

    /// Traversal engine over the cached graph.
    pub fn traversal(&self) -> Traversal<'_> {
        Traversal::with_graph(&self.entries, self.graph.graph())
    }

    /// Reasoning search with an explicit depth.
    pub fn reasoning_search(&self, query: &str, max_depth: usize) -> Vec<&LogEntry> {
        reasoning_with(&self.traversal(), &self.entries, query, max_depth)
    }

    /// Reasoning search with the configured `reasoning_depth`.
    pub fn reasoning(&self, query: &str) -> Vec<&LogEntry> {
        self.reasoning_search(query, self.config.reasoning_depth)
    }

    /// The configured number of most recent entries, newest first.
    pub fn recent(&self) -> Vec<&LogEntry> {
        last_n_entries(&self.entries, self.config.recent_limit)
    }

    pub fn statistics(&self) -> IndexStatistics {
        IndexStatistics {
            total_entries: self.entries.len(),
            name_tokens: self.search.token_count(Field::Name),
            problem_tokens: self.search.token_count(Field::Problem),
            solution_tokens: self.search.token_count(Field::Solution),
            tags: self.search.token_count(Field::Tags),
            files: self.search.token_count(Field::Files),
            tech_stack: self.search.token_count(Field::TechStack),
            graph_nodes: self.graph.graph().node_count(),
            ancestors_cached: self.graph.ancestors_cached(),
            descendants_cached: self.graph.descendants_cached(),
        }
    }
}

/// Build a [`GraphIndex`] for `entries`.
pub fn build_graph_index(entries: &[LogEntry]) -> GraphIndex {
    GraphIndex::build(entries)
}

/// Build a [`LogIndex`] owning `entries`.
pub fn build_index(entries: Vec<LogEntry>) -> LogIndex {
    LogIndex::build(entries)
}

/// Rebuild `index` around a new collection, keeping its query settings.
pub fn update_index(index: LogIndex, entries: Vec<LogEntry>) -> LogIndex {
    LogIndex::with_config(entries, index.config)
}
