//! Graph traversal: ancestry, causal chains, shortest paths, cycles and statistics.
//!
//! Every operation tolerates dangling references, self-loops, cycles and
//! disconnected components. Unknown ids produce empty results.

use crate::entry::LogEntry;
use crate::error::{LeanLogError, Result};
use crate::graph::{CausalGraph, Direction};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet, VecDeque};

/// DFS marking for cycle searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Aggregate metrics over a causal graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    /// Number of entries.
    pub total_nodes: usize,
    /// Declared links divided by two.
    ///
    /// Exact only when every relation is declared on both sides (`causeIds` on
    /// the effect and `effectIds` on the cause); asymmetric declarations make
    /// this an approximation.
    pub total_edges: f64,
    /// Whether following `causeIds` can revisit a node.
    pub has_cycles: bool,
    /// Number of cycle groups, self-loops included.
    pub cycles_count: usize,
    /// Highest per-node count of declared links.
    pub max_degree: usize,
    /// Mean per-node count of declared links, rounded to two decimals.
    pub avg_degree: f64,
}

impl GraphStatistics {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LeanLogError::Serialization(e.to_string()))
    }
}

/// Traversal engine over an entry collection and its causal graph.
///
/// Results are references into the collection. Lookups by id resolve to the
/// first entry carrying that id.
///
/// # Examples
///
/// ```
/// use leanlog_core::{EntryDraft, Traversal};
///
/// let entries = vec![
///     EntryDraft::new("Crash", "App crashes").id("1").build().unwrap(),
///     EntryDraft::new("Debug", "Read logs").id("2").cause_ids("1").build().unwrap(),
///     EntryDraft::new("Fix", "Patch it").id("3").cause_ids("2").build().unwrap(),
/// ];
///
/// let traversal = Traversal::new(&entries);
/// let ids: Vec<&str> = traversal.ancestors("3").iter().map(|e| e.id.as_str()).collect();
/// assert_eq!(ids, vec!["2", "1"]);
/// assert!(!traversal.has_cycles());
/// ```
#[derive(Debug, Clone)]
pub struct Traversal<'e> {
    entries: &'e [LogEntry],
    graph: Cow<'e, CausalGraph>,
    positions: HashMap<&'e str, usize>,
}

impl<'e> Traversal<'e> {
    /// Build a traversal engine, constructing the graph from `entries`.
    pub fn new(entries: &'e [LogEntry]) -> Self {
        Self::from_parts(entries, Cow::Owned(CausalGraph::build(entries)))
    }

    /// Reuse a graph already built from the same `entries`.
    pub fn with_graph(entries: &'e [LogEntry], graph: &'e CausalGraph) -> Self {
        Self::from_parts(entries, Cow::Borrowed(graph))
    }

    fn from_parts(entries: &'e [LogEntry], graph: Cow<'e, CausalGraph>) -> Self {
        let mut positions = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            positions.entry(entry.id.as_str()).or_insert(position);
        }
        Self {
            entries,
            graph,
            positions,
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &CausalGraph {
        &self.graph
    }

    /// Entry with the given id.
    pub fn entry(&self, id: &str) -> Option<&'e LogEntry> {
        self.positions.get(id).map(|&position| &self.entries[position])
    }

    fn resolve(&self, positions: &[usize]) -> Vec<&'e LogEntry> {
        positions.iter().map(|&p| &self.entries[p]).collect()
    }

    /// Positions of entries reachable from `id` in `direction`, in pre-order.
    ///
    /// Dangling ids are dropped.
    pub(crate) fn reachable_positions(&self, id: &str, direction: Direction) -> Vec<usize> {
        self.graph
            .walk(id, direction)
            .into_iter()
            .filter_map(|reached| self.positions.get(reached).copied())
            .collect()
    }

    /// Every entry reachable through `causeIds`, in first-visit order.
    pub fn ancestors(&self, id: &str) -> Vec<&'e LogEntry> {
        self.resolve(&self.reachable_positions(id, Direction::Causes))
    }

    /// Every entry reachable through `effectIds`, in first-visit order.
    pub fn descendants(&self, id: &str) -> Vec<&'e LogEntry> {
        self.resolve(&self.reachable_positions(id, Direction::Effects))
    }

    /// Ancestors earliest-first, then the entry itself, then descendants.
    ///
    /// Empty when `id` has no entry.
    pub fn causal_chain(&self, id: &str) -> Vec<&'e LogEntry> {
        let Some(subject) = self.entry(id) else {
            return Vec::new();
        };

        let mut chain = self.ancestors(id);
        chain.reverse();
        chain.push(subject);
        chain.extend(self.descendants(id));
        chain
    }

    /// Shortest path from `from` to `to`, both inclusive, treating declared
    /// causes and effects of each node as undirected hops.
    ///
    /// Empty when either endpoint has no entry or no path exists. A path from
    /// an entry to itself is that single entry.
    pub fn shortest_path(&self, from: &str, to: &str) -> Vec<&'e LogEntry> {
        if !self.graph.contains(from) || !self.graph.contains(to) {
            return Vec::new();
        }

        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(id) = queue.pop_front() {
            if id == to {
                let mut path = vec![id];
                let mut current = id;
                while let Some(&parent) = parents.get(current) {
                    path.push(parent);
                    current = parent;
                }
                path.reverse();
                return path.into_iter().filter_map(|id| self.entry(id)).collect();
            }

            let Some(links) = self.graph.get(id) else {
                continue;
            };
            for neighbor in links.neighbors() {
                if visited.insert(neighbor) {
                    parents.insert(neighbor, id);
                    queue.push_back(neighbor);
                }
            }
        }

        Vec::new()
    }

    /// Whether following `causeIds` from any entry revisits a node on the
    /// current path. Self-references count.
    pub fn has_cycles(&self) -> bool {
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        self.graph
            .ids()
            .any(|root| !marks.contains_key(root) && self.closes_loop_from(root, &mut marks))
    }

    /// Iterative gray/black DFS along `causeIds` from `root`. True as soon as a
    /// link points back into the current path.
    fn closes_loop_from<'g>(&'g self, root: &'g str, marks: &mut HashMap<&'g str, Mark>) -> bool {
        let mut path: Vec<&str> = vec![root];
        let mut cursors: Vec<usize> = vec![0];
        marks.insert(root, Mark::OnPath);

        while let Some(&id) = path.last() {
            let depth = path.len() - 1;
            let Some(target) = self.graph.links(id, Direction::Causes).get(cursors[depth]) else {
                marks.insert(id, Mark::Done);
                path.pop();
                cursors.pop();
                continue;
            };
            cursors[depth] += 1;

            let target = target.as_str();
            match marks.get(target) {
                Some(Mark::OnPath) => return true,
                Some(Mark::Done) => {}
                None => {
                    marks.insert(target, Mark::OnPath);
                    path.push(target);
                    cursors.push(0);
                }
            }
        }

        false
    }

    /// Groups of entries that form a `causeIds` cycle.
    ///
    /// Self-loops come first as singleton groups, in collection order. Longer
    /// cycles follow in discovery order, each reported once per distinct member
    /// set with members ordered by id. Cycles sharing nodes are reported
    /// separately.
    pub fn cycle_components(&self) -> Vec<Vec<&'e LogEntry>> {
        let mut components: Vec<Vec<&'e LogEntry>> = self
            .graph
            .iter()
            .filter(|(id, links)| links.causes.iter().any(|cause| cause.as_str() == *id))
            .filter_map(|(id, _)| self.entry(id))
            .map(|entry| vec![entry])
            .collect();

        components.extend(self.loop_member_sets().into_iter().map(|members| {
            members
                .into_iter()
                .filter_map(|id| self.entry(id))
                .collect::<Vec<_>>()
        }));
        components
    }

    /// Distinct multi-node loops along `causeIds`, as sorted member lists.
    ///
    /// Every simple path from a root is explored. Once a root is finished, the
    /// members of every loop found so far are neither used as roots nor
    /// entered again.
    fn loop_member_sets(&self) -> Vec<Vec<&str>> {
        let mut settled: HashSet<&str> = HashSet::new();
        let mut seen: HashSet<Vec<&str>> = HashSet::new();
        let mut loops: Vec<Vec<&str>> = Vec::new();

        for root in self.graph.ids() {
            if settled.contains(root) {
                continue;
            }

            let mut found = Vec::new();
            self.collect_loops(root, &settled, &mut found);

            for members in found {
                settled.extend(members.iter().copied());
                if members.len() > 1 && seen.insert(members.clone()) {
                    loops.push(members);
                }
            }
        }

        loops
    }

    /// Simple-path DFS along `causeIds` from `root`, skipping `settled` nodes.
    ///
    /// Each link back into the current path pushes the looping slice of the
    /// path, sorted, onto `found`. A node may be entered once per distinct path
    /// reaching it.
    fn collect_loops<'g>(
        &'g self,
        root: &'g str,
        settled: &HashSet<&str>,
        found: &mut Vec<Vec<&'g str>>,
    ) {
        let mut path: Vec<&'g str> = vec![root];
        let mut cursors: Vec<usize> = vec![0];
        let mut on_path: HashMap<&'g str, usize> = HashMap::from([(root, 0)]);

        while let Some(&id) = path.last() {
            let depth = path.len() - 1;
            let Some(target) = self.graph.links(id, Direction::Causes).get(cursors[depth]) else {
                on_path.remove(id);
                path.pop();
                cursors.pop();
                continue;
            };
            cursors[depth] += 1;

            let target = target.as_str();
            if let Some(&start) = on_path.get(target) {
                let mut members = path[start..].to_vec();
                members.sort_unstable();
                found.push(members);
            } else if !settled.contains(target) {
                on_path.insert(target, path.len());
                path.push(target);
                cursors.push(0);
            }
        }
    }

    /// Node, edge, cycle and degree metrics for the graph.
    pub fn statistics(&self) -> GraphStatistics {
        let declared = self.graph.declared_link_count();
        let node_count = self.graph.node_count();
        let max_degree = self
            .graph
            .iter()
            .map(|(_, links)| links.degree())
            .max()
            .unwrap_or(0);
        let avg_degree = if node_count > 0 {
            declared as f64 / node_count as f64
        } else {
            0.0
        };

        GraphStatistics {
            total_nodes: self.entries.len(),
            total_edges: declared as f64 / 2.0,
            has_cycles: self.has_cycles(),
            cycles_count: self.cycle_components().len(),
            max_degree,
            avg_degree: (avg_degree * 100.0).round() / 100.0,
        }
    }
}

/// Entries reachable from `id` through `causeIds`.
pub fn ancestors<'e>(entries: &'e [LogEntry], id: &str) -> Vec<&'e LogEntry> {
    Traversal::new(entries).ancestors(id)
}

/// Entries reachable from `id` through `effectIds`.
pub fn descendants<'e>(entries: &'e [LogEntry], id: &str) -> Vec<&'e LogEntry> {
    Traversal::new(entries).descendants(id)
}

/// Ancestors earliest-first, the entry itself, then descendants.
pub fn causal_chain<'e>(entries: &'e [LogEntry], id: &str) -> Vec<&'e LogEntry> {
    Traversal::new(entries).causal_chain(id)
}

/// Shortest undirected path between two entries.
pub fn shortest_path<'e>(entries: &'e [LogEntry], from: &str, to: &str) -> Vec<&'e LogEntry> {
    Traversal::new(entries).shortest_path(from, to)
}

/// Whether the `causeIds` graph contains a cycle.
pub fn has_cycles(entries: &[LogEntry]) -> bool {
    Traversal::new(entries).has_cycles()
}

/// Self-loops and distinct multi-entry cycles along `causeIds`.
pub fn strongly_connected_components(entries: &[LogEntry]) -> Vec<Vec<&LogEntry>> {
    Traversal::new(entries).cycle_components()
}

/// Aggregate graph metrics.
pub fn graph_statistics(entries: &[LogEntry]) -> GraphStatistics {
    Traversal::new(entries).statistics()
}
