//! Causal graph construction from flat log entries.

use crate::entry::{parse_ids, LogEntry};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Which declared edge set to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow `causeIds` (towards what led to an entry).
    Causes,
    /// Follow `effectIds` (towards what an entry led to).
    Effects,
}

/// Declared causal links of a single entry.
///
/// `causes` and `effects` are independent declarations; neither is derived
/// from the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CausalLinks {
    /// Ids parsed from the entry's `causeIds` field.
    pub causes: Vec<String>,
    /// Ids parsed from the entry's `effectIds` field.
    pub effects: Vec<String>,
}

impl CausalLinks {
    /// Links in one direction.
    pub fn toward(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Causes => &self.causes,
            Direction::Effects => &self.effects,
        }
    }

    /// Number of declared links in both directions.
    pub fn degree(&self) -> usize {
        self.causes.len() + self.effects.len()
    }

    /// Causes followed by effects, ignoring direction.
    pub fn neighbors(&self) -> impl Iterator<Item = &str> {
        self.causes
            .iter()
            .chain(self.effects.iter())
            .map(String::as_str)
    }
}

/// Adjacency structure keyed by entry id.
///
/// Every entry gets a node, even without causal fields. Referenced ids that
/// have no entry of their own (dangling references) are kept in the link lists
/// but have no node.
#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    nodes: HashMap<String, CausalLinks>,
    /// Node ids in collection order.
    order: Vec<String>,
}

impl CausalGraph {
    /// Build the graph from a collection of entries.
    ///
    /// When an id occurs more than once, the first occurrence owns the node.
    pub fn build(entries: &[LogEntry]) -> Self {
        let mut nodes = HashMap::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());

        for entry in entries {
            match nodes.entry(entry.id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(CausalLinks {
                        causes: parse_ids(entry.cause_ids.as_deref()),
                        effects: parse_ids(entry.effect_ids.as_deref()),
                    });
                    order.push(entry.id.clone());
                }
                Entry::Occupied(_) => {
                    warn!(id = %entry.id, "duplicate entry id, keeping first occurrence");
                }
            }
        }

        let graph = Self { nodes, order };
        debug!(
            nodes = graph.node_count(),
            dangling = graph.dangling_references().len(),
            "built causal graph"
        );
        graph
    }

    /// Links of a node, if the id has an entry.
    pub fn get(&self, id: &str) -> Option<&CausalLinks> {
        self.nodes.get(id)
    }

    /// Whether the id has a node.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Links of a node in one direction (empty for unknown ids).
    pub fn links(&self, id: &str, direction: Direction) -> &[String] {
        self.nodes
            .get(id)
            .map(|links| links.toward(direction))
            .unwrap_or(&[])
    }

    /// Node ids in collection order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Nodes with their links, in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CausalLinks)> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|links| (id.as_str(), links)))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Sum of declared links over all nodes (causes plus effects).
    pub fn declared_link_count(&self) -> usize {
        self.nodes.values().map(CausalLinks::degree).sum()
    }

    /// Declared links whose target has no node, as `(from, missing)` pairs.
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        let nodes = &self.nodes;
        self.iter()
            .flat_map(move |(id, links)| {
                links
                    .neighbors()
                    .filter(move |target| !nodes.contains_key(*target))
                    .map(move |target| (id, target))
            })
            .collect()
    }

    /// Depth-first walk from `start` following one direction.
    ///
    /// Returns every id reached through one or more hops, each once, in
    /// pre-order. `start` itself is never part of the result, even when a
    /// cycle leads back to it. Dangling ids are reported but not expanded.
    pub fn walk<'a>(&'a self, start: &str, direction: Direction) -> Vec<&'a str> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut reached = Vec::new();

        let Some((start, links)) = self.nodes.get_key_value(start) else {
            return reached;
        };
        visited.insert(start.as_str());

        let mut stack: Vec<&str> = links
            .toward(direction)
            .iter()
            .rev()
            .map(String::as_str)
            .collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            reached.push(id);

            if let Some(links) = self.nodes.get(id) {
                stack.extend(links.toward(direction).iter().rev().map(String::as_str));
            }
        }

        reached
    }
}

/// Build a [`CausalGraph`] for `entries`.
pub fn build_graph(entries: &[LogEntry]) -> CausalGraph {
    CausalGraph::build(entries)
}
