//! Reasoning search: text matches widened with their causal context.

use crate::entry::LogEntry;
use crate::graph::Direction;
use crate::query::matching_positions;
use crate::traversal::Traversal;
use std::collections::HashSet;
use tracing::debug;

/// Direct matches for `query`, followed by the first `max_depth` ancestors and
/// first `max_depth` descendants of each match.
///
/// Direct matches use the substring rule of [`crate::search_entries`].
/// `max_depth` truncates each already computed ancestor or descendant list; it
/// does not bound hop distance. Every entry appears once, matches first, then
/// context in the order it was added.
///
/// ```
/// use leanlog_core::{reasoning_search, EntryDraft};
///
/// let entries = vec![
///     EntryDraft::new("Outage", "Database down").id("1").effect_ids("2").build().unwrap(),
///     EntryDraft::new("Fix", "Restart database").id("2").cause_ids("1").build().unwrap(),
/// ];
///
/// let ids: Vec<&str> = reasoning_search(&entries, "fix", 3)
///     .iter()
///     .map(|e| e.id.as_str())
///     .collect();
/// assert_eq!(ids, vec!["2", "1"]);
/// ```
pub fn reasoning_search<'e>(
    entries: &'e [LogEntry],
    query: &str,
    max_depth: usize,
) -> Vec<&'e LogEntry> {
    reasoning_with(&Traversal::new(entries), entries, query, max_depth)
}

/// Reasoning search over a traversal engine built from `entries`.
pub(crate) fn reasoning_with<'e>(
    traversal: &Traversal<'e>,
    entries: &'e [LogEntry],
    query: &str,
    max_depth: usize,
) -> Vec<&'e LogEntry> {
    let matches = matching_positions(entries, query);
    let mut seen: HashSet<usize> = matches.iter().copied().collect();
    let mut positions = matches.clone();

    for &position in &matches {
        let id = entries[position].id.as_str();
        for direction in [Direction::Causes, Direction::Effects] {
            for context in traversal
                .reachable_positions(id, direction)
                .into_iter()
                .take(max_depth)
            {
                if seen.insert(context) {
                    positions.push(context);
                }
            }
        }
    }

    debug!(
        query,
        max_depth,
        matches = matches.len(),
        results = positions.len(),
        "reasoning search"
    );
    positions.into_iter().map(|position| &entries[position]).collect()
}
