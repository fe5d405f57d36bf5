//! Linear queries that scan the entry collection directly.
//!
//! These need no prebuilt index and match on substrings rather than tokens.

use crate::entry::LogEntry;
use crate::error::{LeanLogError, Result};
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

/// Whether `entry` contains `needle` (already lowercased) in its name, problem,
/// solution, files or tech-stack.
fn mentions(entry: &LogEntry, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    contains(&entry.name)
        || contains(&entry.problem)
        || entry.solution.as_deref().is_some_and(contains)
        || entry.files.as_deref().is_some_and(contains)
        || entry.tech_stack.as_deref().is_some_and(contains)
}

/// Positions of entries whose text fields contain `query`, case-insensitively.
pub(crate) fn matching_positions(entries: &[LogEntry], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    let positions: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| mentions(entry, &needle))
        .map(|(position, _)| position)
        .collect();

    trace!(query, hits = positions.len(), "linear search");
    positions
}

/// Entries whose name, problem, solution, files or tech-stack contain `query`,
/// case-insensitively, in collection order.
///
/// An empty query matches every entry.
pub fn search_entries<'e>(entries: &'e [LogEntry], query: &str) -> Vec<&'e LogEntry> {
    matching_positions(entries, query)
        .into_iter()
        .map(|position| &entries[position])
        .collect()
}

/// Entries carrying at least one of `tags`.
///
/// Tags are compared exactly after trimming the entry's tag list; case matters.
pub fn filter_by_tags<'e, S: AsRef<str>>(
    entries: &'e [LogEntry],
    tags: &[S],
) -> Vec<&'e LogEntry> {
    entries
        .iter()
        .filter(|entry| {
            let own = entry.tag_list();
            tags.iter().any(|tag| own.iter().any(|t| t == tag.as_ref()))
        })
        .collect()
}

/// Entries whose name contains `task`, case-insensitively.
pub fn entries_by_task<'e>(entries: &'e [LogEntry], task: &str) -> Vec<&'e LogEntry> {
    let needle = task.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}

/// The last `n` entries, newest first.
pub fn last_n_entries(entries: &[LogEntry], n: usize) -> Vec<&LogEntry> {
    entries.iter().rev().take(n).collect()
}

/// Overview of an entry collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    pub total_entries: usize,
    /// Creation timestamp of the final entry.
    pub last_entry: Option<String>,
    /// Distinct individual tags, in first-seen order.
    pub unique_tags: Vec<String>,
}

impl LogSummary {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LeanLogError::Serialization(e.to_string()))
    }
}

/// Count entries and collect the last timestamp and distinct tags.
pub fn summarize(entries: &[LogEntry]) -> LogSummary {
    let mut seen = HashSet::new();
    let mut unique_tags = Vec::new();
    for tag in entries.iter().flat_map(LogEntry::tag_list) {
        if seen.insert(tag.clone()) {
            unique_tags.push(tag);
        }
    }

    LogSummary {
        total_entries: entries.len(),
        last_entry: entries.last().map(|entry| entry.created_at.clone()),
        unique_tags,
    }
}
