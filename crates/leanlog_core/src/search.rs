//! Inverted search index over log entries.
//!
//! Free-text fields (name, problem, solution) are tokenized; list fields (tags,
//! files, tech-stack) are keyed by whole comma-separated pieces so that values
//! like `node.js` or `src/main.rs` stay a single key.
//!
//! The index stores entry positions, not entries. Queries take the collection
//! the index was built from and resolve positions against it.

use crate::entry::{parse_ids, LogEntry};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Minimum token length kept by [`tokenize`], exclusive.
const MIN_TOKEN_LEN: usize = 2;

/// Token (or list piece) to the positions of entries containing it.
pub type TokenIndex = HashMap<String, Vec<usize>>;

/// Indexed entry field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Problem,
    Solution,
    Tags,
    Files,
    TechStack,
}

impl Field {
    /// Every indexed field, in the order queries consult them.
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Problem,
        Field::Solution,
        Field::Tags,
        Field::Files,
        Field::TechStack,
    ];
}

/// Split free text into lowercase search tokens.
///
/// Characters other than ASCII letters, digits, `_` and whitespace act as
/// separators. Tokens of two characters or fewer are dropped.
///
/// ```
/// use leanlog_core::tokenize;
///
/// assert_eq!(tokenize("Fix bug in auth"), vec!["fix", "bug", "auth"]);
/// assert_eq!(tokenize("Node.js crashed!"), vec!["node", "crashed"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|token| token.len() > MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Lowercased, trimmed pieces of a comma-separated list field.
fn list_keys(field: Option<&str>) -> Vec<String> {
    parse_ids(field)
        .into_iter()
        .map(|piece| piece.to_lowercase())
        .collect()
}

fn insert_all(index: &mut TokenIndex, keys: Vec<String>, position: usize) {
    for key in keys {
        index.entry(key).or_default().push(position);
    }
}

/// Direct id lookup plus one inverted index per searchable field.
///
/// Per-key position lists are not de-duplicated: an entry whose field repeats a
/// token is listed once per repetition. [`SearchIndex::search`] and
/// [`SearchIndex::filter_by_tags`] de-duplicate their results.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    by_id: HashMap<String, usize>,
    by_name: TokenIndex,
    by_problem: TokenIndex,
    by_solution: TokenIndex,
    by_tags: TokenIndex,
    by_files: TokenIndex,
    by_tech_stack: TokenIndex,
    len: usize,
}

impl SearchIndex {
    /// Index a collection of entries.
    pub fn build(entries: &[LogEntry]) -> Self {
        let mut index = SearchIndex {
            len: entries.len(),
            ..Default::default()
        };

        for (position, entry) in entries.iter().enumerate() {
            match index.by_id.entry(entry.id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(_) => {
                    warn!(id = %entry.id, position, "duplicate entry id in search index");
                }
            }

            insert_all(&mut index.by_name, tokenize(&entry.name), position);
            insert_all(&mut index.by_problem, tokenize(&entry.problem), position);
            if let Some(solution) = entry.solution.as_deref() {
                insert_all(&mut index.by_solution, tokenize(solution), position);
            }
            insert_all(&mut index.by_tags, list_keys(entry.tags.as_deref()), position);
            insert_all(&mut index.by_files, list_keys(entry.files.as_deref()), position);
            insert_all(
                &mut index.by_tech_stack,
                list_keys(entry.tech_stack.as_deref()),
                position,
            );
        }

        debug!(
            entries = index.len,
            name_tokens = index.by_name.len(),
            problem_tokens = index.by_problem.len(),
            solution_tokens = index.by_solution.len(),
            tags = index.by_tags.len(),
            "built search index"
        );
        index
    }

    /// Number of entries the index was built from.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the first entry with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Entry with `id`, resolved against `entries`.
    pub fn get<'e>(&self, entries: &'e [LogEntry], id: &str) -> Option<&'e LogEntry> {
        self.position(id).and_then(|position| entries.get(position))
    }

    /// The inverted index of one field.
    pub fn field(&self, field: Field) -> &TokenIndex {
        match field {
            Field::Name => &self.by_name,
            Field::Problem => &self.by_problem,
            Field::Solution => &self.by_solution,
            Field::Tags => &self.by_tags,
            Field::Files => &self.by_files,
            Field::TechStack => &self.by_tech_stack,
        }
    }

    /// Positions listed under `key` in one field.
    pub fn lookup(&self, field: Field, key: &str) -> &[usize] {
        self.field(field).get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys in one field.
    pub fn token_count(&self, field: Field) -> usize {
        self.field(field).len()
    }

    /// Positions matching any query token in any field, de-duplicated, in
    /// discovery order.
    pub fn search_positions(&self, query: &str) -> Vec<usize> {
        let tokens = tokenize(query);
        let mut seen = HashSet::new();
        let mut positions = Vec::new();

        for token in &tokens {
            for field in Field::ALL {
                for &position in self.lookup(field, token) {
                    if seen.insert(position) {
                        positions.push(position);
                    }
                }
            }
        }

        trace!(query, tokens = tokens.len(), hits = positions.len(), "indexed search");
        positions
    }

    /// Entries matching any query token in any field.
    ///
    /// Results are in discovery order (token by token, field by field), not
    /// ranked.
    pub fn search<'e>(&self, entries: &'e [LogEntry], query: &str) -> Vec<&'e LogEntry> {
        resolve(entries, self.search_positions(query))
    }

    /// Positions of entries carrying any of `tags`, de-duplicated.
    pub fn filter_positions<S: AsRef<str>>(&self, tags: &[S]) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut positions = Vec::new();

        for tag in tags {
            let key = tag.as_ref().trim().to_lowercase();
            for &position in self.lookup(Field::Tags, &key) {
                if seen.insert(position) {
                    positions.push(position);
                }
            }
        }

        positions
    }

    /// Entries carrying any of `tags` (case-insensitive, whole-tag match).
    pub fn filter_by_tags<'e, S: AsRef<str>>(
        &self,
        entries: &'e [LogEntry],
        tags: &[S],
    ) -> Vec<&'e LogEntry> {
        resolve(entries, self.filter_positions(tags))
    }
}

fn resolve(entries: &[LogEntry], positions: Vec<usize>) -> Vec<&LogEntry> {
    positions
        .into_iter()
        .filter_map(|position| entries.get(position))
        .collect()
}

/// Build a [`SearchIndex`] for `entries`.
pub fn build_search_index(entries: &[LogEntry]) -> SearchIndex {
    SearchIndex::build(entries)
}

/// Token search through a prebuilt index.
pub fn indexed_search<'e>(
    index: &SearchIndex,
    entries: &'e [LogEntry],
    query: &str,
) -> Vec<&'e LogEntry> {
    index.search(entries, query)
}

/// Tag filter through a prebuilt index.
pub fn indexed_filter_by_tags<'e, S: AsRef<str>>(
    index: &SearchIndex,
    entries: &'e [LogEntry],
    tags: &[S],
) -> Vec<&'e LogEntry> {
    index.filter_by_tags(entries, tags)
}
