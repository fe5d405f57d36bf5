//! Log entry record model and in-memory record operations.

use crate::error::{LeanLogError, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One record of the log: a problem/solution/action triple with optional
/// categorization and causal links to other entries.
///
/// List-valued fields (`tags`, `files`, `tech_stack`, `cause_ids`,
/// `effect_ids`) are stored comma-joined, exactly as they appear in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique identifier within a collection.
    pub id: String,
    /// Short title.
    pub name: String,
    /// Comma-separated tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Description of the problem.
    pub problem: String,
    /// Description of the solution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    /// Command or action taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Comma-separated file paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,
    /// Comma-separated technologies.
    #[serde(
        rename = "tech-stack",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tech_stack: Option<String>,
    /// Comma-separated ids of entries that caused this one.
    #[serde(rename = "causeIds", default, skip_serializing_if = "Option::is_none")]
    pub cause_ids: Option<String>,
    /// Comma-separated ids of entries this one led to.
    #[serde(rename = "effectIds", default, skip_serializing_if = "Option::is_none")]
    pub effect_ids: Option<String>,
    /// Short SHA of the last commit when the entry was written.
    #[serde(
        rename = "last-commit-short-sha",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_commit_short_sha: Option<String>,
    /// ISO-8601 creation timestamp.
    #[serde(rename = "created-at")]
    pub created_at: String,
    /// ISO-8601 update timestamp.
    #[serde(rename = "updated-at", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Model attribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Agent that created the entry.
    #[serde(
        rename = "created-by-agent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_by_agent: Option<String>,
}

impl LogEntry {
    /// Ids this entry declares as causes.
    pub fn cause_ids(&self) -> Vec<String> {
        parse_ids(self.cause_ids.as_deref())
    }

    /// Ids this entry declares as effects.
    pub fn effect_ids(&self) -> Vec<String> {
        parse_ids(self.effect_ids.as_deref())
    }

    /// Individual tags.
    pub fn tag_list(&self) -> Vec<String> {
        parse_ids(self.tags.as_deref())
    }

    /// Individual file paths.
    pub fn file_list(&self) -> Vec<String> {
        parse_ids(self.files.as_deref())
    }

    /// Individual technologies.
    pub fn tech_stack_list(&self) -> Vec<String> {
        parse_ids(self.tech_stack.as_deref())
    }
}

/// Split a comma-separated list, trimming pieces and dropping empty ones.
///
/// Order and duplicates are preserved.
pub fn parse_ids(ids: Option<&str>) -> Vec<String> {
    match ids {
        Some(ids) => ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Join ids into the comma-separated field format.
pub fn format_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(|id| id.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

/// Current UTC time in the log's timestamp format (`2024-01-01T00:00:00.000Z`).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Builder for a new [`LogEntry`].
///
/// Identifier and creation timestamp are generated on [`EntryDraft::build`]
/// when not supplied.
///
/// # Examples
///
/// ```
/// use leanlog_core::EntryDraft;
///
/// let entry = EntryDraft::new("Fix login", "Users cannot sign in")
///     .tags("bug,auth")
///     .cause_ids("a1")
///     .build()
///     .unwrap();
///
/// assert_eq!(entry.cause_ids(), vec!["a1".to_string()]);
/// assert!(!entry.id.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    id: Option<String>,
    name: String,
    problem: String,
    tags: Option<String>,
    solution: Option<String>,
    action: Option<String>,
    files: Option<String>,
    tech_stack: Option<String>,
    cause_ids: Option<String>,
    effect_ids: Option<String>,
    last_commit_short_sha: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    model: Option<String>,
    created_by_agent: Option<String>,
}

impl EntryDraft {
    /// Start a draft with the two required text fields.
    pub fn new(name: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            problem: problem.into(),
            ..Default::default()
        }
    }

    /// Use an explicit identifier instead of a generated UUID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = non_empty(id);
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = non_empty(tags);
        self
    }

    pub fn solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = non_empty(solution);
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = non_empty(action);
        self
    }

    pub fn files(mut self, files: impl Into<String>) -> Self {
        self.files = non_empty(files);
        self
    }

    pub fn tech_stack(mut self, tech_stack: impl Into<String>) -> Self {
        self.tech_stack = non_empty(tech_stack);
        self
    }

    pub fn cause_ids(mut self, ids: impl Into<String>) -> Self {
        self.cause_ids = non_empty(ids);
        self
    }

    pub fn effect_ids(mut self, ids: impl Into<String>) -> Self {
        self.effect_ids = non_empty(ids);
        self
    }

    pub fn last_commit_short_sha(mut self, sha: impl Into<String>) -> Self {
        self.last_commit_short_sha = non_empty(sha);
        self
    }

    /// Use an explicit creation timestamp instead of the current time.
    pub fn created_at(mut self, timestamp: impl Into<String>) -> Self {
        self.created_at = non_empty(timestamp);
        self
    }

    pub fn updated_at(mut self, timestamp: impl Into<String>) -> Self {
        self.updated_at = non_empty(timestamp);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = non_empty(model);
        self
    }

    pub fn created_by_agent(mut self, agent: impl Into<String>) -> Self {
        self.created_by_agent = non_empty(agent);
        self
    }

    /// Finish the draft.
    ///
    /// # Errors
    ///
    /// Returns [`LeanLogError::MissingField`] when `name` or `problem` is blank.
    pub fn build(self) -> Result<LogEntry> {
        if self.name.trim().is_empty() {
            return Err(LeanLogError::MissingField("name"));
        }
        if self.problem.trim().is_empty() {
            return Err(LeanLogError::MissingField("problem"));
        }

        Ok(LogEntry {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            tags: self.tags,
            problem: self.problem,
            solution: self.solution,
            action: self.action,
            files: self.files,
            tech_stack: self.tech_stack,
            cause_ids: self.cause_ids,
            effect_ids: self.effect_ids,
            last_commit_short_sha: self.last_commit_short_sha,
            created_at: self.created_at.unwrap_or_else(now_timestamp),
            updated_at: self.updated_at,
            model: self.model,
            created_by_agent: self.created_by_agent,
        })
    }
}

/// Field replacements applied by [`update_entry`].
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub problem: Option<String>,
    pub tags: Option<String>,
    pub solution: Option<String>,
    pub action: Option<String>,
    pub files: Option<String>,
    pub tech_stack: Option<String>,
    pub cause_ids: Option<String>,
    pub effect_ids: Option<String>,
    pub last_commit_short_sha: Option<String>,
    pub created_at: Option<String>,
    pub model: Option<String>,
    pub created_by_agent: Option<String>,
}

/// Build a draft and append it to the collection.
pub fn add_entry(entries: &mut Vec<LogEntry>, draft: EntryDraft) -> Result<&LogEntry> {
    let entry = draft.build()?;
    entries.push(entry);
    let last = entries.len() - 1;
    Ok(&entries[last])
}

/// Apply an update to the entry at `position` and stamp its `updated-at`.
///
/// # Errors
///
/// Returns [`LeanLogError::InvalidPosition`] when `position` is out of range.
pub fn update_entry(
    entries: &mut [LogEntry],
    position: usize,
    update: EntryUpdate,
) -> Result<&LogEntry> {
    let len = entries.len();
    let entry = entries
        .get_mut(position)
        .ok_or(LeanLogError::InvalidPosition { position, len })?;

    if let Some(id) = update.id {
        entry.id = id;
    }
    if let Some(name) = update.name {
        entry.name = name;
    }
    if let Some(problem) = update.problem {
        entry.problem = problem;
    }
    if let Some(created_at) = update.created_at {
        entry.created_at = created_at;
    }

    let optional_fields = [
        (&mut entry.tags, update.tags),
        (&mut entry.solution, update.solution),
        (&mut entry.action, update.action),
        (&mut entry.files, update.files),
        (&mut entry.tech_stack, update.tech_stack),
        (&mut entry.cause_ids, update.cause_ids),
        (&mut entry.effect_ids, update.effect_ids),
        (&mut entry.last_commit_short_sha, update.last_commit_short_sha),
        (&mut entry.model, update.model),
        (&mut entry.created_by_agent, update.created_by_agent),
    ];
    for (field, value) in optional_fields {
        if value.is_some() {
            *field = value;
        }
    }

    entry.updated_at = Some(now_timestamp());
    Ok(entry)
}

/// Declare `cause_id` as a cause of `effect_id` on both records.
///
/// Appends to the cause's `effectIds` and the effect's `causeIds`, skipping ids
/// that are already declared. Returns `false` when either entry is absent.
/// Derived graphs and indexes are not touched; rebuild them afterwards.
pub fn link_entries(entries: &mut [LogEntry], cause_id: &str, effect_id: &str) -> bool {
    let cause = entries.iter().position(|e| e.id == cause_id);
    let effect = entries.iter().position(|e| e.id == effect_id);

    let (Some(cause), Some(effect)) = (cause, effect) else {
        return false;
    };

    append_id(&mut entries[cause].effect_ids, effect_id);
    append_id(&mut entries[effect].cause_ids, cause_id);
    true
}

fn append_id(field: &mut Option<String>, id: &str) {
    let mut ids = parse_ids(field.as_deref());
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
        *field = Some(format_ids(&ids));
    }
}
