use std::time::Duration;

use leanlog_core::{EntryDraft, EntryUpdate, QueryConfig};

use super::assertions::Assertion;

/// All possible actions in a test scenario
#[derive(Debug)]
pub enum ScenarioStep {
    // Record edits (the index is not touched until Rebuild)
    AddEntry {
        draft: EntryDraft,
    },
    UpdateEntry {
        id: String,
        update: EntryUpdate,
    },
    Link {
        cause: String,
        effect: String,
    },

    // Index lifecycle
    Rebuild,
    Configure {
        config: QueryConfig,
    },

    // Persistence through the workspace
    Save,
    Reload,

    // Time control
    Wait {
        duration: Duration,
    },
    WaitHours {
        hours: u64,
    },
    WaitDays {
        days: u64,
    },

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}
