//! LeanLog Core Library
//!
//! Causal graph and retrieval engine for a flat log of problem/solution
//! entries, providing:
//! - A causal graph built from each entry's `causeIds` / `effectIds`
//! - Ancestry, causal chains, shortest paths and cycle detection
//! - Token and tag search through inverted indexes
//! - Reasoning search that widens text matches with causal context
//!
//! Everything works on in-memory collections. Loading and saving the log is
//! left to the caller.
//!
//! # Quick Start
//!
//! ```
//! use leanlog_core::{EntryDraft, LogIndex};
//!
//! let entries = vec![
//!     EntryDraft::new("Build broken", "Linker error on CI")
//!         .id("1")
//!         .tags("ci")
//!         .effect_ids("2")
//!         .build()
//!         .unwrap(),
//!     EntryDraft::new("Pin toolchain", "Use a fixed linker version")
//!         .id("2")
//!         .cause_ids("1")
//!         .build()
//!         .unwrap(),
//! ];
//!
//! let index = LogIndex::build(entries);
//!
//! let chain: Vec<&str> = index.causal_chain("2").iter().map(|e| e.id.as_str()).collect();
//! assert_eq!(chain, vec!["1", "2"]);
//!
//! let hits = index.search("linker");
//! assert_eq!(hits.len(), 2);
//! ```
//!
//! # Features
//!
//! ## Ad hoc traversal
//!
//! Graph queries can run directly over a slice of entries:
//!
//! ```
//! use leanlog_core::{causal_chain, has_cycles, EntryDraft};
//!
//! let entries = vec![
//!     EntryDraft::new("One", "first").id("1").effect_ids("2").build().unwrap(),
//!     EntryDraft::new("Two", "second").id("2").cause_ids("1").effect_ids("3").build().unwrap(),
//!     EntryDraft::new("Three", "third").id("3").cause_ids("2").build().unwrap(),
//! ];
//!
//! let ids: Vec<&str> = causal_chain(&entries, "2").iter().map(|e| e.id.as_str()).collect();
//! assert_eq!(ids, vec!["1", "2", "3"]);
//! assert!(!has_cycles(&entries));
//! ```
//!
//! ## Graph statistics
//!
//! ```
//! use leanlog_core::{graph_statistics, EntryDraft};
//!
//! let entries = vec![EntryDraft::new("Loop", "self").id("x").cause_ids("x").build().unwrap()];
//!
//! let stats = graph_statistics(&entries);
//! assert!(stats.has_cycles);
//! assert_eq!(stats.cycles_count, 1);
//! ```

mod config;
mod entry;
mod error;
mod graph;
mod index;
mod query;
mod reasoning;
mod search;
mod traversal;

pub use config::{Config, QueryConfig, CONFIG_FILE_NAME};
pub use entry::{
    add_entry, format_ids, link_entries, now_timestamp, parse_ids, update_entry, EntryDraft,
    EntryUpdate, LogEntry,
};
pub use error::{LeanLogError, Result};
pub use graph::{build_graph, CausalGraph, CausalLinks, Direction};
pub use index::{
    build_graph_index, build_index, update_index, GraphIndex, IndexStatistics, LogIndex,
};
pub use query::{
    entries_by_task, filter_by_tags, last_n_entries, search_entries, summarize, LogSummary,
};
pub use reasoning::reasoning_search;
pub use search::{
    build_search_index, indexed_filter_by_tags, indexed_search, tokenize, Field, SearchIndex,
    TokenIndex,
};
pub use traversal::{
    ancestors, causal_chain, descendants, graph_statistics, has_cycles, shortest_path,
    strongly_connected_components, GraphStatistics, Traversal,
};
