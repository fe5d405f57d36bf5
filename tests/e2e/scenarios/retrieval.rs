//! Search, tag filters, reasoning and recent-window queries against the
//! default incident log fixture.

use crate::harness::{owned, Assertion, Scenario};
use anyhow::{anyhow, Result};
use leanlog_core::{LogEntry, LogIndex, QueryConfig};

fn ids(entries: Vec<&LogEntry>) -> Vec<String> {
    entries.into_iter().map(|e| e.id.clone()).collect()
}

#[test]
fn search_returns_discovery_order() {
    Scenario::new("search_returns_discovery_order")
        .from_fixture("default")
        .assert(Assertion::IndexedCount(4))
        .assert_search("production", &["2", "3"])
        // Name hits come before solution hits
        .assert_search("manifest", &["3", "2"])
        .assert_search("REDIS timeout", &["4"])
        .assert_search("database_url", &["2"])
        .run()
        .unwrap();
}

#[test]
fn short_and_unknown_tokens_miss() {
    Scenario::new("short_and_unknown_tokens_miss")
        .from_fixture("default")
        .assert(Assertion::SearchMisses { query: "ci".into() })
        .assert(Assertion::SearchMisses {
            query: "kubernetes".into(),
        })
        .assert(Assertion::SearchMisses { query: "".into() })
        .run()
        .unwrap();
}

#[test]
fn tags_match_whole_and_case_insensitive() {
    Scenario::new("tags_match_whole_and_case_insensitive")
        .from_fixture("default")
        .assert(Assertion::TagsReturn {
            tags: owned(&["INCIDENT"]),
            ids: owned(&["1", "2"]),
        })
        .assert(Assertion::TagsReturn {
            tags: owned(&[" ci ", "testing"]),
            ids: owned(&["3", "4"]),
        })
        .assert(Assertion::TagsReturn {
            tags: owned(&["incid"]),
            ids: Vec::new(),
        })
        .assert(Assertion::SummaryTags(owned(&[
            "deploy", "incident", "config", "ci", "testing",
        ])))
        .run()
        .unwrap();
}

#[test]
fn reasoning_widens_matches_with_causal_context() {
    Scenario::new("reasoning_widens_matches_with_causal_context")
        .from_fixture("default")
        .assert(Assertion::ReasoningIncludes {
            query: "DATABASE_URL".into(),
            depth: Some(1),
            ids: owned(&["1", "2", "3"]),
        })
        .assert(Assertion::ReasoningExcludes {
            query: "DATABASE_URL".into(),
            depth: Some(1),
            ids: owned(&["4"]),
        })
        .assert(Assertion::ReasoningExcludes {
            query: "DATABASE_URL".into(),
            depth: Some(0),
            ids: owned(&["1", "3"]),
        })
        // Configured depth (3) reaches the whole chain from its tail
        .assert(Assertion::ReasoningIncludes {
            query: "validation".into(),
            depth: None,
            ids: owned(&["1", "2", "3"]),
        })
        .run()
        .unwrap();
}

#[test]
fn configured_limits_shape_results() {
    fn top_production_is_first_match(index: &LogIndex) -> Result<()> {
        let top = ids(index.top_matches("production"));
        if top != owned(&["2"]) {
            return Err(anyhow!("expected top match [2], got {:?}", top));
        }
        Ok(())
    }

    Scenario::new("configured_limits_shape_results")
        .from_fixture("default")
        // Fixture config.toml sets recent_limit = 3
        .assert_recent(&["4", "3", "2"])
        .configure(QueryConfig {
            recent_limit: 1,
            search_limit: 1,
            ..QueryConfig::default()
        })
        .assert_recent(&["4"])
        .assert(Assertion::Custom(Box::new(top_production_is_first_match)))
        .run()
        .unwrap();
}

#[test]
fn statistics_reflect_fixture() {
    Scenario::new("statistics_reflect_fixture")
        .from_fixture("default")
        .assert(Assertion::Custom(Box::new(|index: &LogIndex| -> Result<()> {
            let stats = index.statistics();
            if stats.total_entries != 4 || stats.graph_nodes != 4 {
                return Err(anyhow!("unexpected statistics: {}", stats.to_json()?));
            }
            if stats.ancestors_cached != 4 || stats.descendants_cached != 4 {
                return Err(anyhow!("caches incomplete: {}", stats.to_json()?));
            }
            Ok(())
        })))
        .assert(Assertion::GraphEdges(2.0))
        .assert_cycles(false)
        .run()
        .unwrap();
}
