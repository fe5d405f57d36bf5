//! Cycle detection, cycle groups and shortest paths over the records.

use crate::harness::{owned, Assertion, Scenario};
use anyhow::{anyhow, Result};
use leanlog_core::{EntryDraft, EntryUpdate, LogIndex};

fn causes(ids: &str) -> EntryUpdate {
    EntryUpdate {
        cause_ids: Some(ids.to_string()),
        ..Default::default()
    }
}

#[test]
fn self_reference_is_a_cycle() {
    Scenario::new("self_reference_is_a_cycle")
        .add(EntryDraft::new("Retry loop", "Retries trigger retries").id("x").cause_ids("x"))
        .assert_cycles(true)
        .assert(Assertion::CycleGroups(vec![owned(&["x"])]))
        .run()
        .unwrap();
}

#[test]
fn ring_is_reported_once() {
    Scenario::new("ring_is_reported_once")
        .add_simple("a", "Cache miss", "Cold cache")
        .add_simple("b", "Slow queries", "Database overloaded")
        .add_simple("c", "Timeouts", "Requests time out")
        .update("a", causes("c"))
        .update("b", causes("a"))
        .update("c", causes("b"))
        .add(EntryDraft::new("Retry loop", "Retries trigger retries").id("x").cause_ids("x"))
        .assert_cycles(true)
        .assert(Assertion::CycleGroups(vec![
            owned(&["x"]),
            owned(&["a", "b", "c"]),
        ]))
        .run()
        .unwrap();
}

#[test]
fn overlapping_rings_are_reported_separately() {
    Scenario::new("overlapping_rings_are_reported_separately")
        .add_simple("a", "Queue backlog", "Consumers lag")
        .add_simple("b", "Retry storm", "Retries flood the queue")
        .add_simple("c", "Throttling", "Producers throttled")
        .update("a", causes("b,c"))
        .update("b", causes("a"))
        .update("c", causes("b"))
        .assert_cycles(true)
        .assert(Assertion::CycleGroups(vec![
            owned(&["a", "b"]),
            owned(&["a", "b", "c"]),
        ]))
        .rebuild()
        .assert(Assertion::Custom(Box::new(|index: &LogIndex| -> Result<()> {
            let stats = index.traversal().statistics();
            if stats.cycles_count != 2 {
                return Err(anyhow!("expected 2 cycles, got {}", stats.to_json()?));
            }
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn breaking_the_ring_clears_cycles() {
    Scenario::new("breaking_the_ring_clears_cycles")
        .add_simple("a", "First", "One")
        .add_simple("b", "Second", "Two")
        .update("a", causes("b"))
        .update("b", causes("a"))
        .assert_cycles(true)
        .update("a", causes(""))
        .assert_cycles(false)
        .assert(Assertion::CycleGroups(Vec::new()))
        .run()
        .unwrap();
}

#[test]
fn shortest_path_ignores_direction() {
    Scenario::new("shortest_path_ignores_direction")
        .add_chain(&["a", "b", "c", "d"])
        .assert(Assertion::ShortestPath {
            from: "d".into(),
            to: "a".into(),
            ids: owned(&["d", "c", "b", "a"]),
        })
        .assert(Assertion::ShortestPath {
            from: "b".into(),
            to: "b".into(),
            ids: owned(&["b"]),
        })
        .assert(Assertion::ShortestPath {
            from: "a".into(),
            to: "missing".into(),
            ids: Vec::new(),
        })
        .assert(Assertion::GraphEdges(3.0))
        .assert_cycles(false)
        .run()
        .unwrap();
}

#[test]
fn disconnected_entries_have_no_path() {
    Scenario::new("disconnected_entries_have_no_path")
        .add_chain(&["a", "b"])
        .add_simple("z", "Unrelated", "Separate incident")
        .assert(Assertion::ShortestPath {
            from: "a".into(),
            to: "z".into(),
            ids: Vec::new(),
        })
        .run()
        .unwrap();
}
