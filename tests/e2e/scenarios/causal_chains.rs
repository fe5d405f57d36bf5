//! Causal chains: cached lookups, ad hoc traversal, and index staleness.

use crate::harness::{owned, Assertion, Scenario};
use leanlog_core::EntryDraft;

#[test]
fn linked_chain_resolves_through_cache() {
    Scenario::new("linked_chain_resolves_through_cache")
        .add_chain(&["a", "b", "c", "d"])
        .rebuild()
        .assert_chain("c", &["a", "b", "c", "d"])
        .assert_chain("a", &["a", "b", "c", "d"])
        .assert(Assertion::AncestorsAre {
            id: "c".into(),
            ids: owned(&["b", "a"]),
        })
        .assert(Assertion::DescendantsAre {
            id: "b".into(),
            ids: owned(&["c", "d"]),
        })
        .assert_chain("unknown", &[])
        .run()
        .unwrap();
}

#[test]
fn index_is_stale_until_rebuild() {
    Scenario::new("index_is_stale_until_rebuild")
        .add_chain(&["a", "b"])
        .rebuild()
        .add_simple("c", "Follow-up", "Caused by b")
        .link("b", "c")
        // Records see the new link, the index does not
        .assert(Assertion::EntryCount(3))
        .assert(Assertion::IndexedCount(2))
        .assert(Assertion::EntryMissing("c".into()))
        .assert_chain("b", &["a", "b"])
        .assert(Assertion::AdHocChainIs {
            id: "b".into(),
            ids: owned(&["a", "b", "c"]),
        })
        .rebuild()
        .assert(Assertion::EntryExists("c".into()))
        .assert_chain("b", &["a", "b", "c"])
        .run()
        .unwrap();
}

#[test]
fn diamond_visits_each_entry_once() {
    Scenario::new("diamond_visits_each_entry_once")
        .add_simple("root", "Root cause", "Shared config drift")
        .add_simple("left", "Left symptom", "API errors")
        .add_simple("right", "Right symptom", "Worker errors")
        .add_simple("sink", "Outage", "Service down")
        .link("root", "left")
        .link("root", "right")
        .link("left", "sink")
        .link("right", "sink")
        .rebuild()
        .assert(Assertion::DescendantsAre {
            id: "root".into(),
            ids: owned(&["left", "sink", "right"]),
        })
        .assert(Assertion::AncestorsAre {
            id: "sink".into(),
            ids: owned(&["left", "root", "right"]),
        })
        .assert_chain("sink", &["right", "root", "left", "sink"])
        .assert(Assertion::ShortestPath {
            from: "root".into(),
            to: "sink".into(),
            ids: owned(&["root", "left", "sink"]),
        })
        .assert_cycles(false)
        .assert(Assertion::GraphEdges(4.0))
        .run()
        .unwrap();
}

#[test]
fn dangling_references_are_skipped() {
    Scenario::new("dangling_references_are_skipped")
        .add(
            EntryDraft::new("Orphan", "Caused by a deleted entry")
                .id("orphan")
                .cause_ids("ghost")
                .effect_ids("child"),
        )
        .add(
            EntryDraft::new("Child", "Downstream of orphan")
                .id("child")
                .cause_ids("orphan"),
        )
        .rebuild()
        .assert(Assertion::AncestorsAre {
            id: "orphan".into(),
            ids: Vec::new(),
        })
        .assert_chain("child", &["orphan", "child"])
        .assert(Assertion::ShortestPath {
            from: "child".into(),
            to: "ghost".into(),
            ids: Vec::new(),
        })
        .assert(Assertion::EntryMissing("ghost".into()))
        .run()
        .unwrap();
}

#[test]
fn one_sided_links_follow_declared_direction() {
    // Only the effect side declares the link
    Scenario::new("one_sided_links_follow_declared_direction")
        .add_simple("1", "Cause", "Upstream")
        .add(EntryDraft::new("Effect", "Downstream").id("2").cause_ids("1"))
        .rebuild()
        .assert(Assertion::AncestorsAre {
            id: "2".into(),
            ids: owned(&["1"]),
        })
        .assert(Assertion::DescendantsAre {
            id: "1".into(),
            ids: Vec::new(),
        })
        .assert_chain("1", &["1"])
        .assert(Assertion::GraphEdges(0.5))
        .run()
        .unwrap();
}

#[test]
fn linking_missing_entry_fails() {
    let error = Scenario::new("linking_missing_entry_fails")
        .add_simple("a", "Present", "Exists")
        .link("a", "nowhere")
        .run()
        .unwrap_err();

    assert!(error.contains("entry missing"), "unexpected error: {}", error);
}
