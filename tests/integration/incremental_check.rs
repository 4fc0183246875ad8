#![allow(missing_docs)]

use sombra_consistency::{
    access::{RecordAccess, RecordFilter},
    check::{IncrementalCheck, ReferenceInconsistency},
    options::CheckOptions,
    repair::{LoggingDiagnostics, RelationshipRemovalStrategy},
    store::{DiffStore, MemStore, NodeRecord, RelationshipRecord},
    types::{CheckError, NodeId, RecordKind, RelId, Result},
};

/// Path 1 - 2 - 3 - 4 with a loop on 4.
fn path_graph() -> Result<MemStore> {
    let mut store = MemStore::new();
    for id in 1..=4 {
        store.create_node(NodeId(id))?;
    }
    store.create_relationship(RelId(10), NodeId(1), NodeId(2), 0)?;
    store.create_relationship(RelId(11), NodeId(2), NodeId(3), 0)?;
    store.create_relationship(RelId(12), NodeId(3), NodeId(4), 0)?;
    store.create_relationship(RelId(13), NodeId(4), NodeId(4), 1)?;
    Ok(store)
}

#[test]
fn consistent_insert_through_diff_passes() -> Result<()> {
    let mut store = path_graph()?;
    // build the expected post-commit state on a scratch copy, then stage it
    let mut scratch = store.clone();
    scratch.create_relationship(RelId(14), NodeId(1), NodeId(4), 0)?;

    let changes = {
        let mut diff = DiffStore::new(&store);
        for id in [1, 4] {
            diff.stage_node(scratch.node(NodeId(id)).load()?);
        }
        for id in [10, 13, 14] {
            diff.stage_relationship(scratch.relationship(RelId(id)).load()?);
        }
        let report = IncrementalCheck::default().verify(&diff)?;
        assert!(report.summary.records_checked >= 5);
        diff.into_changes()
    };
    store.apply(changes);
    Ok(())
}

#[test]
fn relationship_linked_into_foreign_chain_is_caught() -> Result<()> {
    let store = path_graph()?;
    let mut diff = DiffStore::new(&store);
    // 11 joins nodes 2 and 3, so it cannot follow 14 on node 1's chain
    diff.stage_relationship(
        RelationshipRecord::new(RelId(14), NodeId(1), NodeId(2), 0)
            .with_in_use(true)
            .with_first_next(RelId(11)),
    );

    let report = IncrementalCheck::default().check(&diff);

    let kinds: Vec<_> = report.findings.iter().map(|finding| finding.kind).collect();
    assert!(kinds.contains(&ReferenceInconsistency::SourceNextDifferentChain), "{kinds:?}");
    assert_eq!(
        report.summary.inconsistent_records_of(RecordKind::Relationship),
        1
    );
    Ok(())
}

#[test]
fn verify_fails_with_summary() -> Result<()> {
    let store = path_graph()?;
    let mut diff = DiffStore::new(&store);
    diff.stage_node(NodeRecord::new(NodeId(3), RelId(13)).with_in_use(true));

    match IncrementalCheck::default().verify(&diff) {
        Err(CheckError::Inconsistent(summary)) => {
            assert_eq!(summary.inconsistent_records_of(RecordKind::Node), 1);
            assert_eq!(
                summary.count_of(ReferenceInconsistency::RelationshipForOtherNode),
                1
            );
        }
        other => panic!("expected inconsistency, got {other:?}"),
    }
    Ok(())
}

#[test]
fn findings_cap_truncates_report() -> Result<()> {
    let store = path_graph()?;
    let mut diff = DiffStore::new(&store);
    for id in 10..=13 {
        let dead = store.relationship(RelId(id)).load()?.with_in_use(false);
        diff.stage_relationship(dead);
    }

    let report = IncrementalCheck::new(CheckOptions::default().max_findings(2)).check(&diff);

    assert_eq!(report.findings.len(), 2);
    assert!(report.truncated);
    assert!(report.summary.total_inconsistencies > 2);
    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["truncated"], true);
    Ok(())
}

#[test]
fn filters_decide_whether_a_bad_head_is_seen() -> Result<()> {
    let store = path_graph()?;
    let mut diff = DiffStore::new(&store);
    diff.stage_node(NodeRecord::new(NodeId(2), RelId(12)).with_in_use(true));

    for filter in RecordFilter::ALL {
        let report = IncrementalCheck::new(CheckOptions::default().filter(filter)).check(&diff);
        // seen from the node when relationships resolve, from 11 when nodes do
        let expect_finding = matches!(
            filter,
            RecordFilter::Everything | RecordFilter::RelationshipsOnly | RecordFilter::NodesOnly
        );
        assert_eq!(!report.is_consistent(), expect_finding, "{filter:?}");
    }
    Ok(())
}

#[test]
fn removal_of_a_dangling_relationship_passes_the_diff_check() -> Result<()> {
    let mut store = path_graph()?;
    // a stray relationship nobody links to, between two dead nodes
    store.put_node(NodeRecord::new(NodeId(50), RelId::NONE));
    store.put_node(NodeRecord::new(NodeId(51), RelId::NONE));
    let stray = store.put_relationship(
        RelationshipRecord::new(RelId(40), NodeId(50), NodeId(51), 0).with_in_use(true),
    );

    let mut diff = DiffStore::new(&store);
    let report = RelationshipRemovalStrategy::new(&store, &mut diff, LoggingDiagnostics)
        .evaluate(&[stray])?;
    assert_eq!(report.removed, vec![RelId(40)]);

    IncrementalCheck::default().verify(&diff)?;
    Ok(())
}
