#![allow(missing_docs)]

use sombra_consistency::{
    access::{DiffRecordAccess, RecordAccess},
    options::CheckOptions,
    repair::{CollectingDiagnostics, RelationshipRemovalStrategy, RemovalReport},
    store::{DiffStore, MemStore, NodeRecord, RelationshipRecord},
    types::{NodeId, RelId, Result},
};

fn in_use_node(store: &mut MemStore, id: u64, head: u64) -> NodeRecord {
    store.put_node(NodeRecord::new(NodeId(id), RelId(head)).with_in_use(true))
}

fn dead_node(store: &mut MemStore, id: u64) {
    store.put_node(NodeRecord::new(NodeId(id), RelId::NONE));
}

fn in_use_rel(store: &mut MemStore, rel: RelationshipRecord) -> RelationshipRecord {
    store.put_relationship(rel.with_in_use(true))
}

fn rel(id: u64, first: u64, second: u64) -> RelationshipRecord {
    RelationshipRecord::new(RelId(id), NodeId(first), NodeId(second), 0)
}

/// 11 and 12 both link into consistent record 10 from opposite ends.
fn two_inconsistent_around_ten(
    store: &mut MemStore,
) -> (RelationshipRecord, RelationshipRecord, RelationshipRecord) {
    let first = in_use_rel(store, rel(11, 101, 102).with_first_next(RelId(10)));
    let second = in_use_rel(store, rel(12, 103, 104).with_second_next(RelId(10)));
    let consistent = in_use_rel(
        store,
        rel(10, 101, 104)
            .with_first_prev(RelId(11))
            .with_second_prev(RelId(12)),
    );
    (first, second, consistent)
}

fn evaluate(
    store: &MemStore,
    records: &[RelationshipRecord],
) -> Result<(RemovalReport, Vec<RelId>, CollectingDiagnostics)> {
    let mut diff = DiffStore::new(store);
    let mut diagnostics = CollectingDiagnostics::new();
    let report =
        RelationshipRemovalStrategy::new(store, &mut diff, &mut diagnostics).evaluate(records)?;
    let staged = diff
        .changed_relationships()
        .filter(|rel| !rel.in_use)
        .map(|rel| rel.id)
        .collect();
    Ok((report, staged, diagnostics))
}

#[test]
fn removes_unconnected_relationship_records() -> Result<()> {
    let mut store = MemStore::new();
    let first = in_use_rel(&mut store, rel(11, 101, 102));
    let second = in_use_rel(&mut store, rel(12, 103, 104));
    for node in 101..=104 {
        dead_node(&mut store, node);
    }

    let (report, staged, diagnostics) = evaluate(&store, &[first, second])?;

    assert_eq!(report.removed, vec![RelId(11), RelId(12)]);
    assert_eq!(staged, report.removed);
    assert!(diagnostics.prevented().is_empty());
    Ok(())
}

#[test]
fn removes_inconsistent_records_with_connected_consistent_record() -> Result<()> {
    let mut store = MemStore::new();
    let (first, second, _) = two_inconsistent_around_ten(&mut store);
    for node in 101..=104 {
        in_use_node(&mut store, node, 1000 + node - 100);
    }

    let (report, staged, diagnostics) = evaluate(&store, &[first, second])?;

    assert_eq!(report.removed, vec![RelId(10), RelId(11), RelId(12)]);
    assert_eq!(staged, report.removed);
    assert!(report.is_complete());
    assert!(diagnostics.prevented().is_empty());
    Ok(())
}

#[test]
fn withholds_closure_rooted_at_live_node_but_removes_unrelated_record() -> Result<()> {
    let mut store = MemStore::new();
    let (first, second, _) = two_inconsistent_around_ten(&mut store);
    let blocking = in_use_node(&mut store, 101, 10);
    in_use_node(&mut store, 102, 1002);
    in_use_node(&mut store, 103, 1003);
    in_use_node(&mut store, 104, 1004);
    let unrelated = in_use_rel(&mut store, rel(21, 201, 202));
    dead_node(&mut store, 201);
    dead_node(&mut store, 202);

    let (report, staged, diagnostics) = evaluate(&store, &[first, second, unrelated])?;

    assert_eq!(report.removed, vec![RelId(21)]);
    assert_eq!(staged, vec![RelId(21)]);

    let prevented = diagnostics.prevented();
    assert_eq!(prevented.len(), 1);
    assert_eq!(prevented[0].node, blocking);
    assert_eq!(prevented[0].closure, vec![RelId(10), RelId(11), RelId(12)]);

    let blocked_inputs: Vec<RelId> = report.blocked.iter().map(|b| b.relationship).collect();
    assert_eq!(blocked_inputs, vec![RelId(11), RelId(12)]);
    assert!(report.blocked.iter().all(|b| b.node == NodeId(101)));
    Ok(())
}

#[test]
fn withholds_record_referenced_by_node_head() -> Result<()> {
    let mut store = MemStore::new();
    let inconsistent = in_use_rel(&mut store, rel(11, 101, 102));
    dead_node(&mut store, 101);
    let blocking = in_use_node(&mut store, 102, 11);

    let (report, staged, diagnostics) = evaluate(&store, &[inconsistent])?;

    assert!(report.removed.is_empty());
    assert!(staged.is_empty());
    let prevented = diagnostics.prevented();
    assert_eq!(prevented.len(), 1);
    assert_eq!(prevented[0].node, blocking);
    assert_eq!(prevented[0].closure, vec![RelId(11)]);
    Ok(())
}

#[test]
fn evaluating_twice_issues_the_same_removals() -> Result<()> {
    let mut store = MemStore::new();
    let (first, second, _) = two_inconsistent_around_ten(&mut store);
    for node in 101..=104 {
        in_use_node(&mut store, node, 1000 + node - 100);
    }
    let batch = [first, second];

    let (once, _, _) = evaluate(&store, &batch)?;
    let (twice, _, _) = evaluate(&store, &batch)?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn removal_can_be_committed_and_leaves_previous_state_readable() -> Result<()> {
    let mut store = MemStore::new();
    let inconsistent = in_use_rel(&mut store, rel(11, 101, 102));
    dead_node(&mut store, 101);
    dead_node(&mut store, 102);

    let changes = {
        let mut diff = DiffStore::new(&store);
        RelationshipRemovalStrategy::new(&store, &mut diff, CollectingDiagnostics::new())
            .evaluate(&[inconsistent])?;
        assert!(diff.previous_relationship(RelId(11)).force_load().is_found());
        diff.into_changes()
    };
    store.apply(changes);

    assert_eq!(store.get_relationship(RelId(11)).map(|r| r.in_use), Some(false));
    Ok(())
}

/// Node 1 owns the chain 1 -> 2 -> 3; the far endpoints are dead and own nothing.
fn live_chain_of_three() -> Result<(MemStore, RelationshipRecord)> {
    let mut store = MemStore::new();
    store.create_node(NodeId(1))?;
    for id in [3, 2, 1] {
        store.create_node(NodeId(10 + id))?;
        store.create_relationship(RelId(id), NodeId(1), NodeId(10 + id), 0)?;
    }
    for id in 11..=13 {
        dead_node(&mut store, id);
    }
    let tail = store.relationship(RelId(3)).load()?;
    Ok((store, tail))
}

#[test]
fn closure_cut_short_by_visit_budget_is_withheld() -> Result<()> {
    let (store, tail) = live_chain_of_three()?;
    assert_eq!(store.get_node(NodeId(1)).map(|node| node.next_rel), Some(RelId(1)));

    let mut diff = DiffStore::new(&store);
    let mut diagnostics = CollectingDiagnostics::new();
    let options = CheckOptions::default().chain_visit_budget(Some(2));
    let report = RelationshipRemovalStrategy::new(&store, &mut diff, &mut diagnostics)
        .with_options(&options)
        .evaluate(std::slice::from_ref(&tail))?;

    assert!(report.removed.is_empty());
    assert_eq!(report.unexplored, vec![RelId(3)]);
    assert!(!report.is_complete());
    assert!(diff.changes().is_empty());
    assert!(diagnostics.prevented().is_empty());
    Ok(())
}

#[test]
fn budget_covering_the_chain_still_sees_the_live_head() -> Result<()> {
    let (store, tail) = live_chain_of_three()?;

    let mut diff = DiffStore::new(&store);
    let mut diagnostics = CollectingDiagnostics::new();
    let options = CheckOptions::default().chain_visit_budget(Some(3));
    let report = RelationshipRemovalStrategy::new(&store, &mut diff, &mut diagnostics)
        .with_options(&options)
        .evaluate(&[tail])?;

    assert!(report.removed.is_empty());
    assert!(report.unexplored.is_empty());
    assert_eq!(report.blocked.len(), 1);
    assert_eq!(report.blocked[0].node, NodeId(1));
    assert_eq!(diagnostics.prevented()[0].closure, vec![RelId(1), RelId(2), RelId(3)]);
    Ok(())
}
