#![allow(missing_docs)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use sombra_consistency::{
    access::RecordAccess,
    chain::{RecordSet, RelationshipChainExplorer, RelationshipChainField},
    repair::{CollectingDiagnostics, RelationshipRemovalStrategy},
    store::{DiffStore, MemStore, NodeRecord, RelationshipRecord},
    types::{NodeId, RelId},
};

fn arb_record_set() -> impl Strategy<Value = RecordSet<RelationshipRecord>> {
    prop::collection::vec(0u64..24, 0..12).prop_map(|ids| {
        ids.into_iter()
            .map(|id| RelationshipRecord::new(RelId(id), NodeId(0), NodeId(1), 0))
            .collect()
    })
}

/// Node count plus relationship endpoints; relationship `i` gets id `i`.
fn arb_graph() -> impl Strategy<Value = (u64, Vec<(u64, u64)>)> {
    (1u64..=6).prop_flat_map(|nodes| {
        (
            Just(nodes),
            prop::collection::vec((0..nodes, 0..nodes), 1..=12),
        )
    })
}

fn build(nodes: u64, edges: &[(u64, u64)]) -> MemStore {
    let mut store = MemStore::new();
    for id in 0..nodes {
        store.create_node(NodeId(id)).unwrap();
    }
    for (i, (first, second)) in edges.iter().enumerate() {
        store
            .create_relationship(RelId(i as u64), NodeId(*first), NodeId(*second), 0)
            .unwrap();
    }
    store
}

fn load(store: &MemStore, id: RelId) -> RelationshipRecord {
    store.relationship(id).force_load().into_record()
}

/// Every relationship touching `node`; in an intact store this is its chain.
fn touching(store: &MemStore, node: NodeId) -> BTreeSet<u64> {
    store
        .relationship_ids()
        .into_iter()
        .filter(|id| load(store, *id).references(node))
        .map(|id| id.0)
        .collect()
}

proptest! {
    #[test]
    fn prop_union_is_commutative_associative_and_idempotent(
        a in arb_record_set(),
        b in arb_record_set(),
        c in arb_record_set(),
    ) {
        prop_assert_eq!(a.union(&a), a.clone());
        prop_assert_eq!(a.union(&b), b.union(&a));
        prop_assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
        prop_assert!(a.union(&b).contains_all(&a));
    }

    #[test]
    fn prop_depth_two_closure_is_complete(
        (nodes, edges) in arb_graph(),
        pick in any::<prop::sample::Index>(),
    ) {
        let store = build(nodes, &edges);
        let start = load(&store, RelId(pick.index(edges.len()) as u64));
        let closure = RelationshipChainExplorer::new(&store)
            .explore_relationship_record_chains_to_depth_two(&start);

        let mut expected = BTreeSet::new();
        for node in [start.first_node, start.second_node] {
            for id in touching(&store, node) {
                let member = load(&store, RelId(id));
                expected.extend(touching(&store, member.other_node(node)));
                for field in RelationshipChainField::ALL {
                    let neighbour = field.rel_of(&member);
                    if !neighbour.is_none() {
                        prop_assert!(
                            closure.contains(neighbour),
                            "missing neighbour {}",
                            neighbour
                        );
                    }
                }
            }
        }
        prop_assert_eq!(closure.ids().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn prop_removal_is_all_or_nothing(
        (nodes, edges) in arb_graph(),
        cleared in prop::collection::vec(any::<bool>(), 6),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut store = build(nodes, &edges);
        for id in 0..nodes {
            if cleared[id as usize] {
                store.put_node(NodeRecord::new(NodeId(id), RelId::NONE).with_in_use(true));
            }
        }
        let start = load(&store, RelId(pick.index(edges.len()) as u64));
        let closure = RelationshipChainExplorer::new(&store)
            .explore_relationship_record_chains_to_depth_two(&start);
        let closure_ids: Vec<RelId> = closure.iter().map(|rel| rel.id).collect();

        let mut blocking = BTreeSet::new();
        for rel in &closure {
            for node in [rel.first_node, rel.second_node] {
                let head = store.get_node(node).map(|n| n.next_rel).unwrap_or(RelId::NONE);
                if head == rel.id {
                    blocking.insert(node);
                }
            }
        }

        let mut diff = DiffStore::new(&store);
        let mut diagnostics = CollectingDiagnostics::new();
        let report = RelationshipRemovalStrategy::new(&store, &mut diff, &mut diagnostics)
            .evaluate(std::slice::from_ref(&start))
            .unwrap();

        let reported: Vec<NodeId> = diagnostics.prevented().iter().map(|p| p.node.id).collect();
        if blocking.is_empty() {
            prop_assert_eq!(&report.removed, &closure_ids);
            prop_assert!(reported.is_empty());
        } else {
            prop_assert!(report.removed.is_empty());
            prop_assert_eq!(reported.iter().copied().collect::<BTreeSet<_>>(), blocking.clone());
            prop_assert_eq!(reported.len(), blocking.len());
            for prevented in diagnostics.prevented() {
                prop_assert_eq!(&prevented.closure, &closure_ids);
            }
        }
    }

    #[test]
    fn prop_evaluation_is_deterministic(
        (nodes, edges) in arb_graph(),
        cleared in prop::collection::vec(any::<bool>(), 6),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..4),
    ) {
        let mut store = build(nodes, &edges);
        for id in 0..nodes {
            if cleared[id as usize] {
                store.put_node(NodeRecord::new(NodeId(id), RelId::NONE).with_in_use(true));
            }
        }
        let batch: Vec<RelationshipRecord> = picks
            .iter()
            .map(|pick| load(&store, RelId(pick.index(edges.len()) as u64)))
            .collect();

        let run = || {
            let mut diff = DiffStore::new(&store);
            let report =
                RelationshipRemovalStrategy::new(&store, &mut diff, CollectingDiagnostics::new())
                    .evaluate(&batch)
                    .unwrap();
            (report, diff.into_changes())
        };
        let (first_report, first_changes) = run();
        let (second_report, second_changes) = run();
        prop_assert_eq!(first_report, second_report);
        prop_assert_eq!(first_changes, second_changes);
    }
}
