#![allow(missing_docs)]

use sombra_consistency::{
    access::RecordAccess,
    chain::{
        ChainEnd, OwningNodeRelationshipChain, RelationshipChainDirection,
        RelationshipChainExplorer,
    },
    store::{MemStore, NodeRecord, RelationshipRecord},
    types::{NodeId, RelId, Result},
};

const DEGREE_TWO_NODES: u64 = 10;
const DENSE: NodeId = NodeId(0);

/// One dense node linked to `DEGREE_TWO_NODES` nodes, each of which also links to
/// its own leaf. Relationship `2i` joins the dense node to degree-two node `i`
/// (direction alternating), relationship `2i + 1` joins that node to its leaf.
fn store_with_one_dense_node_and_several_degree_two_nodes() -> Result<MemStore> {
    let mut store = MemStore::new();
    store.create_node(DENSE)?;
    for i in 0..DEGREE_TWO_NODES {
        let degree_two = NodeId(1 + 2 * i);
        let leaf = NodeId(2 + 2 * i);
        store.create_node(degree_two)?;
        store.create_node(leaf)?;
        if i % 2 == 0 {
            store.create_relationship(RelId(2 * i), DENSE, degree_two, 0)?;
        } else {
            store.create_relationship(RelId(2 * i), degree_two, DENSE, 0)?;
        }
        store.create_relationship(RelId(2 * i + 1), degree_two, leaf, 0)?;
    }
    Ok(store)
}

fn load(store: &MemStore, id: u64) -> RelationshipRecord {
    store.relationship(RelId(id)).force_load().into_record()
}

#[test]
fn loads_connected_records_and_their_full_chains() -> Result<()> {
    let store = store_with_one_dense_node_and_several_degree_two_nodes()?;
    let explorer = RelationshipChainExplorer::new(&store);

    let records = explorer.explore_relationship_record_chains_to_depth_two(&load(&store, 10));

    assert_eq!(records.len() as u64, DEGREE_TWO_NODES * 2);
    Ok(())
}

#[test]
fn copes_with_chain_referencing_not_in_use_blank_record() -> Result<()> {
    let mut store = store_with_one_dense_node_and_several_degree_two_nodes()?;
    store.put_relationship(RelationshipRecord::new(RelId(16), DENSE, DENSE, 0));
    let explorer = RelationshipChainExplorer::new(&store);

    let records = explorer.explore_relationship_record_chains_to_depth_two(&load(&store, 10));

    // 18 sits behind the break; 17 and 19 are only reachable through 16 and 18
    let inaccessible = 3;
    assert_eq!(records.len() as u64, DEGREE_TWO_NODES * 2 - inaccessible);
    for id in [17, 18, 19] {
        assert!(!records.contains(RelId(id)), "{id} should be unreachable");
    }
    assert!(records.contains(RelId(16)));
    Ok(())
}

#[test]
fn dense_node_head_exposes_every_dense_relationship() -> Result<()> {
    let store = store_with_one_dense_node_and_several_degree_two_nodes()?;
    let head = store
        .get_node(DENSE)
        .map(|node| node.next_rel)
        .unwrap_or(RelId::NONE);
    assert_eq!(head, RelId(18));

    let chain = RelationshipChainExplorer::new(&store).follow_chain_from_node(DENSE, head);
    let expected: Vec<u64> = (0..DEGREE_TWO_NODES).map(|i| 2 * i).collect();
    assert_eq!(chain.ids().collect::<Vec<_>>(), expected);
    Ok(())
}

#[test]
fn every_relationship_is_reachable_from_its_owners() -> Result<()> {
    let store = store_with_one_dense_node_and_several_degree_two_nodes()?;
    let owning = OwningNodeRelationshipChain::new(RelationshipChainExplorer::new(&store), &store);
    for id in store.relationship_ids() {
        let rel = load(&store, id.0);
        assert!(owning.is_reachable_from_owners(&rel), "{id}");
    }
    Ok(())
}

#[test]
fn relationship_cut_from_its_chain_is_not_reachable() -> Result<()> {
    let mut store = store_with_one_dense_node_and_several_degree_two_nodes()?;
    // node 1 heads its chain with 1; drop 0 out of node 1's view
    let one = load(&store, 1).with_first_next(RelId::NONE);
    store.put_relationship(one);
    let owning = OwningNodeRelationshipChain::new(RelationshipChainExplorer::new(&store), &store);

    let exposed =
        RelationshipChainExplorer::new(&store).follow_chain_from_node(NodeId(1), RelId(1));
    assert_eq!(exposed.ids().collect::<Vec<_>>(), vec![1]);
    assert!(!exposed.contains(RelId(0)));

    // 0 is still on the dense node's chain
    assert!(owning.is_reachable_from_owners(&load(&store, 0)));
    let orphan = store.put_relationship(
        RelationshipRecord::new(RelId(99), NodeId(1), NodeId(2), 0).with_in_use(true),
    );
    assert!(!owning_reaches(&store, &orphan));
    Ok(())
}

fn owning_reaches(store: &MemStore, rel: &RelationshipRecord) -> bool {
    OwningNodeRelationshipChain::new(RelationshipChainExplorer::new(store), store)
        .is_reachable_from_owners(rel)
}

#[test]
fn depth_two_exploration_terminates_on_cyclic_chain() {
    let mut store = MemStore::new();
    store.put_node(NodeRecord::new(NodeId(1), RelId(1)).with_in_use(true));
    let start = store.put_relationship(
        RelationshipRecord::new(RelId(1), NodeId(1), NodeId(2), 0)
            .with_in_use(true)
            .with_first_next(RelId(2))
            .with_first_prev(RelId(3)),
    );
    store.put_relationship(
        RelationshipRecord::new(RelId(2), NodeId(1), NodeId(3), 0)
            .with_in_use(true)
            .with_first_next(RelId(3))
            .with_first_prev(RelId(1)),
    );
    store.put_relationship(
        RelationshipRecord::new(RelId(3), NodeId(4), NodeId(1), 0)
            .with_in_use(true)
            .with_second_next(RelId(1))
            .with_second_prev(RelId(2)),
    );
    let explorer = RelationshipChainExplorer::new(&store);

    let walk = explorer
        .walk_chain(&start, NodeId(1), RelationshipChainDirection::Next)
        .expect("start references node 1");
    assert_eq!(walk.end, ChainEnd::Cycle(RelId(1)));

    let records = explorer.explore_relationship_record_chains_to_depth_two(&start);
    assert_eq!(records.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
}
