use rustc_hash::FxHashMap;
use tracing::trace;

use super::diff::ChangeSet;
use super::record::{
    ArrayRecord, NodeRecord, PropertyRecord, Record, RelationshipRecord, StringRecord,
};
use crate::access::{DiffRecordAccess, RecordAccess, RecordReference};
use crate::types::{CheckError, DynamicId, NodeId, PropertyId, RecordKind, RelId, Result};

/// In-memory record store.
///
/// `put_*` writes records verbatim, which is how tests stage corruption.
/// [`MemStore::create_node`] and [`MemStore::create_relationship`] keep relationship
/// chains consistent the way a live store does.
#[derive(Clone, Debug, Default)]
pub struct MemStore {
    nodes: FxHashMap<NodeId, NodeRecord>,
    relationships: FxHashMap<RelId, RelationshipRecord>,
    properties: FxHashMap<PropertyId, PropertyRecord>,
    strings: FxHashMap<DynamicId, StringRecord>,
    arrays: FxHashMap<DynamicId, ArrayRecord>,
}

impl MemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a node record as-is and returns a copy of it.
    pub fn put_node(&mut self, record: NodeRecord) -> NodeRecord {
        self.nodes.insert(record.id, record.clone());
        record
    }

    /// Writes a relationship record as-is and returns a copy of it.
    pub fn put_relationship(&mut self, record: RelationshipRecord) -> RelationshipRecord {
        self.relationships.insert(record.id, record.clone());
        record
    }

    /// Writes a property record as-is and returns a copy of it.
    pub fn put_property(&mut self, record: PropertyRecord) -> PropertyRecord {
        self.properties.insert(record.id, record.clone());
        record
    }

    /// Writes a string block as-is and returns a copy of it.
    pub fn put_string(&mut self, record: StringRecord) -> StringRecord {
        self.strings.insert(record.id, record.clone());
        record
    }

    /// Writes an array block as-is and returns a copy of it.
    pub fn put_array(&mut self, record: ArrayRecord) -> ArrayRecord {
        self.arrays.insert(record.id, record.clone());
        record
    }

    /// Creates an in-use node with an empty relationship chain.
    pub fn create_node(&mut self, id: NodeId) -> Result<NodeRecord> {
        if id.is_none() {
            return Err(CheckError::Invalid("node id is the none sentinel"));
        }
        if self.nodes.get(&id).is_some_and(|node| node.in_use) {
            return Err(CheckError::Invalid("node id already in use"));
        }
        Ok(self.put_node(NodeRecord::new(id, RelId::NONE).with_in_use(true)))
    }

    /// Creates an in-use relationship and links it in as the new head of both
    /// endpoint chains.
    pub fn create_relationship(
        &mut self,
        id: RelId,
        first: NodeId,
        second: NodeId,
        rel_type: u32,
    ) -> Result<RelationshipRecord> {
        if id.is_none() {
            return Err(CheckError::Invalid("relationship id is the none sentinel"));
        }
        if self.relationships.get(&id).is_some_and(|rel| rel.in_use) {
            return Err(CheckError::Invalid("relationship id already in use"));
        }
        let first_head = self.head_of(first)?;
        let second_head = self.head_of(second)?;

        let rel = RelationshipRecord::new(id, first, second, rel_type)
            .with_in_use(true)
            .with_first_next(first_head)
            .with_second_next(second_head);

        self.link_before(first_head, first, id);
        if second != first {
            self.link_before(second_head, second, id);
        }
        for node in [first, second] {
            if let Some(record) = self.nodes.get_mut(&node) {
                record.next_rel = id;
            }
        }
        trace!(rel = id.0, first = first.0, second = second.0, "store.relationship.created");
        Ok(self.put_relationship(rel))
    }

    /// Commits a set of pending changes.
    pub fn apply(&mut self, changes: ChangeSet) {
        let ChangeSet {
            nodes,
            relationships,
            properties,
            strings,
            arrays,
        } = changes;
        self.nodes.extend(nodes);
        self.relationships.extend(relationships);
        self.properties.extend(properties);
        self.strings.extend(strings);
        self.arrays.extend(arrays);
    }

    /// Borrows a stored relationship.
    pub fn get_relationship(&self, id: RelId) -> Option<&RelationshipRecord> {
        self.relationships.get(&id)
    }

    /// Borrows a stored node.
    pub fn get_node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    /// Ids of every stored relationship in ascending order.
    pub fn relationship_ids(&self) -> Vec<RelId> {
        let mut ids: Vec<RelId> = self.relationships.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of every stored node in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn head_of(&self, node: NodeId) -> Result<RelId> {
        match self.nodes.get(&node) {
            Some(record) if record.in_use => Ok(record.next_rel),
            _ => Err(CheckError::NotFound {
                kind: RecordKind::Node,
                id: node.0,
            }),
        }
    }

    fn link_before(&mut self, head: RelId, node: NodeId, new_head: RelId) {
        if head.is_none() {
            return;
        }
        if let Some(record) = self.relationships.get_mut(&head) {
            if record.first_node == node {
                record.first_prev_rel = new_head;
            }
            if record.second_node == node {
                record.second_prev_rel = new_head;
            }
        }
    }
}

fn snapshot<K, R>(table: &FxHashMap<K, R>, key: K, raw: u64) -> RecordReference<R>
where
    K: std::hash::Hash + Eq,
    R: Record,
{
    RecordReference::Direct(table.get(&key).cloned().unwrap_or_else(|| R::unused(raw)))
}

impl RecordAccess for MemStore {
    fn node(&self, id: NodeId) -> RecordReference<NodeRecord> {
        snapshot(&self.nodes, id, id.0)
    }

    fn relationship(&self, id: RelId) -> RecordReference<RelationshipRecord> {
        snapshot(&self.relationships, id, id.0)
    }

    fn property(&self, id: PropertyId) -> RecordReference<PropertyRecord> {
        snapshot(&self.properties, id, id.0)
    }

    fn string(&self, id: DynamicId) -> RecordReference<StringRecord> {
        snapshot(&self.strings, id, id.0)
    }

    fn array(&self, id: DynamicId) -> RecordReference<ArrayRecord> {
        snapshot(&self.arrays, id, id.0)
    }
}

// A committed store has no pending transaction.
impl DiffRecordAccess for MemStore {
    fn previous_node(&self, id: NodeId) -> RecordReference<NodeRecord> {
        self.node(id)
    }

    fn previous_relationship(&self, id: RelId) -> RecordReference<RelationshipRecord> {
        self.relationship(id)
    }

    fn previous_property(&self, id: PropertyId) -> RecordReference<PropertyRecord> {
        self.property(id)
    }

    fn changed_node(&self, _id: NodeId) -> Option<NodeRecord> {
        None
    }

    fn changed_relationship(&self, _id: RelId) -> Option<RelationshipRecord> {
        None
    }

    fn changed_property(&self, _id: PropertyId) -> Option<PropertyRecord> {
        None
    }

    fn changed_string(&self, _id: DynamicId) -> Option<StringRecord> {
        None
    }

    fn changed_array(&self, _id: DynamicId) -> Option<ArrayRecord> {
        None
    }
}
