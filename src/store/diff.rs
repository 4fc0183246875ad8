use std::collections::BTreeMap;

use super::record::{ArrayRecord, NodeRecord, PropertyRecord, RelationshipRecord, StringRecord};
use crate::access::{DiffRecordAccess, RecordAccess, RecordReference};
use crate::types::{DynamicId, NodeId, PropertyId, RelId};

/// Records written by a pending transaction, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub(crate) nodes: BTreeMap<NodeId, NodeRecord>,
    pub(crate) relationships: BTreeMap<RelId, RelationshipRecord>,
    pub(crate) properties: BTreeMap<PropertyId, PropertyRecord>,
    pub(crate) strings: BTreeMap<DynamicId, StringRecord>,
    pub(crate) arrays: BTreeMap<DynamicId, ArrayRecord>,
}

impl ChangeSet {
    /// Returns true if nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of staged records across every kind.
    pub fn len(&self) -> usize {
        self.nodes.len()
            + self.relationships.len()
            + self.properties.len()
            + self.strings.len()
            + self.arrays.len()
    }

    /// Staged node records in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.values()
    }

    /// Staged relationship records in id order.
    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipRecord> {
        self.relationships.values()
    }
}

/// Pending-transaction overlay over a committed store.
///
/// Plain accessors resolve the pending layer first and fall back to the committed
/// store for ids the transaction does not touch.
#[derive(Debug)]
pub struct DiffStore<'a, S: ?Sized> {
    previous: &'a S,
    changes: ChangeSet,
}

impl<'a, S: RecordAccess + ?Sized> DiffStore<'a, S> {
    /// Creates an overlay with no pending changes.
    pub fn new(previous: &'a S) -> Self {
        Self {
            previous,
            changes: ChangeSet::default(),
        }
    }

    /// Committed store underneath the overlay.
    pub fn previous(&self) -> &'a S {
        self.previous
    }

    /// Changes staged so far.
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Consumes the overlay, returning its staged changes.
    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }

    /// Pending node records in id order.
    pub fn changed_nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.changes.nodes()
    }

    /// Pending relationship records in id order.
    pub fn changed_relationships(&self) -> impl Iterator<Item = &RelationshipRecord> {
        self.changes.relationships()
    }

    /// Stages a node write.
    pub fn stage_node(&mut self, record: NodeRecord) {
        self.changes.nodes.insert(record.id, record);
    }

    /// Stages a relationship write.
    pub fn stage_relationship(&mut self, record: RelationshipRecord) {
        self.changes.relationships.insert(record.id, record);
    }

    /// Stages a property write.
    pub fn stage_property(&mut self, record: PropertyRecord) {
        self.changes.properties.insert(record.id, record);
    }

    /// Stages a string block write.
    pub fn stage_string(&mut self, record: StringRecord) {
        self.changes.strings.insert(record.id, record);
    }

    /// Stages an array block write.
    pub fn stage_array(&mut self, record: ArrayRecord) {
        self.changes.arrays.insert(record.id, record);
    }
}

impl<S: RecordAccess + ?Sized> RecordAccess for DiffStore<'_, S> {
    fn node(&self, id: NodeId) -> RecordReference<NodeRecord> {
        match self.changes.nodes.get(&id) {
            Some(record) => RecordReference::Direct(record.clone()),
            None => self.previous.node(id),
        }
    }

    fn relationship(&self, id: RelId) -> RecordReference<RelationshipRecord> {
        match self.changes.relationships.get(&id) {
            Some(record) => RecordReference::Direct(record.clone()),
            None => self.previous.relationship(id),
        }
    }

    fn property(&self, id: PropertyId) -> RecordReference<PropertyRecord> {
        match self.changes.properties.get(&id) {
            Some(record) => RecordReference::Direct(record.clone()),
            None => self.previous.property(id),
        }
    }

    fn string(&self, id: DynamicId) -> RecordReference<StringRecord> {
        match self.changes.strings.get(&id) {
            Some(record) => RecordReference::Direct(record.clone()),
            None => self.previous.string(id),
        }
    }

    fn array(&self, id: DynamicId) -> RecordReference<ArrayRecord> {
        match self.changes.arrays.get(&id) {
            Some(record) => RecordReference::Direct(record.clone()),
            None => self.previous.array(id),
        }
    }
}

impl<S: RecordAccess + ?Sized> DiffRecordAccess for DiffStore<'_, S> {
    fn previous_node(&self, id: NodeId) -> RecordReference<NodeRecord> {
        self.previous.node(id)
    }

    fn previous_relationship(&self, id: RelId) -> RecordReference<RelationshipRecord> {
        self.previous.relationship(id)
    }

    fn previous_property(&self, id: PropertyId) -> RecordReference<PropertyRecord> {
        self.previous.property(id)
    }

    fn changed_node(&self, id: NodeId) -> Option<NodeRecord> {
        self.changes.nodes.get(&id).cloned()
    }

    fn changed_relationship(&self, id: RelId) -> Option<RelationshipRecord> {
        self.changes.relationships.get(&id).cloned()
    }

    fn changed_property(&self, id: PropertyId) -> Option<PropertyRecord> {
        self.changes.properties.get(&id).cloned()
    }

    fn changed_string(&self, id: DynamicId) -> Option<StringRecord> {
        self.changes.strings.get(&id).cloned()
    }

    fn changed_array(&self, id: DynamicId) -> Option<ArrayRecord> {
        self.changes.arrays.get(&id).cloned()
    }
}
