use std::fmt;
use std::marker::PhantomData;

use crate::types::{DynamicId, NodeId, PropertyId, RecordKind, RelId};

/// Common surface of every fixed-size record.
pub trait Record: Clone + fmt::Debug {
    /// Kind of record this type represents.
    const KIND: RecordKind;

    /// Raw 64-bit id of the record.
    fn raw_id(&self) -> u64;

    /// Whether the slot holds live data.
    fn is_in_use(&self) -> bool;

    /// Blank, not-in-use record returned when force-loading an empty slot.
    fn unused(id: u64) -> Self;
}

/// Node record: owns the head pointer into its relationship chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    /// Record id.
    pub id: NodeId,
    /// Whether the slot holds live data.
    pub in_use: bool,
    /// Head of the relationship chain.
    pub next_rel: RelId,
    /// Head of the property chain.
    pub next_prop: PropertyId,
}

impl NodeRecord {
    /// Creates a not-in-use node record with the given head pointer.
    pub fn new(id: NodeId, next_rel: RelId) -> Self {
        Self {
            id,
            in_use: false,
            next_rel,
            next_prop: PropertyId::NONE,
        }
    }

    /// Sets the in-use flag.
    pub fn with_in_use(mut self, in_use: bool) -> Self {
        self.in_use = in_use;
        self
    }

    /// Sets the property chain head.
    pub fn with_next_prop(mut self, next_prop: PropertyId) -> Self {
        self.next_prop = next_prop;
        self
    }
}

impl Record for NodeRecord {
    const KIND: RecordKind = RecordKind::Node;

    fn raw_id(&self) -> u64 {
        self.id.0
    }

    fn is_in_use(&self) -> bool {
        self.in_use
    }

    fn unused(id: u64) -> Self {
        NodeRecord::new(NodeId(id), RelId::NONE)
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node[{},used={},rel={},prop={}]",
            self.id.0, self.in_use, self.next_rel, self.next_prop
        )
    }
}

/// Relationship record with one prev/next pair per endpoint node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipRecord {
    /// Record id.
    pub id: RelId,
    /// Whether the slot holds live data.
    pub in_use: bool,
    /// First endpoint.
    pub first_node: NodeId,
    /// Second endpoint.
    pub second_node: NodeId,
    /// Relationship type token.
    pub rel_type: u32,
    /// Previous relationship in the first node's chain.
    pub first_prev_rel: RelId,
    /// Next relationship in the first node's chain.
    pub first_next_rel: RelId,
    /// Previous relationship in the second node's chain.
    pub second_prev_rel: RelId,
    /// Next relationship in the second node's chain.
    pub second_next_rel: RelId,
    /// Head of the property chain.
    pub next_prop: PropertyId,
}

impl RelationshipRecord {
    /// Creates a not-in-use relationship with every chain pointer unset.
    pub fn new(id: RelId, first_node: NodeId, second_node: NodeId, rel_type: u32) -> Self {
        Self {
            id,
            in_use: false,
            first_node,
            second_node,
            rel_type,
            first_prev_rel: RelId::NONE,
            first_next_rel: RelId::NONE,
            second_prev_rel: RelId::NONE,
            second_next_rel: RelId::NONE,
            next_prop: PropertyId::NONE,
        }
    }

    /// Sets the in-use flag.
    pub fn with_in_use(mut self, in_use: bool) -> Self {
        self.in_use = in_use;
        self
    }

    /// Sets the first node's prev pointer.
    pub fn with_first_prev(mut self, rel: RelId) -> Self {
        self.first_prev_rel = rel;
        self
    }

    /// Sets the first node's next pointer.
    pub fn with_first_next(mut self, rel: RelId) -> Self {
        self.first_next_rel = rel;
        self
    }

    /// Sets the second node's prev pointer.
    pub fn with_second_prev(mut self, rel: RelId) -> Self {
        self.second_prev_rel = rel;
        self
    }

    /// Sets the second node's next pointer.
    pub fn with_second_next(mut self, rel: RelId) -> Self {
        self.second_next_rel = rel;
        self
    }

    /// Returns true if `node` is either endpoint.
    pub fn references(&self, node: NodeId) -> bool {
        self.first_node == node || self.second_node == node
    }

    /// Returns the endpoint opposite `node`, preferring the second endpoint when
    /// `node` is the first one.
    pub fn other_node(&self, node: NodeId) -> NodeId {
        if self.first_node == node {
            self.second_node
        } else {
            self.first_node
        }
    }
}

impl Record for RelationshipRecord {
    const KIND: RecordKind = RecordKind::Relationship;

    fn raw_id(&self) -> u64 {
        self.id.0
    }

    fn is_in_use(&self) -> bool {
        self.in_use
    }

    fn unused(id: u64) -> Self {
        RelationshipRecord::new(RelId(id), NodeId::NONE, NodeId::NONE, 0)
    }
}

impl fmt::Display for RelationshipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Relationship[{},used={},source={},target={},type={},sPrev={},sNext={},tPrev={},tNext={},prop={}]",
            self.id.0,
            self.in_use,
            self.first_node,
            self.second_node,
            self.rel_type,
            self.first_prev_rel,
            self.first_next_rel,
            self.second_prev_rel,
            self.second_next_rel,
            self.next_prop
        )
    }
}

/// Property record, one link in an owner's property chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRecord {
    /// Record id.
    pub id: PropertyId,
    /// Whether the slot holds live data.
    pub in_use: bool,
    /// Previous property record in the owner's chain.
    pub prev_prop: PropertyId,
    /// Next property record in the owner's chain.
    pub next_prop: PropertyId,
}

impl PropertyRecord {
    /// Creates a not-in-use property record.
    pub fn new(id: PropertyId) -> Self {
        Self {
            id,
            in_use: false,
            prev_prop: PropertyId::NONE,
            next_prop: PropertyId::NONE,
        }
    }

    /// Sets the in-use flag.
    pub fn with_in_use(mut self, in_use: bool) -> Self {
        self.in_use = in_use;
        self
    }
}

impl Record for PropertyRecord {
    const KIND: RecordKind = RecordKind::Property;

    fn raw_id(&self) -> u64 {
        self.id.0
    }

    fn is_in_use(&self) -> bool {
        self.in_use
    }

    fn unused(id: u64) -> Self {
        PropertyRecord::new(PropertyId(id))
    }
}

/// Dynamic store a [`DynamicRecord`] lives in.
pub trait DynamicStore: Copy + fmt::Debug + Eq {
    /// Kind reported for blocks of this store.
    const KIND: RecordKind;
}

/// Blocks of the string store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StringBlocks;

impl DynamicStore for StringBlocks {
    const KIND: RecordKind = RecordKind::String;
}

/// Blocks of the array store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArrayBlocks;

impl DynamicStore for ArrayBlocks {
    const KIND: RecordKind = RecordKind::Array;
}

/// Overflow block holding part of a string or array value. String and array blocks
/// share a layout; `S` keeps them apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamicRecord<S> {
    /// Record id.
    pub id: DynamicId,
    /// Whether the slot holds live data.
    pub in_use: bool,
    /// Next block of the same value.
    pub next_block: DynamicId,
    /// Payload bytes stored in this block.
    pub length: u32,
    store: PhantomData<S>,
}

/// Block of the string store.
pub type StringRecord = DynamicRecord<StringBlocks>;

/// Block of the array store.
pub type ArrayRecord = DynamicRecord<ArrayBlocks>;

impl<S: DynamicStore> DynamicRecord<S> {
    /// Creates a not-in-use dynamic record.
    pub fn new(id: DynamicId) -> Self {
        Self {
            id,
            in_use: false,
            next_block: DynamicId::NONE,
            length: 0,
            store: PhantomData,
        }
    }

    /// Sets the in-use flag.
    pub fn with_in_use(mut self, in_use: bool) -> Self {
        self.in_use = in_use;
        self
    }
}

impl<S: DynamicStore> Record for DynamicRecord<S> {
    const KIND: RecordKind = S::KIND;

    fn raw_id(&self) -> u64 {
        self.id.0
    }

    fn is_in_use(&self) -> bool {
        self.in_use
    }

    fn unused(id: u64) -> Self {
        DynamicRecord::new(DynamicId(id))
    }
}
