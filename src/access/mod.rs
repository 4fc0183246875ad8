//! Record resolution by id.
//!
//! Every accessor hands back a [`RecordReference`] rather than a record. Traversal
//! code force-loads references and pattern matches on [`Loaded`], which lets it keep
//! walking over records that are not in use. Checking code dispatches references to a
//! [`PendingReferenceCheck`], which a filtered view answers with a skip instead.

mod filter;

pub use filter::{RecordCategories, RecordCategory, RecordFilter, SkippingRecordAccess};

use crate::store::{
    ArrayRecord, NodeRecord, PropertyRecord, Record, RelationshipRecord, StringRecord,
};
use crate::types::{CheckError, DynamicId, NodeId, PropertyId, RelId, Result};

/// Outcome of force-loading a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Loaded<R> {
    /// The record is in use.
    Found(R),
    /// The slot is free or logically deleted; the record must not be followed further.
    NotInUse(R),
}

impl<R> Loaded<R> {
    /// Borrows the loaded record regardless of its state.
    pub fn record(&self) -> &R {
        match self {
            Loaded::Found(record) | Loaded::NotInUse(record) => record,
        }
    }

    /// Consumes the outcome and returns the record regardless of its state.
    pub fn into_record(self) -> R {
        match self {
            Loaded::Found(record) | Loaded::NotInUse(record) => record,
        }
    }

    /// Returns true for [`Loaded::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, Loaded::Found(_))
    }
}

/// Receiver of a resolved reference registered by a record check.
pub trait PendingReferenceCheck<R> {
    /// Called with the referenced record once it is resolved.
    fn check_reference(&mut self, referenced: &R);

    /// Called instead of [`PendingReferenceCheck::check_reference`] when the
    /// reference belongs to a category the current access does not check.
    fn skip(&mut self);
}

/// Handle to a record returned by a [`RecordAccess`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordReference<R> {
    /// Snapshot copied out of the backing store.
    Direct(R),
    /// The access is scoped away from this record's category.
    Skip {
        /// Raw id of the skipped record.
        id: u64,
    },
}

impl<R: Record> RecordReference<R> {
    /// Resolves the reference without ever failing.
    ///
    /// A skipped reference resolves to the blank record for its id, which traversal
    /// treats like any other record that is not in use.
    pub fn force_load(self) -> Loaded<R> {
        let record = match self {
            RecordReference::Direct(record) => record,
            RecordReference::Skip { id } => R::unused(id),
        };
        if record.is_in_use() {
            Loaded::Found(record)
        } else {
            Loaded::NotInUse(record)
        }
    }

    /// Resolves the reference, failing if the record is not in use or skipped.
    pub fn load(self) -> Result<R> {
        match self.force_load() {
            Loaded::Found(record) => Ok(record),
            Loaded::NotInUse(record) => Err(CheckError::NotFound {
                kind: R::KIND,
                id: record.raw_id(),
            }),
        }
    }

    /// Hands the resolved record to `check`, or tells it the reference was skipped.
    pub fn dispatch<C>(self, check: &mut C)
    where
        C: PendingReferenceCheck<R> + ?Sized,
    {
        match self {
            RecordReference::Direct(record) => check.check_reference(&record),
            RecordReference::Skip { .. } => check.skip(),
        }
    }

    /// Returns true if this reference was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, RecordReference::Skip { .. })
    }
}

/// Capability to resolve ids to records of every kind.
pub trait RecordAccess {
    /// Node record by id.
    fn node(&self, id: NodeId) -> RecordReference<NodeRecord>;

    /// Relationship record by id.
    fn relationship(&self, id: RelId) -> RecordReference<RelationshipRecord>;

    /// Property record by id.
    fn property(&self, id: PropertyId) -> RecordReference<PropertyRecord>;

    /// String block by id.
    fn string(&self, id: DynamicId) -> RecordReference<StringRecord>;

    /// Array block by id.
    fn array(&self, id: DynamicId) -> RecordReference<ArrayRecord>;
}

/// Record access over a committed store plus the changes of a pending transaction.
///
/// The plain [`RecordAccess`] accessors answer with the state the transaction would
/// produce. `previous_*` answer with the committed state and `changed_*` return only
/// records the transaction touches.
pub trait DiffRecordAccess: RecordAccess {
    /// Committed node state.
    fn previous_node(&self, id: NodeId) -> RecordReference<NodeRecord>;

    /// Committed relationship state.
    fn previous_relationship(&self, id: RelId) -> RecordReference<RelationshipRecord>;

    /// Committed property state.
    fn previous_property(&self, id: PropertyId) -> RecordReference<PropertyRecord>;

    /// Pending node change, if any.
    fn changed_node(&self, id: NodeId) -> Option<NodeRecord>;

    /// Pending relationship change, if any.
    fn changed_relationship(&self, id: RelId) -> Option<RelationshipRecord>;

    /// Pending property change, if any.
    fn changed_property(&self, id: PropertyId) -> Option<PropertyRecord>;

    /// Pending string block change, if any.
    fn changed_string(&self, id: DynamicId) -> Option<StringRecord>;

    /// Pending array block change, if any.
    fn changed_array(&self, id: DynamicId) -> Option<ArrayRecord>;
}

impl<A: RecordAccess + ?Sized> RecordAccess for &A {
    fn node(&self, id: NodeId) -> RecordReference<NodeRecord> {
        (**self).node(id)
    }

    fn relationship(&self, id: RelId) -> RecordReference<RelationshipRecord> {
        (**self).relationship(id)
    }

    fn property(&self, id: PropertyId) -> RecordReference<PropertyRecord> {
        (**self).property(id)
    }

    fn string(&self, id: DynamicId) -> RecordReference<StringRecord> {
        (**self).string(id)
    }

    fn array(&self, id: DynamicId) -> RecordReference<ArrayRecord> {
        (**self).array(id)
    }
}

impl<A: DiffRecordAccess + ?Sized> DiffRecordAccess for &A {
    fn previous_node(&self, id: NodeId) -> RecordReference<NodeRecord> {
        (**self).previous_node(id)
    }

    fn previous_relationship(&self, id: RelId) -> RecordReference<RelationshipRecord> {
        (**self).previous_relationship(id)
    }

    fn previous_property(&self, id: PropertyId) -> RecordReference<PropertyRecord> {
        (**self).previous_property(id)
    }

    fn changed_node(&self, id: NodeId) -> Option<NodeRecord> {
        (**self).changed_node(id)
    }

    fn changed_relationship(&self, id: RelId) -> Option<RelationshipRecord> {
        (**self).changed_relationship(id)
    }

    fn changed_property(&self, id: PropertyId) -> Option<PropertyRecord> {
        (**self).changed_property(id)
    }

    fn changed_string(&self, id: DynamicId) -> Option<StringRecord> {
        (**self).changed_string(id)
    }

    fn changed_array(&self, id: DynamicId) -> Option<ArrayRecord> {
        (**self).changed_array(id)
    }
}
