//! Record model and in-memory stores.
//!
//! The on-disk store is not part of this crate; [`MemStore`] stands in for it when
//! embedding or testing the engine, and [`DiffStore`] layers the changes of a pending
//! transaction over any [`crate::access::RecordAccess`].

mod diff;
mod mem;
mod record;

/// Pending-transaction overlay and its change set.
pub use diff::{ChangeSet, DiffStore};

/// In-memory committed store.
pub use mem::MemStore;

/// Record types.
pub use record::{
    ArrayBlocks, ArrayRecord, DynamicRecord, DynamicStore, NodeRecord, PropertyRecord, Record,
    RelationshipRecord, StringBlocks, StringRecord,
};
