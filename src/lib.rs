//! Consistency checking and repair for sombra's record store.
//!
//! Node records own a head pointer into a doubly-linked chain of relationship
//! records. This crate walks those chains over a store that may already be corrupt,
//! classifies broken links, and works out which relationship records can be removed
//! without leaving a live node pointing at a removed record.

#![warn(missing_docs)]

pub mod access;
pub mod chain;
pub mod check;
pub mod logging;
pub mod options;
pub mod repair;
pub mod store;
pub mod types;

pub use access::{DiffRecordAccess, RecordAccess, RecordFilter};
pub use chain::{RecordSet, RelationshipChainExplorer};
pub use check::{ConsistencyReport, IncrementalCheck, RecordChecker};
pub use options::CheckOptions;
pub use repair::{Diagnostics, RecordRemover, RelationshipRemovalStrategy};
pub use store::{DiffStore, MemStore, NodeRecord, RelationshipRecord};
pub use types::{CheckError, NodeId, RelId, Result};
