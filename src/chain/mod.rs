//! Relationship chain traversal.
//!
//! A node's relationships form a doubly-linked chain threaded through the four
//! pointer slots of each relationship record. This module names those slots,
//! walks chains over a possibly corrupt store, and collects what it finds into
//! id-keyed [`RecordSet`]s.

mod explorer;
mod field;
mod owning;
mod record_set;

/// Chain walking.
pub use explorer::{ChainClosure, ChainEnd, ChainWalk, RelationshipChainExplorer};
/// Pointer slot descriptors.
pub use field::{RelationshipChainDirection, RelationshipChainField, RelationshipNodeField};
/// Chains exposed by a relationship's owning nodes.
pub use owning::OwningNodeRelationshipChain;
/// Id-keyed record collection.
pub use record_set::RecordSet;
