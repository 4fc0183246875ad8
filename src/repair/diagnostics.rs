use serde::Serialize;
use tracing::warn;

use crate::chain::RecordSet;
use crate::store::{NodeRecord, RelationshipRecord};
use crate::types::RelId;

/// Sink for findings of a repair pass that are not removals.
///
/// Implementations must not fail; the repair pass carries on after every call.
pub trait Diagnostics {
    /// Called when `node`'s head pointer roots into `closure`, so the closure is
    /// withheld from removal.
    fn removal_of_relationships_prevented_by(
        &mut self,
        node: &NodeRecord,
        closure: &RecordSet<RelationshipRecord>,
    );
}

impl<T: Diagnostics + ?Sized> Diagnostics for &mut T {
    fn removal_of_relationships_prevented_by(
        &mut self,
        node: &NodeRecord,
        closure: &RecordSet<RelationshipRecord>,
    ) {
        (**self).removal_of_relationships_prevented_by(node, closure);
    }
}

/// [`Diagnostics`] that emits a `warn!` event per blocked closure.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingDiagnostics;

impl Diagnostics for LoggingDiagnostics {
    fn removal_of_relationships_prevented_by(
        &mut self,
        node: &NodeRecord,
        closure: &RecordSet<RelationshipRecord>,
    ) {
        let ids: Vec<u64> = closure.ids().collect();
        warn!(
            node = node.id.0,
            head = %node.next_rel,
            closure = ?ids,
            "repair.removal.prevented"
        );
    }
}

/// One blocked closure as seen by [`CollectingDiagnostics`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PreventedRemoval {
    /// Node whose head pointer roots into the closure.
    #[serde(serialize_with = "serialize_node_id")]
    pub node: NodeRecord,
    /// Closure ids in ascending order.
    pub closure: Vec<RelId>,
}

fn serialize_node_id<S: serde::Serializer>(
    node: &NodeRecord,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(node.id.0)
}

/// [`Diagnostics`] that keeps every call for later inspection.
#[derive(Clone, Debug, Default)]
pub struct CollectingDiagnostics {
    prevented: Vec<PreventedRemoval>,
}

impl CollectingDiagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far, in order.
    pub fn prevented(&self) -> &[PreventedRemoval] {
        &self.prevented
    }

    /// Consumes the collector.
    pub fn into_prevented(self) -> Vec<PreventedRemoval> {
        self.prevented
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn removal_of_relationships_prevented_by(
        &mut self,
        node: &NodeRecord,
        closure: &RecordSet<RelationshipRecord>,
    ) {
        self.prevented.push(PreventedRemoval {
            node: node.clone(),
            closure: closure.iter().map(|rel| rel.id).collect(),
        });
    }
}
