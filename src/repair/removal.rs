use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::diagnostics::Diagnostics;
use super::remover::RecordRemover;
use crate::access::RecordAccess;
use crate::chain::{ChainClosure, RecordSet, RelationshipChainExplorer, RelationshipNodeField};
use crate::options::CheckOptions;
use crate::store::{NodeRecord, RelationshipRecord};
use crate::types::{NodeId, RelId, Result};

/// Closure withheld from removal because a node still roots into it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockedRemoval {
    /// Inconsistent input record whose closure was withheld.
    pub relationship: RelId,
    /// Node whose head pointer addresses a member of the closure.
    pub node: NodeId,
    /// Closure ids in ascending order.
    pub closure: Vec<RelId>,
}

/// Outcome of [`RelationshipRemovalStrategy::evaluate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    /// Records issued to the remover, in ascending id order.
    pub removed: Vec<RelId>,
    /// Closures withheld, one entry per input record and blocking node.
    pub blocked: Vec<BlockedRemoval>,
    /// Input records whose closure was withheld because a walk ran out of visit
    /// budget before reaching the end of its chain.
    pub unexplored: Vec<RelId>,
}

impl RemovalReport {
    /// Returns true if no closure was withheld.
    pub fn is_complete(&self) -> bool {
        self.blocked.is_empty() && self.unexplored.is_empty()
    }
}

/// Decides which relationship records can be removed to get rid of a batch of
/// inconsistent ones.
///
/// Every inconsistent record drags in its depth-two chain closure. The closure is
/// removed only if no node's head pointer addresses any of its members; otherwise
/// the whole closure is withheld and the blocking node is reported. A closure that
/// the chain visit budget cut short is withheld as well. Records from
/// every safe closure are deduplicated and issued once each.
pub struct RelationshipRemovalStrategy<'a, A: ?Sized, R, D> {
    access: &'a A,
    remover: R,
    diagnostics: D,
    visit_budget: Option<usize>,
}

impl<'a, A, R, D> RelationshipRemovalStrategy<'a, A, R, D>
where
    A: RecordAccess + ?Sized,
    R: RecordRemover,
    D: Diagnostics,
{
    /// Creates a strategy reading from `access`.
    pub fn new(access: &'a A, remover: R, diagnostics: D) -> Self {
        Self {
            access,
            remover,
            diagnostics,
            visit_budget: None,
        }
    }

    /// Applies the chain visit budget from `options`.
    pub fn with_options(mut self, options: &CheckOptions) -> Self {
        self.visit_budget = options.chain_visit_budget;
        self
    }

    /// Evaluates `relationships` and issues every safe removal.
    ///
    /// Only a failing remover makes this return an error; removals issued before the
    /// failure stay issued.
    pub fn evaluate(&mut self, relationships: &[RelationshipRecord]) -> Result<RemovalReport> {
        let explorer =
            RelationshipChainExplorer::new(self.access).with_visit_budget(self.visit_budget);
        let mut to_be_deleted = RecordSet::new();
        let mut reported: FxHashSet<(NodeId, Vec<RelId>)> = FxHashSet::default();
        let mut blocked = Vec::new();
        let mut unexplored = Vec::new();

        for inconsistent in relationships {
            let ChainClosure { records: closure, complete } =
                explorer.explore_depth_two_closure(inconsistent);
            if !complete {
                warn!(
                    rel = inconsistent.id.0,
                    collected = closure.len(),
                    "repair.removal.unexplored"
                );
                unexplored.push(inconsistent.id);
                continue;
            }
            let blockers = self.blocking_nodes(&closure);
            if blockers.is_empty() {
                debug!(
                    rel = inconsistent.id.0,
                    closure = closure.len(),
                    "repair.removal.closure"
                );
                to_be_deleted.add_all(&closure);
                continue;
            }

            let ids: Vec<RelId> = closure.iter().map(|rel| rel.id).collect();
            for node in blockers {
                if reported.insert((node.id, ids.clone())) {
                    self.diagnostics
                        .removal_of_relationships_prevented_by(&node, &closure);
                }
                blocked.push(BlockedRemoval {
                    relationship: inconsistent.id,
                    node: node.id,
                    closure: ids.clone(),
                });
            }
        }

        let mut removed = Vec::with_capacity(to_be_deleted.len());
        for record in &to_be_deleted {
            self.remover.remove(record)?;
            removed.push(record.id);
        }
        info!(
            inputs = relationships.len(),
            removed = removed.len(),
            blocked = blocked.len(),
            unexplored = unexplored.len(),
            "repair.removal.issued"
        );
        Ok(RemovalReport {
            removed,
            blocked,
            unexplored,
        })
    }

    /// Gives back the remover and diagnostics sink.
    pub fn into_parts(self) -> (R, D) {
        (self.remover, self.diagnostics)
    }

    fn blocking_nodes(&self, closure: &RecordSet<RelationshipRecord>) -> Vec<NodeRecord> {
        let mut blockers: Vec<NodeRecord> = Vec::new();
        for rel in closure {
            for endpoint in RelationshipNodeField::ALL {
                let id = endpoint.get(rel);
                if id.is_none() {
                    continue;
                }
                let node = self.access.node(id).force_load().into_record();
                if node.next_rel == rel.id && !blockers.iter().any(|seen| seen.id == node.id) {
                    blockers.push(node);
                }
            }
        }
        blockers
    }
}
