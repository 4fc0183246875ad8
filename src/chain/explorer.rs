use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use super::field::{RelationshipChainDirection, RelationshipNodeField};
use super::record_set::RecordSet;
use crate::access::RecordAccess;
use crate::store::RelationshipRecord;
use crate::types::{CheckError, NodeId, RelId, Result};

/// Why a chain walk stopped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChainEnd {
    /// The last record's slot held the sentinel.
    Sentinel,
    /// The last record reached is not in use.
    Dangling(RelId),
    /// The last record reached is in use but does not reference the walked node.
    ForeignChain(RelId),
    /// The next id had already been visited by this walk.
    Cycle(RelId),
    /// The visit budget ran out before the chain ended.
    BudgetExhausted,
}

impl ChainEnd {
    /// Returns true if the walk ended the way an intact chain ends.
    pub fn is_clean(self) -> bool {
        matches!(self, ChainEnd::Sentinel)
    }
}

/// Records collected by one directional walk, and how the walk ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainWalk {
    /// Every record visited, the starting record included.
    pub records: RecordSet<RelationshipRecord>,
    /// Reason the walk stopped.
    pub end: ChainEnd,
}

/// Depth-two chain closure of one relationship.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainClosure {
    /// Every record collected.
    pub records: RecordSet<RelationshipRecord>,
    /// False if a walk stopped on its visit budget, leaving records uncollected.
    pub complete: bool,
}

/// Walks relationship chains through a [`RecordAccess`], tolerating corruption.
///
/// Each walk stops at the first record that is not in use, never revisits an id, and
/// gives up once the optional visit budget is spent.
pub struct RelationshipChainExplorer<'a, A: ?Sized> {
    access: &'a A,
    visit_budget: Option<usize>,
}

impl<A: ?Sized> Clone for RelationshipChainExplorer<'_, A> {
    fn clone(&self) -> Self {
        Self {
            access: self.access,
            visit_budget: self.visit_budget,
        }
    }
}

impl<'a, A: RecordAccess + ?Sized> RelationshipChainExplorer<'a, A> {
    /// Creates an explorer with no visit budget.
    pub fn new(access: &'a A) -> Self {
        Self {
            access,
            visit_budget: None,
        }
    }

    /// Caps the number of records a single walk may collect.
    pub fn with_visit_budget(mut self, budget: Option<usize>) -> Self {
        self.visit_budget = budget;
        self
    }

    /// Chain currently exposed by `node`, starting at its head relationship `head`
    /// and following next pointers.
    pub fn follow_chain_from_node(
        &self,
        node: NodeId,
        head: RelId,
    ) -> RecordSet<RelationshipRecord> {
        if head.is_none() {
            return RecordSet::new();
        }
        let record = self.access.relationship(head).force_load().into_record();
        self.walk(&record, node, RelationshipChainDirection::Next)
            .records
    }

    /// Records reachable from `record` along `node`'s chain in `direction`.
    pub fn expand_chain(
        &self,
        record: &RelationshipRecord,
        node: NodeId,
        direction: RelationshipChainDirection,
    ) -> Result<RecordSet<RelationshipRecord>> {
        Ok(self.walk_chain(record, node, direction)?.records)
    }

    /// Same as [`Self::expand_chain`] but also reports how the walk ended.
    pub fn walk_chain(
        &self,
        record: &RelationshipRecord,
        node: NodeId,
        direction: RelationshipChainDirection,
    ) -> Result<ChainWalk> {
        ensure_endpoint(record, node)?;
        Ok(self.walk(record, node, direction))
    }

    /// Union of the prev and next walks from `record` along `node`'s chain.
    pub fn expand_chain_in_both_directions(
        &self,
        record: &RelationshipRecord,
        node: NodeId,
    ) -> Result<RecordSet<RelationshipRecord>> {
        ensure_endpoint(record, node)?;
        Ok(self.both_directions(record, node, &mut true))
    }

    /// Chains around both endpoints of `record`, plus the chains at the far endpoint
    /// of every relationship found there.
    pub fn explore_relationship_record_chains_to_depth_two(
        &self,
        record: &RelationshipRecord,
    ) -> RecordSet<RelationshipRecord> {
        self.explore_depth_two_closure(record).records
    }

    /// Same as [`Self::explore_relationship_record_chains_to_depth_two`] but also
    /// reports whether any walk gave up on its visit budget.
    pub fn explore_depth_two_closure(&self, record: &RelationshipRecord) -> ChainClosure {
        let mut closure = ChainClosure {
            records: RecordSet::new(),
            complete: true,
        };
        for endpoint in RelationshipNodeField::ALL {
            let node = endpoint.get(record);
            let chain = self.both_directions(record, node, &mut closure.complete);
            for member in &chain {
                let far = member.other_node(node);
                let records = self.both_directions(member, far, &mut closure.complete);
                closure.records.add_all(&records);
            }
        }
        closure
    }

    fn both_directions(
        &self,
        record: &RelationshipRecord,
        node: NodeId,
        complete: &mut bool,
    ) -> RecordSet<RelationshipRecord> {
        let mut records = RecordSet::new();
        for direction in RelationshipChainDirection::ALL {
            let walk = self.walk(record, node, direction);
            *complete &= walk.end != ChainEnd::BudgetExhausted;
            records.add_all(&walk.records);
        }
        records
    }

    /// Walks without validating that `record` references `node`; a start record that
    /// does not ends the walk immediately as a foreign chain.
    pub(crate) fn walk(
        &self,
        record: &RelationshipRecord,
        node: NodeId,
        direction: RelationshipChainDirection,
    ) -> ChainWalk {
        let mut records = RecordSet::new();
        let mut visited = FxHashSet::default();
        visited.insert(record.id);
        records.add(record.clone());

        let mut current = record.clone();
        let end = loop {
            if !current.in_use {
                debug!(rel = current.id.0, node = node.0, "chain.walk.dangling");
                break ChainEnd::Dangling(current.id);
            }
            let Some(endpoint) = RelationshipNodeField::select(&current, node) else {
                break ChainEnd::ForeignChain(current.id);
            };
            let next = direction.field(endpoint).rel_of(&current);
            if next.is_none() {
                break ChainEnd::Sentinel;
            }
            if !visited.insert(next) {
                warn!(
                    rel = next.0,
                    node = node.0,
                    direction = ?direction,
                    "chain.walk.cycle"
                );
                break ChainEnd::Cycle(next);
            }
            if self.visit_budget.is_some_and(|budget| visited.len() > budget) {
                debug!(
                    node = node.0,
                    visited = records.len(),
                    "chain.walk.budget_exhausted"
                );
                break ChainEnd::BudgetExhausted;
            }
            current = self.access.relationship(next).force_load().into_record();
            records.add(current.clone());
        };
        ChainWalk { records, end }
    }
}

fn ensure_endpoint(record: &RelationshipRecord, node: NodeId) -> Result<()> {
    if record.references(node) {
        Ok(())
    } else {
        Err(CheckError::NotAnEndpoint {
            rel: record.id,
            node,
        })
    }
}
