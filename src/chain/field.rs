use crate::check::ReferenceInconsistency;
use crate::store::RelationshipRecord;
use crate::types::{CheckError, NodeId, RelId, Result};

/// Endpoint slot of a relationship record.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RelationshipNodeField {
    /// `first_node` with its `first_prev_rel`/`first_next_rel` pair.
    First,
    /// `second_node` with its `second_prev_rel`/`second_next_rel` pair.
    Second,
}

impl RelationshipNodeField {
    /// Both endpoints, first before second.
    pub const ALL: [RelationshipNodeField; 2] =
        [RelationshipNodeField::First, RelationshipNodeField::Second];

    /// Picks the endpoint of `rel` that is `node`. `First` wins for loops.
    pub fn select(rel: &RelationshipRecord, node: NodeId) -> Option<Self> {
        if rel.first_node == node {
            Some(RelationshipNodeField::First)
        } else if rel.second_node == node {
            Some(RelationshipNodeField::Second)
        } else {
            None
        }
    }

    /// Endpoint node id.
    pub fn get(self, rel: &RelationshipRecord) -> NodeId {
        match self {
            RelationshipNodeField::First => rel.first_node,
            RelationshipNodeField::Second => rel.second_node,
        }
    }

    /// Prev pointer of this endpoint's chain pair.
    pub fn prev(self, rel: &RelationshipRecord) -> RelId {
        match self {
            RelationshipNodeField::First => rel.first_prev_rel,
            RelationshipNodeField::Second => rel.second_prev_rel,
        }
    }

    /// Next pointer of this endpoint's chain pair.
    pub fn next(self, rel: &RelationshipRecord) -> RelId {
        match self {
            RelationshipNodeField::First => rel.first_next_rel,
            RelationshipNodeField::Second => rel.second_next_rel,
        }
    }

    /// Reported when the endpoint id does not address a node.
    pub fn invalid_reference(self) -> ReferenceInconsistency {
        match self {
            RelationshipNodeField::First => ReferenceInconsistency::SourceNodeInvalid,
            RelationshipNodeField::Second => ReferenceInconsistency::TargetNodeInvalid,
        }
    }

    /// Reported when the endpoint node is not in use.
    pub fn not_in_use(self) -> ReferenceInconsistency {
        match self {
            RelationshipNodeField::First => ReferenceInconsistency::SourceNodeNotInUse,
            RelationshipNodeField::Second => ReferenceInconsistency::TargetNodeNotInUse,
        }
    }

    /// Reported when the relationship has no prev for this endpoint but the node's head
    /// is some other relationship.
    pub fn no_back_reference(self) -> ReferenceInconsistency {
        match self {
            RelationshipNodeField::First => ReferenceInconsistency::SourceNodeDoesNotReferenceBack,
            RelationshipNodeField::Second => ReferenceInconsistency::TargetNodeDoesNotReferenceBack,
        }
    }

    /// Reported when the relationship has a prev for this endpoint but the node has no
    /// head at all.
    pub fn no_chain(self) -> ReferenceInconsistency {
        match self {
            RelationshipNodeField::First => ReferenceInconsistency::SourceNodeHasNoRelationships,
            RelationshipNodeField::Second => ReferenceInconsistency::TargetNodeHasNoRelationships,
        }
    }

    /// Reported against a node whose head relationship has a prev pointer for it.
    pub fn not_first_in_chain(self) -> ReferenceInconsistency {
        match self {
            RelationshipNodeField::First => {
                ReferenceInconsistency::RelationshipNotFirstInSourceChain
            }
            RelationshipNodeField::Second => {
                ReferenceInconsistency::RelationshipNotFirstInTargetChain
            }
        }
    }
}

/// Direction of travel along a chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RelationshipChainDirection {
    /// Towards the tail.
    Next,
    /// Towards the node's head pointer.
    Prev,
}

impl RelationshipChainDirection {
    /// Both directions.
    pub const ALL: [RelationshipChainDirection; 2] =
        [RelationshipChainDirection::Prev, RelationshipChainDirection::Next];

    /// The two fields travelling this way, first endpoint's before second's.
    pub fn fields(self) -> [RelationshipChainField; 2] {
        RelationshipNodeField::ALL.map(|endpoint| self.field(endpoint))
    }

    /// Field travelling this way along `endpoint`'s chain.
    pub fn field(self, endpoint: RelationshipNodeField) -> RelationshipChainField {
        match (endpoint, self) {
            (RelationshipNodeField::First, RelationshipChainDirection::Next) => {
                RelationshipChainField::FirstNext
            }
            (RelationshipNodeField::First, RelationshipChainDirection::Prev) => {
                RelationshipChainField::FirstPrev
            }
            (RelationshipNodeField::Second, RelationshipChainDirection::Next) => {
                RelationshipChainField::SecondNext
            }
            (RelationshipNodeField::Second, RelationshipChainDirection::Prev) => {
                RelationshipChainField::SecondPrev
            }
        }
    }

    /// Field to follow from `rel` along `node`'s chain.
    ///
    /// Fails with [`CheckError::NotAnEndpoint`] when `node` is neither endpoint.
    pub fn field_for(
        self,
        node: NodeId,
        rel: &RelationshipRecord,
    ) -> Result<RelationshipChainField> {
        RelationshipNodeField::select(rel, node)
            .map(|endpoint| self.field(endpoint))
            .ok_or(CheckError::NotAnEndpoint { rel: rel.id, node })
    }

    /// Opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            RelationshipChainDirection::Next => RelationshipChainDirection::Prev,
            RelationshipChainDirection::Prev => RelationshipChainDirection::Next,
        }
    }
}

/// One of the four chain pointer slots of a relationship record.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RelationshipChainField {
    /// `first_next_rel`.
    FirstNext,
    /// `first_prev_rel`.
    FirstPrev,
    /// `second_next_rel`.
    SecondNext,
    /// `second_prev_rel`.
    SecondPrev,
}

impl RelationshipChainField {
    /// Every slot.
    pub const ALL: [RelationshipChainField; 4] = [
        RelationshipChainField::FirstNext,
        RelationshipChainField::FirstPrev,
        RelationshipChainField::SecondNext,
        RelationshipChainField::SecondPrev,
    ];

    /// Endpoint whose chain this slot belongs to.
    pub fn node_field(self) -> RelationshipNodeField {
        match self {
            RelationshipChainField::FirstNext | RelationshipChainField::FirstPrev => {
                RelationshipNodeField::First
            }
            RelationshipChainField::SecondNext | RelationshipChainField::SecondPrev => {
                RelationshipNodeField::Second
            }
        }
    }

    /// Direction this slot points.
    pub fn direction(self) -> RelationshipChainDirection {
        match self {
            RelationshipChainField::FirstNext | RelationshipChainField::SecondNext => {
                RelationshipChainDirection::Next
            }
            RelationshipChainField::FirstPrev | RelationshipChainField::SecondPrev => {
                RelationshipChainDirection::Prev
            }
        }
    }

    /// Reads the slot.
    pub fn rel_of(self, rel: &RelationshipRecord) -> RelId {
        match self {
            RelationshipChainField::FirstNext => rel.first_next_rel,
            RelationshipChainField::FirstPrev => rel.first_prev_rel,
            RelationshipChainField::SecondNext => rel.second_next_rel,
            RelationshipChainField::SecondPrev => rel.second_prev_rel,
        }
    }

    /// Value of an empty slot.
    pub const fn sentinel(self) -> RelId {
        RelId::NONE
    }

    /// Node whose chain this slot walks.
    pub fn node_of(self, rel: &RelationshipRecord) -> NodeId {
        self.node_field().get(rel)
    }

    /// Returns true if `other`, reached from `rel` through this slot, points back at
    /// `rel` through its reciprocal slot for the shared node.
    pub fn inv_consistent(self, rel: &RelationshipRecord, other: &RelationshipRecord) -> bool {
        self.reciprocal(rel, other) == Some(rel.id)
    }

    /// Classifies the link from `rel` to `other` through this slot.
    ///
    /// Returns `None` for a mutually consistent link.
    pub fn classify(
        self,
        rel: &RelationshipRecord,
        other: &RelationshipRecord,
    ) -> Option<ReferenceInconsistency> {
        if !other.in_use {
            return Some(self.not_in_use());
        }
        match self.reciprocal(rel, other) {
            None => Some(self.different_chain()),
            Some(back) if back == rel.id => None,
            Some(back) if back.is_none() => self.no_back_reference(),
            Some(_) => Some(self.different_chain()),
        }
    }

    /// Reported when the neighbour is not in use.
    pub fn not_in_use(self) -> ReferenceInconsistency {
        match self {
            RelationshipChainField::FirstNext => ReferenceInconsistency::SourceNextNotInUse,
            RelationshipChainField::FirstPrev => ReferenceInconsistency::SourcePrevNotInUse,
            RelationshipChainField::SecondNext => ReferenceInconsistency::TargetNextNotInUse,
            RelationshipChainField::SecondPrev => ReferenceInconsistency::TargetPrevNotInUse,
        }
    }

    /// Reported when the neighbour's reciprocal slot is empty. Only prev slots report
    /// this; the same break seen from a next slot is the neighbour's own prev problem.
    pub fn no_back_reference(self) -> Option<ReferenceInconsistency> {
        match self {
            RelationshipChainField::FirstPrev => Some(ReferenceInconsistency::SourceNoBackref),
            RelationshipChainField::SecondPrev => Some(ReferenceInconsistency::TargetNoBackref),
            RelationshipChainField::FirstNext | RelationshipChainField::SecondNext => None,
        }
    }

    /// Reported when the neighbour belongs to another chain.
    pub fn different_chain(self) -> ReferenceInconsistency {
        match self {
            RelationshipChainField::FirstNext => ReferenceInconsistency::SourceNextDifferentChain,
            RelationshipChainField::FirstPrev => ReferenceInconsistency::SourcePrevDifferentChain,
            RelationshipChainField::SecondNext => ReferenceInconsistency::TargetNextDifferentChain,
            RelationshipChainField::SecondPrev => ReferenceInconsistency::TargetPrevDifferentChain,
        }
    }

    fn reciprocal(self, rel: &RelationshipRecord, other: &RelationshipRecord) -> Option<RelId> {
        let shared = RelationshipNodeField::select(other, self.node_of(rel))?;
        Some(match self.direction() {
            RelationshipChainDirection::Next => shared.prev(other),
            RelationshipChainDirection::Prev => shared.next(other),
        })
    }
}
