use std::fmt;

use serde::Serialize;

use crate::types::RecordKind;

/// Named pointer fault found by a record check.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceInconsistency {
    /// The first node id is the sentinel.
    SourceNodeInvalid,
    /// The first node is not in use.
    SourceNodeNotInUse,
    /// The second node id is the sentinel.
    TargetNodeInvalid,
    /// The second node is not in use.
    TargetNodeNotInUse,
    /// The relationship starts the first node's chain but the node's head points
    /// elsewhere.
    SourceNodeDoesNotReferenceBack,
    /// The relationship starts the second node's chain but the node's head points
    /// elsewhere.
    TargetNodeDoesNotReferenceBack,
    /// The relationship has a prev in the first node's chain but the node has no head.
    SourceNodeHasNoRelationships,
    /// The relationship has a prev in the second node's chain but the node has no head.
    TargetNodeHasNoRelationships,
    /// The prev relationship in the first node's chain is not in use.
    SourcePrevNotInUse,
    /// The next relationship in the first node's chain is not in use.
    SourceNextNotInUse,
    /// The prev relationship in the second node's chain is not in use.
    TargetPrevNotInUse,
    /// The next relationship in the second node's chain is not in use.
    TargetNextNotInUse,
    /// The prev relationship in the first node's chain has no next pointer back.
    SourceNoBackref,
    /// The prev relationship in the second node's chain has no next pointer back.
    TargetNoBackref,
    /// The prev relationship in the first node's chain belongs to another chain.
    SourcePrevDifferentChain,
    /// The next relationship in the first node's chain belongs to another chain.
    SourceNextDifferentChain,
    /// The prev relationship in the second node's chain belongs to another chain.
    TargetPrevDifferentChain,
    /// The next relationship in the second node's chain belongs to another chain.
    TargetNextDifferentChain,
    /// A node's head relationship is not in use.
    RelationshipNotInUse,
    /// A node's head relationship does not reference the node.
    RelationshipForOtherNode,
    /// A node's head relationship has a prev pointer in the chain where the node is
    /// its first endpoint.
    RelationshipNotFirstInSourceChain,
    /// A node's head relationship has a prev pointer in the chain where the node is
    /// its second endpoint.
    RelationshipNotFirstInTargetChain,
    /// Walking one of the relationship's chains revisited a relationship.
    ChainCycle,
}

impl ReferenceInconsistency {
    /// Kind of record the fault is reported against.
    pub const fn reported_on(self) -> RecordKind {
        match self {
            ReferenceInconsistency::RelationshipNotInUse
            | ReferenceInconsistency::RelationshipForOtherNode
            | ReferenceInconsistency::RelationshipNotFirstInSourceChain
            | ReferenceInconsistency::RelationshipNotFirstInTargetChain => RecordKind::Node,
            _ => RecordKind::Relationship,
        }
    }

    /// Human readable description.
    pub const fn message(self) -> &'static str {
        match self {
            ReferenceInconsistency::SourceNodeInvalid => "source node is not a valid node id",
            ReferenceInconsistency::SourceNodeNotInUse => "source node is not in use",
            ReferenceInconsistency::TargetNodeInvalid => "target node is not a valid node id",
            ReferenceInconsistency::TargetNodeNotInUse => "target node is not in use",
            ReferenceInconsistency::SourceNodeDoesNotReferenceBack => {
                "source node does not reference back to this relationship"
            }
            ReferenceInconsistency::TargetNodeDoesNotReferenceBack => {
                "target node does not reference back to this relationship"
            }
            ReferenceInconsistency::SourceNodeHasNoRelationships => {
                "source node has no relationships"
            }
            ReferenceInconsistency::TargetNodeHasNoRelationships => {
                "target node has no relationships"
            }
            ReferenceInconsistency::SourcePrevNotInUse => {
                "prev relationship in the source chain is not in use"
            }
            ReferenceInconsistency::SourceNextNotInUse => {
                "next relationship in the source chain is not in use"
            }
            ReferenceInconsistency::TargetPrevNotInUse => {
                "prev relationship in the target chain is not in use"
            }
            ReferenceInconsistency::TargetNextNotInUse => {
                "next relationship in the target chain is not in use"
            }
            ReferenceInconsistency::SourceNoBackref => {
                "prev relationship in the source chain does not point back"
            }
            ReferenceInconsistency::TargetNoBackref => {
                "prev relationship in the target chain does not point back"
            }
            ReferenceInconsistency::SourcePrevDifferentChain => {
                "prev relationship in the source chain belongs to another chain"
            }
            ReferenceInconsistency::SourceNextDifferentChain => {
                "next relationship in the source chain belongs to another chain"
            }
            ReferenceInconsistency::TargetPrevDifferentChain => {
                "prev relationship in the target chain belongs to another chain"
            }
            ReferenceInconsistency::TargetNextDifferentChain => {
                "next relationship in the target chain belongs to another chain"
            }
            ReferenceInconsistency::RelationshipNotInUse => "first relationship is not in use",
            ReferenceInconsistency::RelationshipForOtherNode => {
                "first relationship does not reference this node"
            }
            ReferenceInconsistency::RelationshipNotFirstInSourceChain => {
                "first relationship is not first in its source chain"
            }
            ReferenceInconsistency::RelationshipNotFirstInTargetChain => {
                "first relationship is not first in its target chain"
            }
            ReferenceInconsistency::ChainCycle => "relationship chain loops back on itself",
        }
    }
}

impl fmt::Display for ReferenceInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One finding: a fault, the record it was found on, and the record it points at.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Inconsistency {
    /// Fault kind.
    pub kind: ReferenceInconsistency,
    /// Kind of the record the fault was found on.
    pub record_kind: RecordKind,
    /// Raw id of the record the fault was found on.
    pub record: u64,
    /// Raw id of the referenced record involved, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced: Option<u64>,
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.record_kind, self.record, self.kind)?;
        if let Some(referenced) = self.referenced {
            write!(f, " (references {referenced})")?;
        }
        Ok(())
    }
}
