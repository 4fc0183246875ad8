use super::inconsistency::ReferenceInconsistency;
use super::report::{ConsistencyReport, RecordReport};
use crate::access::{PendingReferenceCheck, RecordAccess};
use crate::chain::{
    ChainEnd, RelationshipChainDirection, RelationshipChainExplorer, RelationshipChainField,
    RelationshipNodeField,
};
use crate::options::CheckOptions;
use crate::store::{NodeRecord, RelationshipRecord};
use crate::types::RecordKind;

/// Checks node and relationship records against the records they reference.
pub struct RecordChecker<'a, A: ?Sized> {
    access: &'a A,
    explorer: RelationshipChainExplorer<'a, A>,
    detect_cycles: bool,
}

impl<'a, A: RecordAccess + ?Sized> RecordChecker<'a, A> {
    /// Creates a checker resolving references through `access`.
    pub fn new(access: &'a A, options: &CheckOptions) -> Self {
        Self {
            access,
            explorer: RelationshipChainExplorer::new(access)
                .with_visit_budget(options.chain_visit_budget),
            detect_cycles: options.detect_cycles,
        }
    }

    /// Checks a relationship's endpoints, its four chain links and, when enabled,
    /// whether either of its chains loops.
    pub fn check_relationship(&self, rel: &RelationshipRecord, report: &mut ConsistencyReport) {
        if !rel.in_use {
            return;
        }
        let mut record = RecordReport::new(RecordKind::Relationship, rel.id.0);

        for endpoint in RelationshipNodeField::ALL {
            let node = endpoint.get(rel);
            if node.is_none() {
                record.report(endpoint.invalid_reference(), None);
                continue;
            }
            self.access.node(node).dispatch(&mut EndpointCheck {
                endpoint,
                rel,
                record: &mut record,
            });
        }

        for field in RelationshipChainField::ALL {
            let neighbour = field.rel_of(rel);
            if neighbour.is_none() {
                continue;
            }
            self.access.relationship(neighbour).dispatch(&mut LinkCheck {
                field,
                rel,
                record: &mut record,
            });
        }

        if self.detect_cycles {
            self.check_cycles(rel, &mut record);
        }
        report.absorb(record);
    }

    /// Checks that a node's head pointer addresses a live relationship that starts one
    /// of the node's chains.
    pub fn check_node(&self, node: &NodeRecord, report: &mut ConsistencyReport) {
        if !node.in_use {
            return;
        }
        let mut record = RecordReport::new(RecordKind::Node, node.id.0);
        if !node.next_rel.is_none() {
            self.access.relationship(node.next_rel).dispatch(&mut HeadCheck {
                node,
                record: &mut record,
            });
        }
        report.absorb(record);
    }

    fn check_cycles(&self, rel: &RelationshipRecord, record: &mut RecordReport) {
        for endpoint in RelationshipNodeField::ALL {
            let node = endpoint.get(rel);
            if node.is_none()
                || (endpoint == RelationshipNodeField::Second && rel.first_node == node)
            {
                continue;
            }
            for direction in RelationshipChainDirection::ALL {
                if let ChainEnd::Cycle(at) = self.explorer.walk(rel, node, direction).end {
                    record.report(ReferenceInconsistency::ChainCycle, Some(at.0));
                }
            }
        }
    }
}

struct EndpointCheck<'r> {
    endpoint: RelationshipNodeField,
    rel: &'r RelationshipRecord,
    record: &'r mut RecordReport,
}

impl PendingReferenceCheck<NodeRecord> for EndpointCheck<'_> {
    fn check_reference(&mut self, node: &NodeRecord) {
        let referenced = Some(node.id.0);
        if !node.in_use {
            self.record.report(self.endpoint.not_in_use(), referenced);
        } else if self.endpoint.prev(self.rel).is_none() {
            // first in the node's chain, so the node must point at it
            if node.next_rel != self.rel.id {
                self.record
                    .report(self.endpoint.no_back_reference(), referenced);
            }
        } else if node.next_rel.is_none() {
            self.record.report(self.endpoint.no_chain(), referenced);
        }
    }

    fn skip(&mut self) {
        self.record.skipped();
    }
}

struct LinkCheck<'r> {
    field: RelationshipChainField,
    rel: &'r RelationshipRecord,
    record: &'r mut RecordReport,
}

impl PendingReferenceCheck<RelationshipRecord> for LinkCheck<'_> {
    fn check_reference(&mut self, other: &RelationshipRecord) {
        if let Some(kind) = self.field.classify(self.rel, other) {
            self.record.report(kind, Some(other.id.0));
        }
    }

    fn skip(&mut self) {
        self.record.skipped();
    }
}

struct HeadCheck<'r> {
    node: &'r NodeRecord,
    record: &'r mut RecordReport,
}

impl PendingReferenceCheck<RelationshipRecord> for HeadCheck<'_> {
    fn check_reference(&mut self, head: &RelationshipRecord) {
        let referenced = Some(head.id.0);
        if !head.in_use {
            self.record
                .report(ReferenceInconsistency::RelationshipNotInUse, referenced);
            return;
        }
        if !head.references(self.node.id) {
            self.record
                .report(ReferenceInconsistency::RelationshipForOtherNode, referenced);
            return;
        }
        for endpoint in RelationshipNodeField::ALL {
            if endpoint.get(head) == self.node.id && !endpoint.prev(head).is_none() {
                self.record.report(endpoint.not_first_in_chain(), referenced);
            }
        }
    }

    fn skip(&mut self) {
        self.record.skipped();
    }
}
