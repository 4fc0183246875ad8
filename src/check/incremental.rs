use std::collections::BTreeSet;

use tracing::info;

use super::record_check::RecordChecker;
use super::report::ConsistencyReport;
use crate::access::{DiffRecordAccess, RecordAccess};
use crate::chain::RelationshipChainField;
use crate::options::CheckOptions;
use crate::store::{DiffStore, RelationshipRecord};
use crate::types::{CheckError, NodeId, RelId, Result};

/// Checks the records a pending transaction touches plus their neighbourhood.
///
/// The neighbourhood of a changed node is its head relationship before and after the
/// change. The neighbourhood of a changed relationship is its endpoint nodes and the
/// relationships its chain slots point at, again before and after. Each record is
/// checked once.
#[derive(Clone, Debug, Default)]
pub struct IncrementalCheck {
    options: CheckOptions,
}

impl IncrementalCheck {
    /// Creates a check using `options`.
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Checks `diff` and returns every finding.
    pub fn check<S>(&self, diff: &DiffStore<'_, S>) -> ConsistencyReport
    where
        S: RecordAccess + ?Sized,
    {
        let scoped = self.options.filter.filter(diff);
        let checker = RecordChecker::new(&scoped, &self.options);
        let mut report = ConsistencyReport::new(self.options.max_findings);

        let (nodes, relationships) = neighbourhood(diff);
        for id in &nodes {
            let node = diff.node(*id).force_load().into_record();
            checker.check_node(&node, &mut report);
        }
        for id in &relationships {
            let rel = diff.relationship(*id).force_load().into_record();
            checker.check_relationship(&rel, &mut report);
        }

        info!(
            changed = diff.changes().len(),
            nodes = nodes.len(),
            relationships = relationships.len(),
            inconsistencies = report.summary.total_inconsistencies,
            skipped = report.summary.skipped_references,
            filter = ?self.options.filter,
            "check.incremental.done"
        );
        report
    }

    /// Checks `diff`, failing with [`CheckError::Inconsistent`] if anything was found.
    pub fn verify<S>(&self, diff: &DiffStore<'_, S>) -> Result<ConsistencyReport>
    where
        S: RecordAccess + ?Sized,
    {
        let report = self.check(diff);
        if report.is_consistent() {
            Ok(report)
        } else {
            Err(CheckError::Inconsistent(Box::new(report.summary)))
        }
    }
}

fn neighbourhood<S>(diff: &DiffStore<'_, S>) -> (BTreeSet<NodeId>, BTreeSet<RelId>)
where
    S: RecordAccess + ?Sized,
{
    let mut nodes = BTreeSet::new();
    let mut relationships = BTreeSet::new();

    for node in diff.changed_nodes() {
        nodes.insert(node.id);
        let previous = diff.previous_node(node.id).force_load().into_record();
        for head in [node.next_rel, previous.next_rel] {
            if !head.is_none() {
                relationships.insert(head);
            }
        }
    }

    for rel in diff.changed_relationships() {
        relationships.insert(rel.id);
        let previous = diff
            .previous_relationship(rel.id)
            .force_load()
            .into_record();
        for version in [rel, &previous] {
            add_links(version, &mut nodes, &mut relationships);
        }
    }
    (nodes, relationships)
}

fn add_links(
    rel: &RelationshipRecord,
    nodes: &mut BTreeSet<NodeId>,
    relationships: &mut BTreeSet<RelId>,
) {
    for node in [rel.first_node, rel.second_node] {
        if !node.is_none() {
            nodes.insert(node);
        }
    }
    for field in RelationshipChainField::ALL {
        let neighbour = field.rel_of(rel);
        if !neighbour.is_none() {
            relationships.insert(neighbour);
        }
    }
}
