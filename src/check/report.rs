use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::inconsistency::{Inconsistency, ReferenceInconsistency};
use crate::types::RecordKind;

/// Counters describing a whole check run.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ConsistencySummary {
    /// In-use records that were checked.
    pub records_checked: u64,
    /// Findings across every record, including ones dropped from the report.
    pub total_inconsistencies: u64,
    /// Records with at least one finding, per record kind.
    pub inconsistent_records: BTreeMap<RecordKind, u64>,
    /// Findings per fault kind.
    pub by_kind: BTreeMap<ReferenceInconsistency, u64>,
    /// References not resolved because the check was scoped away from them.
    pub skipped_references: u64,
}

impl ConsistencySummary {
    /// Returns true if no finding was recorded.
    pub fn is_consistent(&self) -> bool {
        self.total_inconsistencies == 0
    }

    /// Records of `kind` with at least one finding.
    pub fn inconsistent_records_of(&self, kind: RecordKind) -> u64 {
        self.inconsistent_records.get(&kind).copied().unwrap_or(0)
    }

    /// Records with at least one finding, across kinds.
    pub fn total_inconsistent_records(&self) -> u64 {
        self.inconsistent_records.values().sum()
    }

    /// Findings of fault `kind`.
    pub fn count_of(&self, kind: ReferenceInconsistency) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for ConsistencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_consistent() {
            return write!(f, "consistent ({} records checked)", self.records_checked);
        }
        write!(
            f,
            "{} inconsistencies in {} records",
            self.total_inconsistencies,
            self.total_inconsistent_records()
        )?;
        for (kind, count) in &self.inconsistent_records {
            write!(f, ", {kind}: {count}")?;
        }
        Ok(())
    }
}

/// Findings of a check run, capped at a maximum, plus the run's summary.
#[derive(Clone, Debug, Serialize)]
pub struct ConsistencyReport {
    /// Findings in the order they were recorded.
    pub findings: Vec<Inconsistency>,
    /// True if findings were dropped because the cap was reached.
    pub truncated: bool,
    /// Counters for the run.
    pub summary: ConsistencySummary,
    #[serde(skip)]
    max_findings: usize,
}

impl ConsistencyReport {
    /// Creates an empty report keeping at most `max_findings` findings.
    pub fn new(max_findings: usize) -> Self {
        Self {
            findings: Vec::new(),
            truncated: false,
            summary: ConsistencySummary::default(),
            max_findings,
        }
    }

    /// Returns true if nothing was found.
    pub fn is_consistent(&self) -> bool {
        self.summary.is_consistent()
    }

    /// Findings of fault `kind` that were kept.
    pub fn findings_of(
        &self,
        kind: ReferenceInconsistency,
    ) -> impl Iterator<Item = &Inconsistency> {
        self.findings.iter().filter(move |finding| finding.kind == kind)
    }

    /// Folds the outcome of checking one record into the report.
    pub(crate) fn absorb(&mut self, record: RecordReport) {
        self.summary.records_checked += 1;
        self.summary.skipped_references += record.skipped;
        if record.findings.is_empty() {
            return;
        }
        *self
            .summary
            .inconsistent_records
            .entry(record.kind)
            .or_default() += 1;
        for (kind, referenced) in record.findings {
            self.summary.total_inconsistencies += 1;
            *self.summary.by_kind.entry(kind).or_default() += 1;
            if self.findings.len() >= self.max_findings {
                self.truncated = true;
                continue;
            }
            self.findings.push(Inconsistency {
                kind,
                record_kind: record.kind,
                record: record.id,
                referenced,
            });
        }
    }
}

/// Scratch state for checking a single record.
#[derive(Debug)]
pub(crate) struct RecordReport {
    kind: RecordKind,
    id: u64,
    findings: Vec<(ReferenceInconsistency, Option<u64>)>,
    skipped: u64,
}

impl RecordReport {
    pub(crate) fn new(kind: RecordKind, id: u64) -> Self {
        Self {
            kind,
            id,
            findings: Vec::new(),
            skipped: 0,
        }
    }

    pub(crate) fn report(&mut self, kind: ReferenceInconsistency, referenced: Option<u64>) {
        self.findings.push((kind, referenced));
    }

    pub(crate) fn skipped(&mut self) {
        self.skipped += 1;
    }
}
