//! Record checks and their reports.
//!
//! [`RecordChecker`] validates single records against what they reference and folds
//! its findings into a [`ConsistencyReport`]. [`IncrementalCheck`] drives it over the
//! records a pending transaction touches.

mod incremental;
mod inconsistency;
mod record_check;
mod report;

/// Transaction-scoped check.
pub use incremental::IncrementalCheck;
/// Fault taxonomy.
pub use inconsistency::{Inconsistency, ReferenceInconsistency};
/// Per-record checks.
pub use record_check::RecordChecker;
/// Report and summary.
pub use report::{ConsistencyReport, ConsistencySummary};
