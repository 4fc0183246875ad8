//! Removal of inconsistent relationship records.
//!
//! [`RelationshipRemovalStrategy`] never writes to the store itself. Removals go to a
//! [`RecordRemover`] and withheld closures go to a [`Diagnostics`] sink.

mod diagnostics;
mod removal;
mod remover;

/// Diagnostics sinks.
pub use diagnostics::{CollectingDiagnostics, Diagnostics, LoggingDiagnostics, PreventedRemoval};
/// Removal strategy and its report.
pub use removal::{BlockedRemoval, RelationshipRemovalStrategy, RemovalReport};
/// Removal target.
pub use remover::RecordRemover;
