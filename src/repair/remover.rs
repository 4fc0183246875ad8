use tracing::trace;

use crate::access::RecordAccess;
use crate::store::{DiffStore, RelationshipRecord};
use crate::types::Result;

/// Receiver of removal instructions issued by a repair pass.
///
/// Removing the same record twice must be harmless.
pub trait RecordRemover {
    /// Removes `record` from the store.
    fn remove(&mut self, record: &RelationshipRecord) -> Result<()>;
}

impl<T: RecordRemover + ?Sized> RecordRemover for &mut T {
    fn remove(&mut self, record: &RelationshipRecord) -> Result<()> {
        (**self).remove(record)
    }
}

/// Stages the record as not in use; the endpoints and chain pointers are kept so the
/// staged record still shows what it used to link.
impl<S: RecordAccess + ?Sized> RecordRemover for DiffStore<'_, S> {
    fn remove(&mut self, record: &RelationshipRecord) -> Result<()> {
        trace!(rel = record.id.0, "repair.removal.staged");
        self.stage_relationship(record.clone().with_in_use(false));
        Ok(())
    }
}
