use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::store::Record;

/// Records keyed by id. Iteration is in ascending id order; inserting a record whose
/// id is already present replaces the earlier copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSet<R> {
    records: BTreeMap<u64, R>,
}

impl<R> Default for RecordSet<R> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<R: Record> RecordSet<R> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record`, replacing any record with the same id.
    pub fn add(&mut self, record: R) {
        self.records.insert(record.raw_id(), record);
    }

    /// Inserts a copy of every record in `other`.
    pub fn add_all(&mut self, other: &RecordSet<R>) {
        for (id, record) in &other.records {
            self.records.insert(*id, record.clone());
        }
    }

    /// Returns a new set holding the records of both sets, `other` winning on
    /// shared ids.
    pub fn union(&self, other: &RecordSet<R>) -> RecordSet<R> {
        let mut merged = self.clone();
        merged.add_all(other);
        merged
    }

    /// Returns true if a record with `id` is present.
    pub fn contains(&self, id: impl Into<u64>) -> bool {
        self.records.contains_key(&id.into())
    }

    /// Returns true if every id of `other` is present.
    pub fn contains_all(&self, other: &RecordSet<R>) -> bool {
        other.records.keys().all(|id| self.records.contains_key(id))
    }

    /// Borrows the record with `id`.
    pub fn get(&self, id: impl Into<u64>) -> Option<&R> {
        self.records.get(&id.into())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.keys().copied()
    }

    /// Records in ascending id order.
    pub fn iter(&self) -> btree_map::Values<'_, u64, R> {
        self.records.values()
    }
}

impl<R: Record> FromIterator<R> for RecordSet<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        set.extend(iter);
        set
    }
}

impl<R: Record> Extend<R> for RecordSet<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        for record in iter {
            self.add(record);
        }
    }
}

impl<R> IntoIterator for RecordSet<R> {
    type Item = R;
    type IntoIter = btree_map::IntoValues<u64, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}

impl<'a, R> IntoIterator for &'a RecordSet<R> {
    type Item = &'a R;
    type IntoIter = btree_map::Values<'a, u64, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

impl<R: fmt::Display> fmt::Display for RecordSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for record in self.records.values() {
            writeln!(f, "{record},")?;
        }
        write!(f, "]")
    }
}
