use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DiffRecordAccess, RecordAccess, RecordReference};
use crate::store::{ArrayRecord, NodeRecord, PropertyRecord, RelationshipRecord, StringRecord};
use crate::types::{DynamicId, NodeId, PropertyId, RelId};

const CATEGORY_NODE: u8 = 0x01;
const CATEGORY_RELATIONSHIP: u8 = 0x02;
const CATEGORY_PROPERTY: u8 = 0x04;
const CATEGORY_STRING: u8 = 0x08;
const CATEGORY_ARRAY: u8 = 0x10;
const CATEGORY_ALL: u8 =
    CATEGORY_NODE | CATEGORY_RELATIONSHIP | CATEGORY_PROPERTY | CATEGORY_STRING | CATEGORY_ARRAY;

/// Record categories a filtered access can forward.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RecordCategory {
    /// Node records.
    Node,
    /// Relationship records.
    Relationship,
    /// Property records.
    Property,
    /// String blocks.
    String,
    /// Array blocks.
    Array,
}

impl RecordCategory {
    const fn bit(self) -> u8 {
        match self {
            RecordCategory::Node => CATEGORY_NODE,
            RecordCategory::Relationship => CATEGORY_RELATIONSHIP,
            RecordCategory::Property => CATEGORY_PROPERTY,
            RecordCategory::String => CATEGORY_STRING,
            RecordCategory::Array => CATEGORY_ARRAY,
        }
    }
}

/// Set of [`RecordCategory`] values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct RecordCategories(u8);

impl RecordCategories {
    /// No categories.
    pub const NONE: RecordCategories = RecordCategories(0);
    /// Every category.
    pub const ALL: RecordCategories = RecordCategories(CATEGORY_ALL);

    /// Returns a set containing exactly `categories`.
    pub fn of(categories: &[RecordCategory]) -> Self {
        categories
            .iter()
            .fold(Self::NONE, |set, category| set.with(*category))
    }

    /// Returns this set with `category` added.
    pub const fn with(self, category: RecordCategory) -> Self {
        RecordCategories(self.0 | category.bit())
    }

    /// Returns true if `category` is in the set.
    pub const fn contains(self, category: RecordCategory) -> bool {
        self.0 & category.bit() != 0
    }
}

impl fmt::Debug for RecordCategories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all = [
            RecordCategory::Node,
            RecordCategory::Relationship,
            RecordCategory::Property,
            RecordCategory::String,
            RecordCategory::Array,
        ];
        f.debug_set()
            .entries(all.iter().filter(|category| self.contains(**category)))
            .finish()
    }
}

/// Scope of a check: which record categories are resolved, the rest are trusted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFilter {
    /// Resolve everything.
    #[default]
    Everything,
    /// Resolve property records only.
    PropertiesOnly,
    /// Resolve relationship records only.
    RelationshipsOnly,
    /// Resolve node records only.
    NodesOnly,
    /// Resolve string blocks only.
    StringsOnly,
    /// Resolve array blocks only.
    ArraysOnly,
    /// Resolve string and array blocks.
    DynamicPropertiesOnly,
}

impl RecordFilter {
    /// Every filter, in declaration order.
    pub const ALL: [RecordFilter; 7] = [
        RecordFilter::Everything,
        RecordFilter::PropertiesOnly,
        RecordFilter::RelationshipsOnly,
        RecordFilter::NodesOnly,
        RecordFilter::StringsOnly,
        RecordFilter::ArraysOnly,
        RecordFilter::DynamicPropertiesOnly,
    ];

    /// Categories this filter forwards to the backing access.
    pub fn categories(self) -> RecordCategories {
        use RecordCategory::*;
        match self {
            RecordFilter::Everything => RecordCategories::ALL,
            RecordFilter::PropertiesOnly => RecordCategories::of(&[Property]),
            RecordFilter::RelationshipsOnly => RecordCategories::of(&[Relationship]),
            RecordFilter::NodesOnly => RecordCategories::of(&[Node]),
            RecordFilter::StringsOnly => RecordCategories::of(&[String]),
            RecordFilter::ArraysOnly => RecordCategories::of(&[Array]),
            RecordFilter::DynamicPropertiesOnly => RecordCategories::of(&[String, Array]),
        }
    }

    /// Wraps `access` so that only this filter's categories are resolved.
    pub fn filter<A: DiffRecordAccess>(self, access: A) -> SkippingRecordAccess<A> {
        SkippingRecordAccess::new(access, self.categories())
    }
}

/// Record access that answers every request with a skip unless the request's
/// category is enabled, in which case it delegates.
#[derive(Clone, Debug)]
pub struct SkippingRecordAccess<A> {
    delegate: A,
    enabled: RecordCategories,
}

impl<A> SkippingRecordAccess<A> {
    /// Creates a wrapper forwarding only `enabled` categories to `delegate`.
    pub fn new(delegate: A, enabled: RecordCategories) -> Self {
        Self { delegate, enabled }
    }

    /// Creates a wrapper that skips every request.
    pub fn skip_all(delegate: A) -> Self {
        Self::new(delegate, RecordCategories::NONE)
    }

    /// Categories forwarded to the delegate.
    pub fn enabled(&self) -> RecordCategories {
        self.enabled
    }

    fn forwards(&self, category: RecordCategory) -> bool {
        self.enabled.contains(category)
    }
}

impl<A: RecordAccess> RecordAccess for SkippingRecordAccess<A> {
    fn node(&self, id: NodeId) -> RecordReference<NodeRecord> {
        if self.forwards(RecordCategory::Node) {
            self.delegate.node(id)
        } else {
            RecordReference::Skip { id: id.0 }
        }
    }

    fn relationship(&self, id: RelId) -> RecordReference<RelationshipRecord> {
        if self.forwards(RecordCategory::Relationship) {
            self.delegate.relationship(id)
        } else {
            RecordReference::Skip { id: id.0 }
        }
    }

    fn property(&self, id: PropertyId) -> RecordReference<PropertyRecord> {
        if self.forwards(RecordCategory::Property) {
            self.delegate.property(id)
        } else {
            RecordReference::Skip { id: id.0 }
        }
    }

    fn string(&self, id: DynamicId) -> RecordReference<StringRecord> {
        if self.forwards(RecordCategory::String) {
            self.delegate.string(id)
        } else {
            RecordReference::Skip { id: id.0 }
        }
    }

    fn array(&self, id: DynamicId) -> RecordReference<ArrayRecord> {
        if self.forwards(RecordCategory::Array) {
            self.delegate.array(id)
        } else {
            RecordReference::Skip { id: id.0 }
        }
    }
}

impl<A: DiffRecordAccess> DiffRecordAccess for SkippingRecordAccess<A> {
    fn previous_node(&self, id: NodeId) -> RecordReference<NodeRecord> {
        if self.forwards(RecordCategory::Node) {
            self.delegate.previous_node(id)
        } else {
            RecordReference::Skip { id: id.0 }
        }
    }

    fn previous_relationship(&self, id: RelId) -> RecordReference<RelationshipRecord> {
        if self.forwards(RecordCategory::Relationship) {
            self.delegate.previous_relationship(id)
        } else {
            RecordReference::Skip { id: id.0 }
        }
    }

    fn previous_property(&self, id: PropertyId) -> RecordReference<PropertyRecord> {
        if self.forwards(RecordCategory::Property) {
            self.delegate.previous_property(id)
        } else {
            RecordReference::Skip { id: id.0 }
        }
    }

    fn changed_node(&self, id: NodeId) -> Option<NodeRecord> {
        self.forwards(RecordCategory::Node)
            .then(|| self.delegate.changed_node(id))
            .flatten()
    }

    fn changed_relationship(&self, id: RelId) -> Option<RelationshipRecord> {
        self.forwards(RecordCategory::Relationship)
            .then(|| self.delegate.changed_relationship(id))
            .flatten()
    }

    fn changed_property(&self, id: PropertyId) -> Option<PropertyRecord> {
        self.forwards(RecordCategory::Property)
            .then(|| self.delegate.changed_property(id))
            .flatten()
    }

    fn changed_string(&self, id: DynamicId) -> Option<StringRecord> {
        self.forwards(RecordCategory::String)
            .then(|| self.delegate.changed_string(id))
            .flatten()
    }

    fn changed_array(&self, id: DynamicId) -> Option<ArrayRecord> {
        self.forwards(RecordCategory::Array)
            .then(|| self.delegate.changed_array(id))
            .flatten()
    }
}
