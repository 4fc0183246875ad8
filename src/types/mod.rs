//! Identifier newtypes, record kinds and the crate error type.

use std::fmt;

use serde::Serialize;

use crate::check::ConsistencySummary;
use crate::options::ConfigError;

/// Raw value used by every pointer slot to mean "no record".
pub const NONE_ID: u64 = u64::MAX;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Sentinel stored in a pointer slot that references nothing.
            pub const NONE: $name = $name(NONE_ID);

            /// Returns true if this id is the "no record" sentinel.
            pub const fn is_none(self) -> bool {
                self.0 == NONE_ID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_none() {
                    f.write_str("none")
                } else {
                    write!(f, "{}", self.0)
                }
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                $name(value)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

record_id!(
    /// Identifier of a node record.
    NodeId
);
record_id!(
    /// Identifier of a relationship record.
    RelId
);
record_id!(
    /// Identifier of a property record.
    PropertyId
);
record_id!(
    /// Identifier of a dynamic (string or array overflow) record.
    DynamicId
);

/// Kinds of fixed-size records held by the store.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Node record.
    Node,
    /// Relationship record.
    Relationship,
    /// Property record.
    Property,
    /// Dynamic string block.
    String,
    /// Dynamic array block.
    Array,
}

impl RecordKind {
    /// Lower-case name used in messages and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordKind::Node => "node",
            RecordKind::Relationship => "relationship",
            RecordKind::Property => "property",
            RecordKind::String => "string",
            RecordKind::Array => "array",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the consistency engine.
///
/// Store corruption is never an error: it is reported as data through
/// [`crate::check::ConsistencyReport`] or [`crate::repair::Diagnostics`].
#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    /// A chain direction was asked about a node the relationship does not reference.
    #[error("relationship {rel} does not reference node {node}")]
    NotAnEndpoint {
        /// Relationship that was inspected.
        rel: RelId,
        /// Node the caller supplied.
        node: NodeId,
    },
    /// A strict load addressed a record that is not in use.
    #[error("{kind} record {id} not in use")]
    NotFound {
        /// Kind of the record that was requested.
        kind: RecordKind,
        /// Raw id of the record.
        id: u64,
    },
    /// A verification pass found inconsistencies.
    #[error("store is inconsistent: {} inconsistent records", .0.total_inconsistent_records())]
    Inconsistent(Box<ConsistencySummary>),
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Invalid argument.
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
    /// The tracing subscriber could not be installed.
    #[error("logging: {0}")]
    Logging(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CheckError>;
