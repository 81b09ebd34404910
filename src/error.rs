//! Error type shared by every table operation.
//!
//! All errors are raised at the point of violation. Operations validate
//! their input before touching any table, so an `Err` always leaves the
//! tables exactly as they were.

use crate::types::{FieldKind, Id};

/// Result alias for table operations.
pub type Result<T> = std::result::Result<T, TablesError>;

/// Which table a row reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// The node table.
    Nodes,
    /// The individual table.
    Individuals,
    /// The interval-edge table.
    IEdges,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nodes => write!(f, "nodes"),
            Self::Individuals => write!(f, "individuals"),
            Self::IEdges => write!(f, "iedges"),
        }
    }
}

/// Error type for table construction and transformation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TablesError {
    /// A field value does not match the declared kind of the field.
    #[error("Expected {field} to be {expected}, got {actual}")]
    FieldType {
        /// Name of the offending field.
        field: String,
        /// Kind declared by the row schema.
        expected: FieldKind,
        /// Rendering of the value that was supplied.
        actual: String,
    },

    /// A value could not be interpreted as a number at all.
    #[error("Could not convert {field}={value} to an integer")]
    Conversion {
        /// Name of the offending field.
        field: String,
        /// Rendering of the value that was supplied.
        value: String,
    },

    /// A numeric value is not integral where an integer is required.
    #[error("Expected {field} to be an integer, not {value}")]
    NotInteger {
        /// Name of the offending field.
        field: String,
        /// The non-integral value.
        value: f64,
    },

    /// A row reference points outside the referenced table.
    #[error("{id} does not correspond to a row in the {table} table ({num_rows} rows)")]
    Reference {
        /// Table the reference points into.
        table: TableKind,
        /// The out-of-range id.
        id: Id,
        /// Number of rows in that table.
        num_rows: usize,
    },

    /// A parent node is not strictly older than its child node.
    #[error(
        "Child time is not less than parent time: node {child} (time {child_time}) \
         has parent node {parent} (time {parent_time})"
    )]
    Ordering {
        /// Child node id.
        child: Id,
        /// Parent node id.
        parent: Id,
        /// Time of the child node.
        child_time: f64,
        /// Time of the parent node.
        parent_time: f64,
    },

    /// An interval-edge has a zero-length child or parent interval.
    #[error(
        "Interval edge {row} is degenerate: child span {child_span}, parent span {parent_span}"
    )]
    Interval {
        /// Row index of the offending edge.
        row: usize,
        /// `child_right - child_left`.
        child_span: i64,
        /// `parent_right - parent_left`.
        parent_span: i64,
    },

    /// A mutation was attempted after `freeze()`.
    #[error("Trying to modify the frozen {target}")]
    Frozen {
        /// What was being modified.
        target: &'static str,
    },

    /// The import source uses a feature these tables do not model.
    #[error("Tree sequence import does not support {feature} ({count} rows)")]
    UnsupportedFeature {
        /// Name of the unsupported row set.
        feature: &'static str,
        /// Number of rows found in it.
        count: usize,
    },

    /// Canonical serialization for hashing failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TablesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl TablesError {
    /// Build a `FieldType` error from a schema kind and the offending value.
    pub fn field_type(field: &str, expected: FieldKind, actual: impl std::fmt::Display) -> Self {
        Self::FieldType {
            field: field.to_string(),
            expected,
            actual: actual.to_string(),
        }
    }

    /// Returns true for errors caused by malformed row input.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            Self::FieldType { .. } | Self::Conversion { .. } | Self::NotInteger { .. }
        )
    }
}
