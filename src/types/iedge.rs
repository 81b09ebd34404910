//! Interval-edge rows.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use super::field::{FieldKind, FieldReader, FieldSpec, IntoRowMap, RowMap};
use super::{Id, Position, NULL};

/// Maps `[parent_left, parent_right)` of a parent node onto
/// `[child_left, child_right)` of a child node.
///
/// The two intervals may differ in length. A parent interval given
/// right-to-left (`parent_left > parent_right`) is an inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IEdgeRow {
    /// Start of the interval in the child genome.
    pub child_left: Position,
    /// End of the interval in the child genome.
    pub child_right: Position,
    /// Start of the interval in the parent genome.
    pub parent_left: Position,
    /// End of the interval in the parent genome.
    pub parent_right: Position,
    /// Child node.
    pub child: Id,
    /// Parent node.
    pub parent: Id,
    /// External edge identifier, or `NULL`.
    #[serde(default = "null_id")]
    pub edge: Id,
    /// Chromosome of the child interval, or `NULL`.
    #[serde(default = "null_id")]
    pub child_chromosome: Id,
    /// Chromosome of the parent interval, or `NULL`.
    #[serde(default = "null_id")]
    pub parent_chromosome: Id,
}

fn null_id() -> Id {
    NULL
}

impl IEdgeRow {
    /// Declared fields, in column order.
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("child_left", FieldKind::Integer),
        FieldSpec::new("child_right", FieldKind::Integer),
        FieldSpec::new("parent_left", FieldKind::Integer),
        FieldSpec::new("parent_right", FieldKind::Integer),
        FieldSpec::new("child", FieldKind::Reference),
        FieldSpec::new("parent", FieldKind::Reference),
        FieldSpec::new("edge", FieldKind::Integer),
        FieldSpec::new("child_chromosome", FieldKind::Integer),
        FieldSpec::new("parent_chromosome", FieldKind::Integer),
    ];

    /// Create an edge with no edge id and no chromosome tags.
    pub fn new(
        child_left: Position,
        child_right: Position,
        parent_left: Position,
        parent_right: Position,
        child: Id,
        parent: Id,
    ) -> Self {
        Self {
            child_left,
            child_right,
            parent_left,
            parent_right,
            child,
            parent,
            edge: NULL,
            child_chromosome: NULL,
            parent_chromosome: NULL,
        }
    }

    /// Set the external edge identifier.
    pub fn with_edge(mut self, edge: Id) -> Self {
        self.edge = edge;
        self
    }

    /// Tag both intervals with chromosomes.
    pub fn with_chromosomes(mut self, child_chromosome: Id, parent_chromosome: Id) -> Self {
        self.child_chromosome = child_chromosome;
        self.parent_chromosome = parent_chromosome;
        self
    }

    /// `parent_right - parent_left`; negative for an inversion.
    pub fn parent_span(&self) -> i64 {
        self.parent_right - self.parent_left
    }

    /// `child_right - child_left`.
    pub fn child_span(&self) -> i64 {
        self.child_right - self.child_left
    }

    /// Whether the parent interval is read right-to-left.
    pub fn is_inversion(&self) -> bool {
        self.parent_span() < 0
    }

    /// Neither interval is empty, and the child interval runs left-to-right.
    pub fn is_nondegenerate(&self) -> bool {
        self.child_span() > 0 && self.parent_span() != 0
    }

    /// Strictly build a row from a key-value mapping.
    pub fn from_fields(fields: &RowMap) -> Result<Self> {
        let reader = FieldReader::new(fields);
        Ok(Self {
            child_left: reader.integer("child_left", None)?,
            child_right: reader.integer("child_right", None)?,
            parent_left: reader.integer("parent_left", None)?,
            parent_right: reader.integer("parent_right", None)?,
            child: reader.reference("child", None)?,
            parent: reader.reference("parent", None)?,
            edge: reader.integer("edge", Some(NULL))?,
            child_chromosome: reader.integer("child_chromosome", Some(NULL))?,
            parent_chromosome: reader.integer("parent_chromosome", Some(NULL))?,
        })
    }

    /// Key-value view of the row.
    pub fn to_fields(&self) -> RowMap {
        let mut fields = RowMap::new();
        fields.insert("child_left".to_string(), json!(self.child_left));
        fields.insert("child_right".to_string(), json!(self.child_right));
        fields.insert("parent_left".to_string(), json!(self.parent_left));
        fields.insert("parent_right".to_string(), json!(self.parent_right));
        fields.insert("child".to_string(), json!(self.child));
        fields.insert("parent".to_string(), json!(self.parent));
        fields.insert("edge".to_string(), json!(self.edge));
        fields.insert("child_chromosome".to_string(), json!(self.child_chromosome));
        fields.insert("parent_chromosome".to_string(), json!(self.parent_chromosome));
        fields
    }
}

impl IntoRowMap for IEdgeRow {
    fn into_row_map(self) -> Result<RowMap> {
        Ok(self.to_fields())
    }
}
