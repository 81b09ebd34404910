//! Node rows: a genome instance at a point in time.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::hash::{Hash, Hasher};

use crate::error::Result;
use super::field::{FieldKind, FieldReader, FieldSpec, IntoRowMap, RowMap};
use super::{Id, NODE_IS_SAMPLE, NULL};

/// A node: a genome at a given time.
///
/// Identity is the row position in the node table. Equality compares
/// `time` by bit pattern, so rows are `Eq` and `Hash`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodeRow {
    /// Age of the genome (larger is older).
    pub time: f64,
    /// Bitmask; bit 0 marks a sample.
    #[serde(default)]
    pub flags: u32,
    /// Individual this genome belongs to, or `NULL`.
    #[serde(default = "null_id")]
    pub individual: Id,
}

fn null_id() -> Id {
    NULL
}

impl NodeRow {
    /// Declared fields, in column order.
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("time", FieldKind::Real),
        FieldSpec::new("flags", FieldKind::Bitmask),
        FieldSpec::new("individual", FieldKind::Reference),
    ];

    /// Create a node with no flags and no individual.
    pub fn new(time: f64) -> Self {
        Self {
            time,
            flags: 0,
            individual: NULL,
        }
    }

    /// Create a node flagged as a sample.
    pub fn sample(time: f64) -> Self {
        Self::new(time).with_flags(NODE_IS_SAMPLE)
    }

    /// Set the flag mask.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Attach the node to an individual.
    pub fn with_individual(mut self, individual: Id) -> Self {
        self.individual = individual;
        self
    }

    /// Whether the sample bit is set.
    pub fn is_sample(&self) -> bool {
        self.flags & NODE_IS_SAMPLE > 0
    }

    /// Strictly build a row from a key-value mapping.
    pub fn from_fields(fields: &RowMap) -> Result<Self> {
        let reader = FieldReader::new(fields);
        Ok(Self {
            time: reader.real("time", None)?,
            flags: reader.bitmask("flags", Some(0))?,
            individual: reader.reference("individual", Some(NULL))?,
        })
    }

    /// Key-value view of the row.
    pub fn to_fields(&self) -> RowMap {
        let mut fields = RowMap::new();
        fields.insert("time".to_string(), json!(self.time));
        fields.insert("flags".to_string(), json!(self.flags));
        fields.insert("individual".to_string(), json!(self.individual));
        fields
    }
}

impl PartialEq for NodeRow {
    fn eq(&self, other: &Self) -> bool {
        self.time.to_bits() == other.time.to_bits()
            && self.flags == other.flags
            && self.individual == other.individual
    }
}

impl Eq for NodeRow {}

impl Hash for NodeRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.time.to_bits().hash(state);
        self.flags.hash(state);
        self.individual.hash(state);
    }
}

impl IntoRowMap for NodeRow {
    fn into_row_map(self) -> Result<RowMap> {
        Ok(self.to_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TablesError;

    #[test]
    fn test_sample_flag() {
        assert!(NodeRow::sample(0.0).is_sample());
        assert!(!NodeRow::new(0.0).is_sample());
        assert!(NodeRow::new(0.0).with_flags(0b11).is_sample());
    }

    #[test]
    fn test_fields_roundtrip() {
        let row = NodeRow::new(2.5).with_flags(1).with_individual(3);
        assert_eq!(NodeRow::from_fields(&row.to_fields()).unwrap(), row);
    }

    #[test]
    fn test_defaults_from_fields() {
        let fields = json!({"time": 1}).into_row_map().unwrap();
        let row = NodeRow::from_fields(&fields).unwrap();
        assert_eq!(row, NodeRow::new(1.0));
    }

    #[test]
    fn test_field_type_error_names_field() {
        let fields = json!({"time": 1.0, "individual": 0.5}).into_row_map().unwrap();
        match NodeRow::from_fields(&fields) {
            Err(TablesError::FieldType { field, expected, .. }) => {
                assert_eq!(field, "individual");
                assert_eq!(expected, FieldKind::Reference);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_time_is_required() {
        let fields = json!({"flags": 1}).into_row_map().unwrap();
        assert!(NodeRow::from_fields(&fields).is_err());
    }
}
