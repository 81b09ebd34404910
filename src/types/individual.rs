//! Individual rows: organisms made of one or more nodes.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use super::field::{FieldKind, FieldReader, FieldSpec, IntoRowMap, RowMap};
use super::Id;

/// An individual with any number of parent individuals.
///
/// Parents are ordered; `NULL` stands for an unknown or removed parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndividualRow {
    /// Parent individual ids.
    #[serde(default)]
    pub parents: Vec<Id>,
}

impl IndividualRow {
    /// Declared fields, in column order.
    pub const SCHEMA: &'static [FieldSpec] = &[FieldSpec::new("parents", FieldKind::References)];

    /// Create an individual with the given parents.
    pub fn new(parents: impl Into<Vec<Id>>) -> Self {
        Self {
            parents: parents.into(),
        }
    }

    /// Strictly build a row from a key-value mapping.
    pub fn from_fields(fields: &RowMap) -> Result<Self> {
        Ok(Self {
            parents: FieldReader::new(fields).references("parents")?,
        })
    }

    /// Key-value view of the row.
    pub fn to_fields(&self) -> RowMap {
        let mut fields = RowMap::new();
        fields.insert("parents".to_string(), json!(self.parents));
        fields
    }
}

impl IntoRowMap for IndividualRow {
    fn into_row_map(self) -> Result<RowMap> {
        Ok(self.to_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NULL;

    #[test]
    fn test_general_pedigree() {
        let row = IndividualRow::new([0, 1, 2]);
        assert_eq!(row.parents.len(), 3);
        assert_eq!(IndividualRow::from_fields(&row.to_fields()).unwrap(), row);
    }

    #[test]
    fn test_missing_parents_is_founder() {
        let row = IndividualRow::from_fields(&RowMap::new()).unwrap();
        assert!(row.parents.is_empty());
    }

    #[test]
    fn test_null_parent_allowed() {
        let fields = json!({"parents": [NULL, 4]}).into_row_map().unwrap();
        assert_eq!(
            IndividualRow::from_fields(&fields).unwrap().parents,
            vec![NULL, 4]
        );
    }

    #[test]
    fn test_rejects_scalar_parents() {
        let fields = json!({"parents": 4}).into_row_map().unwrap();
        assert!(IndividualRow::from_fields(&fields).is_err());
    }
}
