//! Row schemas and the loose key-value adapter.
//!
//! The typed core only accepts row structs. Foreign row shapes (JSON
//! objects, tree-sequence rows) enter through a [`RowMap`], which is
//! checked field by field against the static schema of the row kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TablesError};
use super::{Id, NULL};

/// Generic key-value view of a row.
pub type RowMap = serde_json::Map<String, Value>;

/// Semantic type of a row field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Signed integer (genome coordinate or external identifier).
    Integer,
    /// Real number.
    Real,
    /// Unsigned 32-bit bitmask.
    Bitmask,
    /// Reference to a row, or `NULL`.
    Reference,
    /// Ordered list of row references.
    References,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Real => write!(f, "real"),
            Self::Bitmask => write!(f, "bitmask"),
            Self::Reference => write!(f, "reference"),
            Self::References => write!(f, "references"),
        }
    }
}

/// Declared field of a row kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, as used in a [`RowMap`].
    pub name: &'static str,
    /// Semantic type of the field.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declare a field.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Anything that can be viewed as a [`RowMap`].
pub trait IntoRowMap {
    /// Convert into a key-value mapping.
    fn into_row_map(self) -> Result<RowMap>;
}

impl IntoRowMap for RowMap {
    fn into_row_map(self) -> Result<RowMap> {
        Ok(self)
    }
}

impl IntoRowMap for &RowMap {
    fn into_row_map(self) -> Result<RowMap> {
        Ok(self.clone())
    }
}

impl IntoRowMap for Value {
    fn into_row_map(self) -> Result<RowMap> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(TablesError::Conversion {
                field: "row".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Keep only the entries named by `schema`.
pub fn pick_fields(fields: RowMap, schema: &[FieldSpec]) -> RowMap {
    fields
        .into_iter()
        .filter(|(name, _)| schema.iter().any(|spec| spec.name == name))
        .collect()
}

/// Coerce an integral-valued number to an integer.
///
/// Accepts integers and floats with no fractional part (e.g. `4.0`).
pub fn check_int(value: &Value, field: &str) -> Result<i64> {
    let Value::Number(number) = value else {
        return Err(TablesError::Conversion {
            field: field.to_string(),
            value: value.to_string(),
        });
    };
    if let Some(i) = number.as_i64() {
        return Ok(i);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(f as i64)
        }
        Some(f) => Err(TablesError::NotInteger {
            field: field.to_string(),
            value: f,
        }),
        None => Err(TablesError::Conversion {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Strict, schema-checked reads from a [`RowMap`].
pub(crate) struct FieldReader<'a> {
    fields: &'a RowMap,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(fields: &'a RowMap) -> Self {
        Self { fields }
    }

    fn lookup(&self, name: &str, kind: FieldKind) -> Result<Option<&'a Value>> {
        match self.fields.get(name) {
            Some(Value::Null) => Err(TablesError::field_type(name, kind, "null")),
            other => Ok(other),
        }
    }

    fn missing(name: &str, kind: FieldKind) -> TablesError {
        TablesError::field_type(name, kind, "<missing>")
    }

    pub(crate) fn integer(&self, name: &str, default: Option<i64>) -> Result<i64> {
        match self.lookup(name, FieldKind::Integer)? {
            Some(value) => value
                .as_i64()
                .ok_or_else(|| TablesError::field_type(name, FieldKind::Integer, value)),
            None => default.ok_or_else(|| Self::missing(name, FieldKind::Integer)),
        }
    }

    pub(crate) fn real(&self, name: &str, default: Option<f64>) -> Result<f64> {
        match self.lookup(name, FieldKind::Real)? {
            Some(value) => value
                .as_f64()
                .ok_or_else(|| TablesError::field_type(name, FieldKind::Real, value)),
            None => default.ok_or_else(|| Self::missing(name, FieldKind::Real)),
        }
    }

    pub(crate) fn bitmask(&self, name: &str, default: Option<u32>) -> Result<u32> {
        match self.lookup(name, FieldKind::Bitmask)? {
            Some(value) => value
                .as_u64()
                .and_then(|mask| u32::try_from(mask).ok())
                .ok_or_else(|| TablesError::field_type(name, FieldKind::Bitmask, value)),
            None => default.ok_or_else(|| Self::missing(name, FieldKind::Bitmask)),
        }
    }

    pub(crate) fn reference(&self, name: &str, default: Option<Id>) -> Result<Id> {
        match self.lookup(name, FieldKind::Reference)? {
            Some(value) => as_reference(value)
                .ok_or_else(|| TablesError::field_type(name, FieldKind::Reference, value)),
            None => default.ok_or_else(|| Self::missing(name, FieldKind::Reference)),
        }
    }

    pub(crate) fn references(&self, name: &str) -> Result<Vec<Id>> {
        match self.lookup(name, FieldKind::References)? {
            Some(value) => value
                .as_array()
                .and_then(|items| items.iter().map(as_reference).collect::<Option<Vec<_>>>())
                .ok_or_else(|| TablesError::field_type(name, FieldKind::References, value)),
            None => Ok(Vec::new()),
        }
    }
}

fn as_reference(value: &Value) -> Option<Id> {
    value.as_i64().filter(|id| *id >= NULL)
}
