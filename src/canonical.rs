//! Canonical serialization for deterministic hashing.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable row order: tables serialize in row-id order
//! - Stable float format: f64 values serialize with serde_json's shortest
//!   round-trip representation

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

use crate::error::Result;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<u64> {
    let bytes = to_canonical_bytes(value)?;
    Ok(xxh64(&bytes, 0))
}

/// Compute canonical hash and return it as 16 hex digits.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> Result<String> {
    Ok(format!("{:016x}", canonical_hash(value)?))
}
