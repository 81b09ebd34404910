//! Advisory guarantee flags for the interval-edge table.
//!
//! A set bit records that a structural property was checked and still
//! holds. Bits are only ever cleared by ordinary mutation; the one way to
//! set a bit again is the matching re-validation routine:
//!
//! | Flag | Cleared when | Re-set by |
//! |------|--------------|-----------|
//! | `PARENT_OLDER_THAN_CHILD` | an edge is added without a node-time check | `Tables::validate_parent_older_than_child` |
//! | `NONDEGENERATE_INTERVALS` | an added edge has an empty interval | `IEdgeTable::validate_intervals` |
//!
//! The flags are a cheap cache, not an enforced invariant: nothing keeps
//! checking them in the background.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Set of structural guarantees currently known to hold.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IEdgeFlags(u32);

impl IEdgeFlags {
    /// No guarantees.
    pub const EMPTY: Self = Self(0);
    /// Every edge's parent node is strictly older than its child node.
    pub const PARENT_OLDER_THAN_CHILD: Self = Self(1 << 0);
    /// Every child interval runs left-to-right and no parent interval is empty.
    pub const NONDEGENERATE_INTERVALS: Self = Self(1 << 1);
    /// The table is a structurally valid graph: every guarantee holds.
    pub const VALID_GIG: Self = Self(Self::PARENT_OLDER_THAN_CHILD.0 | Self::NONDEGENERATE_INTERVALS.0);

    /// Raw bit pattern.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set.
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the full set of guarantees holds.
    pub fn is_valid_gig(&self) -> bool {
        self.contains(Self::VALID_GIG)
    }

    /// Clear the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Set the bits of `other`.
    pub(crate) fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl Default for IEdgeFlags {
    fn default() -> Self {
        Self::VALID_GIG
    }
}

impl fmt::Debug for IEdgeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::PARENT_OLDER_THAN_CHILD) {
            names.push("PARENT_OLDER_THAN_CHILD");
        }
        if self.contains(Self::NONDEGENERATE_INTERVALS) {
            names.push("NONDEGENERATE_INTERVALS");
        }
        write!(f, "IEdgeFlags({})", names.join(" | "))
    }
}
