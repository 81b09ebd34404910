//! Hand-off point to graph structures built from tables.
//!
//! The tables never depend on a concrete graph type. Anything that can be
//! constructed from a [`Tables`] snapshot implements [`FromTables`] and is
//! obtained with [`Tables::graph`].

use crate::tables::Tables;

/// A structure that can be built from a set of tables.
pub trait FromTables: Sized {
    /// Error raised when the tables do not describe a valid structure.
    type Error;

    /// Build from `tables`, which are only borrowed.
    fn from_tables(tables: &Tables) -> Result<Self, Self::Error>;
}
