//! # gig-tables
//!
//! Table storage for genetic inheritance graphs (GIGs).
//!
//! A GIG is described by three tables:
//!
//! - **nodes**: genomes, with a time (larger is older), sample flags and
//!   an optional owning individual
//! - **individuals**: organisms, with links to their parent individuals
//! - **interval-edges**: "this stretch of the child genome was inherited
//!   from that stretch of the parent genome", with independent child and
//!   parent coordinates so that inversions and translocations can be
//!   represented
//!
//! ## Architecture
//!
//! ```text
//! TreeSequenceTables ──from_tree_sequence──▶ Tables ──freeze──▶ published snapshot
//!                                              │                    │
//!                              sort / decapitate / change_times   graph::<G>()
//! ```
//!
//! ## Guarantees
//!
//! - Every operation validates its input before changing anything: an
//!   `Err` leaves the tables untouched
//! - A frozen table or collection rejects every mutation with
//!   [`TablesError::Frozen`]
//! - [`IEdgeFlags`] record structural properties known to hold; mutation
//!   can only clear them, and only explicit validation sets them again
//! - Same rows + same time units → identical [`Tables::fingerprint`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod display;
pub mod error;
pub mod flags;
pub mod graph;
pub mod import;
pub mod table;
pub mod tables;
pub mod types;

// Re-exports
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use display::{truncate_rows, DisplayRow, PlainTextFormatter, PrintOptions, TableDisplay, TableFormatter};
pub use error::{Result, TableKind, TablesError};
pub use flags::IEdgeFlags;
pub use graph::FromTables;
pub use import::{ImportOptions, TreeSequenceTables};
pub use table::{
    ColumnView, Columns, IEdgeTable, IndividualTable, Mutability, NodeTable, RaggedColumn, Table, TableRow,
};
pub use tables::{NodeTimeValidation, Tables, UNKNOWN_TIME_UNITS};
pub use types::{
    check_int, FieldKind, FieldSpec, IEdgeRow, Id, IndividualRow, IntoRowMap, NodeRow, Position, RowMap,
    NODE_IS_SAMPLE, NULL,
};
