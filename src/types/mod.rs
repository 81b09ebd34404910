//! Row records and field schemas.

pub mod field;
pub mod node;
pub mod individual;
pub mod iedge;

pub use field::{check_int, pick_fields, FieldKind, FieldSpec, IntoRowMap, RowMap};
pub use node::NodeRow;
pub use individual::IndividualRow;
pub use iedge::IEdgeRow;

/// Row reference. Identity is the row position in its table.
pub type Id = i64;

/// Genome coordinate.
pub type Position = i64;

/// Null reference sentinel.
pub const NULL: Id = -1;

/// Node flag bit marking a sample.
pub const NODE_IS_SAMPLE: u32 = 1;
