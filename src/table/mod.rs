//! Generic append-only, freezable table container.
//!
//! Rows are stored column-wise: each row kind owns a [`Columns`] type
//! holding one vector per field, so projecting a column is a borrow of
//! the storage rather than a scan over rows.

pub mod node;
pub mod individual;
pub mod iedge;

use serde::Serialize;
use std::fmt;

use crate::error::{Result, TableKind, TablesError};
use crate::types::{pick_fields, FieldSpec, Id, IntoRowMap, RowMap};

pub use node::{NodeColumns, NodeTable};
pub use individual::{IndividualColumns, IndividualTable, RaggedColumn};
pub use iedge::{IEdgeColumns, IEdgeTable};

/// A row record that can be stored in a [`Table`].
pub trait TableRow: Clone + PartialEq + fmt::Debug + Serialize + IntoRowMap {
    /// Column storage for this row kind.
    type Columns: Columns<Row = Self>;

    /// Declared fields, in column order.
    const FIELDS: &'static [FieldSpec];

    /// Table this row kind lives in.
    const KIND: TableKind;

    /// Strictly build a row from a key-value mapping.
    fn from_fields(fields: &RowMap) -> Result<Self>;

    /// Key-value view of the row.
    fn to_fields(&self) -> RowMap;
}

/// Struct-of-arrays storage for one row kind.
pub trait Columns: Default + Clone + fmt::Debug {
    /// Row kind stored.
    type Row;

    /// Number of rows.
    fn len(&self) -> usize;

    /// Whether there are no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a row.
    fn push(&mut self, row: &Self::Row);

    /// Reassemble the row at `index`.
    fn row(&self, index: usize) -> Option<Self::Row>;

    /// Borrow a column by field name.
    fn column(&self, name: &str) -> Option<ColumnView<'_>>;
}

/// Borrowed view of a single column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnView<'a> {
    /// Integer or reference column.
    Integer(&'a [i64]),
    /// Real-valued column.
    Real(&'a [f64]),
    /// Bitmask column.
    Bitmask(&'a [u32]),
    /// Variable-length reference lists.
    Ragged(RaggedColumn<'a>),
}

impl ColumnView<'_> {
    /// Number of rows covered by the view.
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(values) => values.len(),
            Self::Real(values) => values.len(),
            Self::Bitmask(values) => values.len(),
            Self::Ragged(ragged) => ragged.len(),
        }
    }

    /// Whether the view covers no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether a table still accepts structural changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mutability {
    /// Rows may be appended, cleared or replaced.
    #[default]
    Building,
    /// Frozen: read-only for the rest of its life.
    Published,
}

/// An ordered sequence of rows of one kind.
///
/// Row identity is insertion position. Rows are never edited in place;
/// a table is either appended to or rebuilt.
#[derive(Debug, Clone)]
pub struct Table<R: TableRow> {
    columns: R::Columns,
    mutability: Mutability,
}

impl<R: TableRow> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TableRow> Table<R> {
    /// Create an empty, unfrozen table.
    pub fn new() -> Self {
        Self {
            columns: R::Columns::default(),
            mutability: Mutability::Building,
        }
    }

    /// Build an unfrozen table from typed rows.
    pub fn from_rows(rows: impl IntoIterator<Item = R>) -> Self {
        let mut columns = R::Columns::default();
        for row in rows {
            columns.push(&row);
        }
        Self {
            columns,
            mutability: Mutability::Building,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Current mutability mode.
    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    /// Whether `freeze()` has been called.
    pub fn is_frozen(&self) -> bool {
        self.mutability == Mutability::Published
    }

    pub(crate) fn ensure_mutable(&self) -> Result<()> {
        match self.mutability {
            Mutability::Building => Ok(()),
            Mutability::Published => Err(TablesError::Frozen {
                target: frozen_target(R::KIND),
            }),
        }
    }

    /// Append a typed row and return its id.
    pub fn add_row(&mut self, row: R) -> Result<Id> {
        self.ensure_mutable()?;
        self.columns.push(&row);
        Ok(self.last_id())
    }

    /// Append a row built from a mapping, checking every field strictly.
    ///
    /// Only declared fields are read; other entries are ignored.
    pub fn add_row_fields(&mut self, fields: &RowMap) -> Result<Id> {
        self.ensure_mutable()?;
        let row = R::from_fields(fields)?;
        self.columns.push(&row);
        Ok(self.last_id())
    }

    /// Append any mapping-like object, keeping only the fields this row
    /// kind declares.
    ///
    /// ```
    /// use gig_tables::{NodeTable, NodeRow};
    /// use serde_json::json;
    ///
    /// let mut nodes = NodeTable::new();
    /// let id = nodes.append(json!({"time": 1.0, "population": 0})).unwrap();
    /// assert_eq!(nodes.get(0), Some(NodeRow::new(1.0)));
    /// assert_eq!(id, 0);
    /// ```
    pub fn append(&mut self, obj: impl IntoRowMap) -> Result<Id> {
        self.ensure_mutable()?;
        let fields = pick_fields(obj.into_row_map()?, R::FIELDS);
        self.add_row_fields(&fields)
    }

    /// Append many mapping-like objects.
    ///
    /// Every row is checked before any is appended.
    pub fn add_rows<T: IntoRowMap>(&mut self, rows: impl IntoIterator<Item = T>) -> Result<Vec<Id>> {
        self.ensure_mutable()?;
        let rows = rows
            .into_iter()
            .map(|obj| R::from_fields(&pick_fields(obj.into_row_map()?, R::FIELDS)))
            .collect::<Result<Vec<_>>>()?;
        let first = self.len() as Id;
        for row in &rows {
            self.columns.push(row);
        }
        Ok((first..self.len() as Id).collect())
    }

    fn last_id(&self) -> Id {
        self.len() as Id - 1
    }

    /// The row at `index`, if any.
    pub fn get(&self, index: usize) -> Option<R> {
        self.columns.row(index)
    }

    /// The row referenced by `id`, failing with a reference error when
    /// `id` is not a row of this table.
    pub fn row(&self, id: Id) -> Result<R> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.get(index))
            .ok_or(TablesError::Reference {
                table: R::KIND,
                id,
                num_rows: self.len(),
            })
    }

    /// Iterate over rows in order.
    pub fn iter(&self) -> impl Iterator<Item = R> + '_ {
        (0..self.len()).filter_map(move |index| self.columns.row(index))
    }

    /// Column storage.
    pub fn columns(&self) -> &R::Columns {
        &self.columns
    }

    /// Borrow a column by field name.
    pub fn column(&self, name: &str) -> Option<ColumnView<'_>> {
        self.columns.column(name)
    }

    /// Make the table permanently read-only.
    pub fn freeze(&mut self) {
        self.mutability = Mutability::Published;
    }

    /// An unfrozen, independent copy with the same rows.
    pub fn copy(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            mutability: Mutability::Building,
        }
    }

    /// Delete all rows.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.columns = R::Columns::default();
        Ok(())
    }

    /// Dump every row as a key-value mapping, for exploratory use.
    pub fn to_records(&self) -> Vec<RowMap> {
        self.iter().map(|row| row.to_fields()).collect()
    }
}

impl<R: TableRow> PartialEq for Table<R> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<R: TableRow + Eq> Eq for Table<R> {}

pub(crate) fn frozen_target(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Nodes => "node table",
        TableKind::Individuals => "individual table",
        TableKind::IEdges => "iedge table",
    }
}
