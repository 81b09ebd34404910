//! Interval-edge table.
//!
//! The edge table carries more logic than the other tables: it coerces
//! loosely-typed coordinates to integers, understands the single-interval
//! `left`/`right` edge shape of tree sequences, and keeps a set of
//! advisory [`IEdgeFlags`] so that algorithms can run on an edge table
//! that has not yet been published as a valid graph.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Deref;

use crate::error::{Result, TableKind, TablesError};
use crate::flags::IEdgeFlags;
use crate::types::{check_int, pick_fields, FieldSpec, Id, IEdgeRow, IntoRowMap, RowMap};
use super::{ColumnView, Columns, Table, TableRow};

/// Column storage for interval-edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IEdgeColumns {
    child_left: Vec<i64>,
    child_right: Vec<i64>,
    parent_left: Vec<i64>,
    parent_right: Vec<i64>,
    child: Vec<Id>,
    parent: Vec<Id>,
    edge: Vec<Id>,
    child_chromosome: Vec<Id>,
    parent_chromosome: Vec<Id>,
}

impl Columns for IEdgeColumns {
    type Row = IEdgeRow;

    fn len(&self) -> usize {
        self.child.len()
    }

    fn push(&mut self, row: &IEdgeRow) {
        self.child_left.push(row.child_left);
        self.child_right.push(row.child_right);
        self.parent_left.push(row.parent_left);
        self.parent_right.push(row.parent_right);
        self.child.push(row.child);
        self.parent.push(row.parent);
        self.edge.push(row.edge);
        self.child_chromosome.push(row.child_chromosome);
        self.parent_chromosome.push(row.parent_chromosome);
    }

    fn row(&self, index: usize) -> Option<IEdgeRow> {
        Some(IEdgeRow {
            child_left: *self.child_left.get(index)?,
            child_right: self.child_right[index],
            parent_left: self.parent_left[index],
            parent_right: self.parent_right[index],
            child: self.child[index],
            parent: self.parent[index],
            edge: self.edge[index],
            child_chromosome: self.child_chromosome[index],
            parent_chromosome: self.parent_chromosome[index],
        })
    }

    fn column(&self, name: &str) -> Option<ColumnView<'_>> {
        let values = match name {
            "child_left" => &self.child_left,
            "child_right" => &self.child_right,
            "parent_left" => &self.parent_left,
            "parent_right" => &self.parent_right,
            "child" => &self.child,
            "parent" => &self.parent,
            "edge" => &self.edge,
            "child_chromosome" => &self.child_chromosome,
            "parent_chromosome" => &self.parent_chromosome,
            _ => return None,
        };
        Some(ColumnView::Integer(values))
    }
}

impl TableRow for IEdgeRow {
    type Columns = IEdgeColumns;
    const FIELDS: &'static [FieldSpec] = IEdgeRow::SCHEMA;
    const KIND: TableKind = TableKind::IEdges;

    fn from_fields(fields: &RowMap) -> Result<Self> {
        IEdgeRow::from_fields(fields)
    }

    fn to_fields(&self) -> RowMap {
        IEdgeRow::to_fields(self)
    }
}

/// Table of interval-edges plus the guarantees known to hold for it.
///
/// Read access to the rows goes through `Deref` to the generic
/// [`Table`]; every mutation goes through this type so the flags can be
/// kept honest.
#[derive(Debug, Clone, Default)]
pub struct IEdgeTable {
    table: Table<IEdgeRow>,
    flags: IEdgeFlags,
}

impl Deref for IEdgeTable {
    type Target = Table<IEdgeRow>;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl PartialEq for IEdgeTable {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl Eq for IEdgeTable {}

impl IEdgeTable {
    /// Create an empty, unfrozen table with every guarantee set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an unfrozen table from rows whose guarantees are `flags`.
    pub(crate) fn from_rows_with_flags(rows: impl IntoIterator<Item = IEdgeRow>, flags: IEdgeFlags) -> Self {
        Self {
            table: Table::from_rows(rows),
            flags,
        }
    }

    /// Guarantees currently recorded for this table.
    pub fn flags(&self) -> IEdgeFlags {
        self.flags
    }

    /// Clear one or more guarantee bits.
    pub fn unset_bitflag(&mut self, flag: IEdgeFlags) -> Result<()> {
        self.table.ensure_mutable()?;
        self.clear_flag(flag);
        Ok(())
    }

    fn clear_flag(&mut self, flag: IEdgeFlags) {
        if self.flags.contains(flag) {
            tracing::trace!(?flag, "clearing iedge guarantee");
        }
        self.flags.remove(flag);
    }

    /// Append a typed edge.
    ///
    /// The table cannot see node times, so this clears
    /// `PARENT_OLDER_THAN_CHILD`; use `Tables::add_iedge_row` to keep it.
    pub fn add_row(&mut self, row: IEdgeRow) -> Result<Id> {
        self.push(row, false)
    }

    /// Append a typed edge whose node times were checked (or are trusted)
    /// by the caller.
    pub(crate) fn add_row_with_checked_times(&mut self, row: IEdgeRow) -> Result<Id> {
        self.push(row, true)
    }

    fn push(&mut self, row: IEdgeRow, node_times_checked: bool) -> Result<Id> {
        self.table.ensure_mutable()?;
        if !node_times_checked {
            self.clear_flag(IEdgeFlags::PARENT_OLDER_THAN_CHILD);
        }
        if !row.is_nondegenerate() {
            self.clear_flag(IEdgeFlags::NONDEGENERATE_INTERVALS);
        }
        self.table.add_row(row)
    }

    /// Append an edge built from a mapping, checking every field strictly.
    pub fn add_row_fields(&mut self, fields: &RowMap) -> Result<Id> {
        self.table.ensure_mutable()?;
        let row = IEdgeRow::from_fields(fields)?;
        self.add_row(row)
    }

    /// Append an edge, first coercing every integer field from any
    /// integral-valued number (e.g. `4.0`).
    ///
    /// Fails with `NotInteger` for a fractional value and `Conversion` for
    /// a value that is not a number at all.
    pub fn add_int_row(&mut self, fields: &RowMap) -> Result<Id> {
        self.table.ensure_mutable()?;
        let row = Self::coerce_int_row(fields)?;
        self.add_row(row)
    }

    /// Build an edge from loosely-typed fields, coercing integers.
    pub fn coerce_int_row(fields: &RowMap) -> Result<IEdgeRow> {
        let mut coerced = RowMap::new();
        for spec in IEdgeRow::SCHEMA {
            if let Some(value) = fields.get(spec.name) {
                coerced.insert(spec.name.to_string(), Value::from(check_int(value, spec.name)?));
            }
        }
        IEdgeRow::from_fields(&coerced)
    }

    /// Append any mapping-like object as an edge.
    ///
    /// A `left`/`right` pair (the single-interval edge shape of a tree
    /// sequence) fills both the child and parent coordinates; explicit
    /// `child_*`/`parent_*` fields take precedence. Coordinates are
    /// coerced as in [`IEdgeTable::add_int_row`].
    pub fn append(&mut self, obj: impl IntoRowMap) -> Result<Id> {
        self.table.ensure_mutable()?;
        let row = Self::ingest(obj)?;
        self.add_row(row)
    }

    fn ingest(obj: impl IntoRowMap) -> Result<IEdgeRow> {
        let fields = pick_fields(expand_interval_aliases(obj.into_row_map()?), IEdgeRow::SCHEMA);
        Self::coerce_int_row(&fields)
    }

    /// Append many mapping-like objects as edges.
    ///
    /// Every row is checked before any is appended.
    pub fn add_rows<T: IntoRowMap>(&mut self, rows: impl IntoIterator<Item = T>) -> Result<Vec<Id>> {
        self.table.ensure_mutable()?;
        let rows = rows.into_iter().map(|obj| Self::ingest(obj)).collect::<Result<Vec<_>>>()?;
        rows.into_iter().map(|row| self.add_row(row)).collect()
    }

    /// Make the table and its flags permanently read-only.
    pub fn freeze(&mut self) {
        self.table.freeze();
    }

    /// An unfrozen, independent copy with the same rows and flags.
    pub fn copy(&self) -> Self {
        Self {
            table: self.table.copy(),
            flags: self.flags,
        }
    }

    /// Delete all rows. Guarantees hold trivially for an empty table.
    pub fn clear(&mut self) -> Result<()> {
        self.table.clear()?;
        self.flags = IEdgeFlags::default();
        Ok(())
    }

    /// Check that every edge is non-degenerate, without touching the flags.
    pub fn check_intervals(&self) -> Result<()> {
        match self.iter().position(|row| !row.is_nondegenerate()) {
            None => Ok(()),
            Some(index) => {
                let row = &self.columns();
                Err(TablesError::Interval {
                    row: index,
                    child_span: row.child_right[index] - row.child_left[index],
                    parent_span: row.parent_right[index] - row.parent_left[index],
                })
            }
        }
    }

    /// Re-check every edge and, if all are non-degenerate, set
    /// `NONDEGENERATE_INTERVALS` again.
    pub fn validate_intervals(&mut self) -> Result<()> {
        self.table.ensure_mutable()?;
        self.check_intervals()?;
        self.flags.insert(IEdgeFlags::NONDEGENERATE_INTERVALS);
        Ok(())
    }

    pub(crate) fn mark_parent_older_than_child(&mut self) -> Result<()> {
        self.table.ensure_mutable()?;
        self.flags.insert(IEdgeFlags::PARENT_OLDER_THAN_CHILD);
        Ok(())
    }

    /// Child-side interval starts.
    pub fn child_left(&self) -> &[i64] {
        &self.columns().child_left
    }

    /// Child-side interval ends.
    pub fn child_right(&self) -> &[i64] {
        &self.columns().child_right
    }

    /// Parent-side interval starts.
    pub fn parent_left(&self) -> &[i64] {
        &self.columns().parent_left
    }

    /// Parent-side interval ends.
    pub fn parent_right(&self) -> &[i64] {
        &self.columns().parent_right
    }

    /// Child node ids.
    pub fn child(&self) -> &[Id] {
        &self.columns().child
    }

    /// Parent node ids.
    pub fn parent(&self) -> &[Id] {
        &self.columns().parent
    }

    /// External edge ids.
    pub fn edge(&self) -> &[Id] {
        &self.columns().edge
    }

    /// Child chromosome tags.
    pub fn child_chromosome(&self) -> &[Id] {
        &self.columns().child_chromosome
    }

    /// Parent chromosome tags.
    pub fn parent_chromosome(&self) -> &[Id] {
        &self.columns().parent_chromosome
    }
}

/// Copy `left`/`right` onto both the child and the parent coordinates,
/// letting explicit `child_*`/`parent_*` entries win.
fn expand_interval_aliases(fields: RowMap) -> RowMap {
    let mut expanded = RowMap::new();
    for side in ["left", "right"] {
        if let Some(value) = fields.get(side) {
            expanded.insert(format!("child_{side}"), value.clone());
            expanded.insert(format!("parent_{side}"), value.clone());
        }
    }
    expanded.extend(fields);
    expanded
}
