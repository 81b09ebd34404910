//! Individual table columns.
//!
//! Parent lists have variable length, so they are stored ragged: one flat
//! vector of parent ids plus an offset vector with one more entry than
//! there are rows.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableKind};
use crate::types::{FieldSpec, Id, IndividualRow, RowMap};
use super::{ColumnView, Columns, Table, TableRow};

/// Table of [`IndividualRow`]s.
pub type IndividualTable = Table<IndividualRow>;

/// Column storage for individuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualColumns {
    parents: Vec<Id>,
    parents_offset: Vec<usize>,
}

impl Default for IndividualColumns {
    fn default() -> Self {
        Self {
            parents: Vec::new(),
            parents_offset: vec![0],
        }
    }
}

impl Columns for IndividualColumns {
    type Row = IndividualRow;

    fn len(&self) -> usize {
        self.parents_offset.len().saturating_sub(1)
    }

    fn push(&mut self, row: &IndividualRow) {
        self.parents.extend_from_slice(&row.parents);
        self.parents_offset.push(self.parents.len());
    }

    fn row(&self, index: usize) -> Option<IndividualRow> {
        self.ragged().get(index).map(|parents| IndividualRow::new(parents))
    }

    fn column(&self, name: &str) -> Option<ColumnView<'_>> {
        match name {
            "parents" => Some(ColumnView::Ragged(self.ragged())),
            _ => None,
        }
    }
}

impl IndividualColumns {
    fn ragged(&self) -> RaggedColumn<'_> {
        RaggedColumn {
            values: &self.parents,
            offsets: &self.parents_offset,
        }
    }
}

/// Borrowed ragged column: row `i` is `values[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaggedColumn<'a> {
    values: &'a [Id],
    offsets: &'a [usize],
}

impl<'a> RaggedColumn<'a> {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries of row `index`.
    pub fn get(&self, index: usize) -> Option<&'a [Id]> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(&self.values[start..end])
    }

    /// All entries, concatenated.
    pub fn values(&self) -> &'a [Id] {
        self.values
    }

    /// Row boundaries into [`RaggedColumn::values`].
    pub fn offsets(&self) -> &'a [usize] {
        self.offsets
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &'a [Id]> + 'a {
        let values = self.values;
        self.offsets
            .windows(2)
            .map(move |bounds| &values[bounds[0]..bounds[1]])
    }
}

impl TableRow for IndividualRow {
    type Columns = IndividualColumns;
    const FIELDS: &'static [FieldSpec] = IndividualRow::SCHEMA;
    const KIND: TableKind = TableKind::Individuals;

    fn from_fields(fields: &RowMap) -> Result<Self> {
        IndividualRow::from_fields(fields)
    }

    fn to_fields(&self) -> RowMap {
        IndividualRow::to_fields(self)
    }
}

impl Table<IndividualRow> {
    /// Parent lists of every individual.
    pub fn parents(&self) -> RaggedColumn<'_> {
        self.columns().ragged()
    }
}
