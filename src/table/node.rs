//! Node table columns.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableKind};
use crate::types::{FieldSpec, Id, NodeRow, RowMap, NODE_IS_SAMPLE};
use super::{ColumnView, Columns, Table, TableRow};

/// Table of [`NodeRow`]s.
pub type NodeTable = Table<NodeRow>;

/// Column storage for nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeColumns {
    time: Vec<f64>,
    flags: Vec<u32>,
    individual: Vec<Id>,
}

impl Columns for NodeColumns {
    type Row = NodeRow;

    fn len(&self) -> usize {
        self.time.len()
    }

    fn push(&mut self, row: &NodeRow) {
        self.time.push(row.time);
        self.flags.push(row.flags);
        self.individual.push(row.individual);
    }

    fn row(&self, index: usize) -> Option<NodeRow> {
        Some(NodeRow {
            time: *self.time.get(index)?,
            flags: self.flags[index],
            individual: self.individual[index],
        })
    }

    fn column(&self, name: &str) -> Option<ColumnView<'_>> {
        match name {
            "time" => Some(ColumnView::Real(&self.time)),
            "flags" => Some(ColumnView::Bitmask(&self.flags)),
            "individual" => Some(ColumnView::Integer(&self.individual)),
            _ => None,
        }
    }
}

impl TableRow for NodeRow {
    type Columns = NodeColumns;
    const FIELDS: &'static [FieldSpec] = NodeRow::SCHEMA;
    const KIND: TableKind = TableKind::Nodes;

    fn from_fields(fields: &RowMap) -> Result<Self> {
        NodeRow::from_fields(fields)
    }

    fn to_fields(&self) -> RowMap {
        NodeRow::to_fields(self)
    }
}

impl Table<NodeRow> {
    /// Node times.
    pub fn time(&self) -> &[f64] {
        &self.columns().time
    }

    /// Node flag masks.
    pub fn flags(&self) -> &[u32] {
        &self.columns().flags
    }

    /// Individual of each node, or `NULL`.
    pub fn individual(&self) -> &[Id] {
        &self.columns().individual
    }

    /// Ids of nodes with the sample bit set.
    pub fn samples(&self) -> Vec<Id> {
        self.flags()
            .iter()
            .enumerate()
            .filter(|(_, flags)| *flags & NODE_IS_SAMPLE > 0)
            .map(|(id, _)| id as Id)
            .collect()
    }
}
