//! The table collection of a genetic inheritance graph.
//!
//! [`Tables`] owns one node table, one individual table and one
//! interval-edge table, plus a time-unit label. Structural algorithms
//! (sorting, decapitation, time shifts) build complete replacement tables
//! and only then swap them in, so a failure never leaves a mix of old and
//! new state.
//!
//! ## Canonical order
//!
//! After [`Tables::sort`], interval-edges are ordered by parent node time
//! (oldest first), then child id, then child-side left coordinate. Every
//! child's edges therefore form one contiguous run ordered by position,
//! and parent times never increase along the table.

use serde::Serialize;
use std::fmt;

use crate::canonical::canonical_hash_hex;
use crate::display::PrintOptions;
use crate::error::{Result, TableKind, TablesError};
use crate::graph::FromTables;
use crate::table::{IEdgeTable, IndividualTable, Mutability, NodeTable};
use crate::types::{Id, IEdgeRow, IndividualRow, NodeRow, RowMap, NULL};

/// Default label for `time_units`.
pub const UNKNOWN_TIME_UNITS: &str = "unknown";

/// How [`Tables::add_iedge_row`] treats the node times of a new edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeTimeValidation {
    /// Require the parent node to be strictly older than the child node.
    Check,
    /// Skip the check; the caller vouches for the time order.
    Trust,
    /// Skip the check and clear `PARENT_OLDER_THAN_CHILD`.
    #[default]
    Unspecified,
}

/// Nodes, individuals and interval-edges of one graph.
#[derive(Debug, Clone)]
pub struct Tables {
    nodes: NodeTable,
    individuals: IndividualTable,
    iedges: IEdgeTable,
    time_units: String,
    mutability: Mutability,
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

impl Tables {
    /// Empty tables with `time_units` set to `"unknown"`.
    pub fn new() -> Self {
        Self::with_time_units(UNKNOWN_TIME_UNITS)
    }

    /// Empty tables with the given time-unit label.
    pub fn with_time_units(time_units: impl Into<String>) -> Self {
        Self {
            nodes: NodeTable::new(),
            individuals: IndividualTable::new(),
            iedges: IEdgeTable::new(),
            time_units: time_units.into(),
            mutability: Mutability::Building,
        }
    }

    /// The node table.
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// The individual table.
    pub fn individuals(&self) -> &IndividualTable {
        &self.individuals
    }

    /// The interval-edge table.
    pub fn iedges(&self) -> &IEdgeTable {
        &self.iedges
    }

    /// Unit of node times.
    pub fn time_units(&self) -> &str {
        &self.time_units
    }

    /// Whether `freeze()` has been called.
    pub fn is_frozen(&self) -> bool {
        self.mutability == Mutability::Published
    }

    fn ensure_mutable(&self) -> Result<()> {
        match self.mutability {
            Mutability::Building => Ok(()),
            Mutability::Published => Err(TablesError::Frozen { target: "tables" }),
        }
    }

    /// Mutable access to the node table.
    pub fn nodes_mut(&mut self) -> Result<&mut NodeTable> {
        self.ensure_mutable()?;
        Ok(&mut self.nodes)
    }

    /// Mutable access to the individual table.
    pub fn individuals_mut(&mut self) -> Result<&mut IndividualTable> {
        self.ensure_mutable()?;
        Ok(&mut self.individuals)
    }

    /// Mutable access to the interval-edge table.
    pub fn iedges_mut(&mut self) -> Result<&mut IEdgeTable> {
        self.ensure_mutable()?;
        Ok(&mut self.iedges)
    }

    /// Replace the node table.
    pub fn set_nodes(&mut self, nodes: NodeTable) -> Result<()> {
        self.ensure_mutable()?;
        self.nodes = nodes;
        Ok(())
    }

    /// Replace the individual table.
    pub fn set_individuals(&mut self, individuals: IndividualTable) -> Result<()> {
        self.ensure_mutable()?;
        self.individuals = individuals;
        Ok(())
    }

    /// Replace the interval-edge table.
    pub fn set_iedges(&mut self, iedges: IEdgeTable) -> Result<()> {
        self.ensure_mutable()?;
        self.iedges = iedges;
        Ok(())
    }

    /// Replace the time-unit label.
    pub fn set_time_units(&mut self, time_units: impl Into<String>) -> Result<()> {
        self.ensure_mutable()?;
        self.time_units = time_units.into();
        Ok(())
    }

    /// Make every table, and the choice of tables, permanently read-only.
    pub fn freeze(&mut self) {
        self.nodes.freeze();
        self.individuals.freeze();
        self.iedges.freeze();
        self.mutability = Mutability::Published;
    }

    /// An unfrozen, independent copy.
    pub fn copy(&self) -> Self {
        Self {
            nodes: self.nodes.copy(),
            individuals: self.individuals.copy(),
            iedges: self.iedges.copy(),
            time_units: self.time_units.clone(),
            mutability: Mutability::Building,
        }
    }

    /// Delete all rows of every table.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.nodes.ensure_mutable()?;
        self.individuals.ensure_mutable()?;
        self.iedges.ensure_mutable()?;
        self.nodes.clear()?;
        self.individuals.clear()?;
        self.iedges.clear()
    }

    fn node_time(&self, id: Id) -> Result<f64> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.nodes.time().get(index).copied())
            .ok_or(TablesError::Reference {
                table: TableKind::Nodes,
                id,
                num_rows: self.nodes.len(),
            })
    }

    fn check_node_times(&self, child: Id, parent: Id) -> Result<()> {
        let child_time = self.node_time(child)?;
        let parent_time = self.node_time(parent)?;
        if child_time < parent_time {
            Ok(())
        } else {
            Err(TablesError::Ordering {
                child,
                parent,
                child_time,
                parent_time,
            })
        }
    }

    /// Insert one interval-edge.
    ///
    /// With [`NodeTimeValidation::Check`] the referenced nodes must exist
    /// and the parent must be strictly older than the child. With
    /// [`NodeTimeValidation::Unspecified`] nothing is checked and the
    /// `PARENT_OLDER_THAN_CHILD` guarantee is cleared.
    pub fn add_iedge_row(&mut self, row: IEdgeRow, validation: NodeTimeValidation) -> Result<Id> {
        self.ensure_mutable()?;
        match validation {
            NodeTimeValidation::Check => {
                self.check_node_times(row.child, row.parent)?;
                self.iedges.add_row_with_checked_times(row)
            }
            NodeTimeValidation::Trust => self.iedges.add_row_with_checked_times(row),
            NodeTimeValidation::Unspecified => self.iedges.add_row(row),
        }
    }

    /// Insert one interval-edge from loosely-typed fields, coercing
    /// integral values as [`IEdgeTable::add_int_row`] does.
    pub fn add_iedge_fields(&mut self, fields: &RowMap, validation: NodeTimeValidation) -> Result<Id> {
        self.ensure_mutable()?;
        let row = IEdgeTable::coerce_int_row(fields)?;
        self.add_iedge_row(row, validation)
    }

    /// Check that every node, individual and edge reference points at an
    /// existing row (or is `NULL` where that is allowed).
    pub fn check_references(&self) -> Result<()> {
        let num_individuals = self.individuals.len();
        let individual_ok = |id: Id| id == NULL || (0..num_individuals as Id).contains(&id);
        let reference = |table, id, num_rows| TablesError::Reference { table, id, num_rows };

        if let Some(&id) = self.nodes.individual().iter().find(|id| !individual_ok(**id)) {
            return Err(reference(TableKind::Individuals, id, num_individuals));
        }
        if let Some(&id) = self.individuals.parents().values().iter().find(|id| !individual_ok(**id)) {
            return Err(reference(TableKind::Individuals, id, num_individuals));
        }
        for &id in self.iedges.child().iter().chain(self.iedges.parent()) {
            self.node_time(id)?;
        }
        Ok(())
    }

    /// Check every edge's node times and, if all parents are strictly
    /// older than their children, set `PARENT_OLDER_THAN_CHILD` again.
    pub fn validate_parent_older_than_child(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        for (&child, &parent) in self.iedges.child().iter().zip(self.iedges.parent()) {
            self.check_node_times(child, parent)?;
        }
        self.iedges.mark_parent_older_than_child()
    }

    /// Run every re-validation routine. On success the edge table's flags
    /// are back to `VALID_GIG`.
    pub fn validate(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.check_references()?;
        self.iedges.validate_intervals()?;
        self.validate_parent_older_than_child()
    }

    /// Put the interval-edges in canonical order.
    ///
    /// Stable: edges that tie on every key keep their relative order.
    /// Fails with `Frozen` if the edge table is frozen.
    pub fn sort(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.iedges.ensure_mutable()?;
        if self.iedges.is_empty() {
            return Ok(());
        }
        let parent_time = self
            .iedges
            .parent()
            .iter()
            .map(|&parent| self.node_time(parent))
            .collect::<Result<Vec<_>>>()?;
        let child = self.iedges.child();
        let child_left = self.iedges.child_left();

        let mut order: Vec<usize> = (0..self.iedges.len()).collect();
        order.sort_by(|&a, &b| {
            parent_time[b]
                .total_cmp(&parent_time[a])
                .then_with(|| child[a].cmp(&child[b]))
                .then_with(|| child_left[a].cmp(&child_left[b]))
        });

        let sorted = IEdgeTable::from_rows_with_flags(
            order.iter().filter_map(|&index| self.iedges.get(index)),
            self.iedges.flags(),
        );
        self.iedges = sorted;
        tracing::debug!(num_iedges = self.iedges.len(), "sorted iedges");
        Ok(())
    }

    /// Remove every node at or above `time`, along with the individuals
    /// only those nodes belonged to and the edges touching them.
    ///
    /// Surviving nodes and individuals are renumbered densely, keeping
    /// their relative order. Parent links to removed individuals become
    /// `NULL`. The result is sorted. Fails with `Frozen` if any table is
    /// frozen.
    pub fn decapitate(&mut self, time: f64) -> Result<()> {
        self.ensure_mutable()?;
        self.nodes.ensure_mutable()?;
        self.individuals.ensure_mutable()?;
        self.iedges.ensure_mutable()?;
        self.check_references()?;

        let num_individuals = self.individuals.len();
        let mut keep_individual = vec![false; num_individuals];
        for node in self.nodes.iter().filter(|node| node.time < time) {
            if node.individual != NULL {
                keep_individual[node.individual as usize] = true;
            }
        }
        let individual_map = dense_map(&keep_individual);
        let node_map = dense_map(&self.nodes.time().iter().map(|&t| t < time).collect::<Vec<_>>());
        let remap = |map: &[Id], id: Id| if id == NULL { NULL } else { map[id as usize] };

        let individuals = IndividualTable::from_rows(
            self.individuals
                .iter()
                .zip(&keep_individual)
                .filter(|(_, keep)| **keep)
                .map(|(individual, _)| {
                    IndividualRow::new(
                        individual
                            .parents
                            .iter()
                            .map(|&parent| remap(&individual_map, parent))
                            .collect::<Vec<_>>(),
                    )
                }),
        );
        let nodes = NodeTable::from_rows(
            self.nodes
                .iter()
                .zip(&node_map)
                .filter(|(_, new_id)| **new_id != NULL)
                .map(|(node, _)| NodeRow {
                    individual: remap(&individual_map, node.individual),
                    ..node
                }),
        );
        let iedges = IEdgeTable::from_rows_with_flags(
            self.iedges.iter().filter_map(|iedge| {
                let child = node_map[iedge.child as usize];
                let parent = node_map[iedge.parent as usize];
                (child != NULL && parent != NULL).then_some(IEdgeRow { child, parent, ..iedge })
            }),
            self.iedges.flags(),
        );

        let mut decapitated = Self {
            nodes,
            individuals,
            iedges,
            time_units: self.time_units.clone(),
            mutability: Mutability::Building,
        };
        decapitated.sort()?;
        tracing::debug!(
            time,
            removed_nodes = self.nodes.len() - decapitated.nodes.len(),
            removed_individuals = num_individuals - decapitated.individuals.len(),
            removed_iedges = self.iedges.len() - decapitated.iedges.len(),
            "decapitated tables"
        );
        self.nodes = decapitated.nodes;
        self.individuals = decapitated.individuals;
        self.iedges = decapitated.iedges;
        Ok(())
    }

    /// Add `delta` to every node time. Flags and individual links are
    /// unchanged. Fails with `Frozen` if the node table is frozen.
    pub fn change_times(&mut self, delta: f64) -> Result<()> {
        self.ensure_mutable()?;
        self.nodes.ensure_mutable()?;
        self.nodes = NodeTable::from_rows(self.nodes.iter().map(|node| NodeRow {
            time: node.time + delta,
            ..node
        }));
        tracing::debug!(delta, num_nodes = self.nodes.len(), "shifted node times");
        Ok(())
    }

    /// Ids of all sample nodes.
    pub fn samples(&self) -> Vec<Id> {
        self.nodes.samples()
    }

    /// Hand the tables to a downstream graph constructor.
    pub fn graph<G: FromTables>(&self) -> std::result::Result<G, G::Error> {
        G::from_tables(self)
    }

    /// Deterministic hash of every row and the time-unit label.
    ///
    /// Equal tables have equal fingerprints, frozen or not.
    pub fn fingerprint(&self) -> Result<String> {
        canonical_hash_hex(&TablesContent {
            time_units: &self.time_units,
            nodes: self.nodes.iter().collect(),
            individuals: self.individuals.iter().collect(),
            iedges: self.iedges.iter().collect(),
        })
    }

    /// Render every table, bounded by `options`.
    pub fn render(&self, options: &PrintOptions) -> String {
        [
            format!("== NODES ==\n{}", self.nodes.render(options)),
            format!("== INDIVIDUALS ==\n{}", self.individuals.render(options)),
            format!("== I-EDGES ==\n{}", self.iedges.render(options)),
        ]
        .join("\n\n")
    }
}

/// New ids for the kept positions of `keep`, `NULL` for the rest.
fn dense_map(keep: &[bool]) -> Vec<Id> {
    let mut next: Id = 0;
    keep.iter()
        .map(|&kept| {
            if kept {
                next += 1;
                next - 1
            } else {
                NULL
            }
        })
        .collect()
}

#[derive(Serialize)]
struct TablesContent<'a> {
    time_units: &'a str,
    nodes: Vec<NodeRow>,
    individuals: Vec<IndividualRow>,
    iedges: Vec<IEdgeRow>,
}

impl PartialEq for Tables {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
            && self.individuals == other.individuals
            && self.iedges == other.iedges
            && self.time_units == other.time_units
    }
}

impl fmt::Display for Tables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&PrintOptions::default()))
    }
}
