//! Import from a tree-sequence table collection.
//!
//! A tree sequence stores single-interval edges (`left`, `right`) over one
//! coordinate system; each becomes an interval-edge with identical child
//! and parent intervals. Features the graph tables do not model are
//! rejected outright rather than silently dropped.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TablesError};
use crate::table::{IEdgeTable, IndividualTable, NodeTable};
use crate::tables::{Tables, UNKNOWN_TIME_UNITS};
use crate::types::{pick_fields, Id, IndividualRow, NodeRow, RowMap};

/// Row sets of an external tree-sequence table collection.
///
/// Only `nodes`, `edges` and `individuals` are imported; the remaining row
/// sets exist so that their presence can be detected and refused.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSequenceTables {
    /// Unit of node times.
    pub time_units: String,
    /// Node rows (`time`, `flags`, `individual`, ...).
    pub nodes: Vec<RowMap>,
    /// Edge rows (`left`, `right`, `parent`, `child`).
    pub edges: Vec<RowMap>,
    /// Individual rows (`parents`, ...).
    pub individuals: Vec<RowMap>,
    /// Migration rows. Must be empty.
    pub migrations: Vec<RowMap>,
    /// Mutation rows. Must be empty.
    pub mutations: Vec<RowMap>,
    /// Site rows. Must be empty.
    pub sites: Vec<RowMap>,
    /// Population rows. At most one.
    pub populations: Vec<RowMap>,
}

impl TreeSequenceTables {
    /// Parse a collection from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    fn check_supported(&self) -> Result<()> {
        let unsupported = [
            ("migrations", self.migrations.len(), 0),
            ("mutations", self.mutations.len(), 0),
            ("sites", self.sites.len(), 0),
            ("populations", self.populations.len(), 1),
        ];
        match unsupported.into_iter().find(|(_, count, allowed)| count > allowed) {
            Some((feature, count, _)) => {
                tracing::warn!(feature, count, "rejecting tree sequence import");
                Err(TablesError::UnsupportedFeature { feature, count })
            }
            None => Ok(()),
        }
    }
}

/// Settings for [`Tables::from_tree_sequence`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Chromosome stamped on both sides of every imported edge.
    pub chromosome: Option<Id>,
    /// Added to every imported node time.
    pub timedelta: f64,
    /// Overrides the source's time-unit label.
    pub time_units: Option<String>,
}

impl Tables {
    /// Build tables from a tree-sequence collection.
    ///
    /// Fails with `UnsupportedFeature` if the source has migrations,
    /// mutations, sites, or more than one population. The result is sorted.
    ///
    /// Node times of every edge are compared after import:
    /// `PARENT_OLDER_THAN_CHILD` stays set only if every parent is strictly
    /// older than its child. Otherwise the import still succeeds, with the
    /// flag cleared.
    pub fn from_tree_sequence(source: &TreeSequenceTables, options: &ImportOptions) -> Result<Self> {
        source.check_supported()?;

        let time_units = match (&options.time_units, source.time_units.as_str()) {
            (Some(units), _) => units.clone(),
            (None, "") => UNKNOWN_TIME_UNITS.to_string(),
            (None, units) => units.to_string(),
        };
        let mut tables = Tables::with_time_units(time_units);

        let nodes = source
            .nodes
            .iter()
            .map(|fields| {
                let row = NodeRow::from_fields(&pick_fields(fields.clone(), NodeRow::SCHEMA))?;
                Ok(NodeRow {
                    time: row.time + options.timedelta,
                    ..row
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tables.set_nodes(NodeTable::from_rows(nodes))?;

        let mut iedges = IEdgeTable::new();
        for fields in &source.edges {
            let mut fields = fields.clone();
            if let Some(chromosome) = options.chromosome {
                fields.insert("child_chromosome".to_string(), chromosome.into());
                fields.insert("parent_chromosome".to_string(), chromosome.into());
            }
            iedges.append(fields)?;
        }
        tables.set_iedges(iedges)?;

        let individuals = source
            .individuals
            .iter()
            .map(|fields| IndividualRow::from_fields(&pick_fields(fields.clone(), IndividualRow::SCHEMA)))
            .collect::<Result<Vec<_>>>()?;
        tables.set_individuals(IndividualTable::from_rows(individuals))?;

        tables.sort()?;
        match tables.validate_parent_older_than_child() {
            Ok(()) => {}
            Err(TablesError::Ordering { child, parent, .. }) => {
                tracing::warn!(child, parent, "imported edge parent is not older than its child");
            }
            Err(err) => return Err(err),
        }
        tracing::debug!(
            num_nodes = tables.nodes().len(),
            num_individuals = tables.individuals().len(),
            num_iedges = tables.iedges().len(),
            "imported tree sequence"
        );
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::IEdgeFlags;
    use crate::types::{IEdgeRow, NULL};
    use serde_json::{json, Value};

    fn rows(values: Vec<Value>) -> Vec<RowMap> {
        values
            .into_iter()
            .filter_map(|value| value.as_object().cloned())
            .collect()
    }

    fn two_leaves() -> TreeSequenceTables {
        TreeSequenceTables {
            time_units: "generations".to_string(),
            nodes: rows(vec![
                json!({"time": 0.0, "flags": 1, "population": 0, "individual": -1, "metadata": null}),
                json!({"time": 0.0, "flags": 1, "population": 0, "individual": -1, "metadata": null}),
                json!({"time": 1.5, "flags": 0, "population": 0, "individual": -1, "metadata": null}),
            ]),
            edges: rows(vec![
                json!({"left": 0.0, "right": 100.0, "parent": 2, "child": 1, "metadata": null}),
                json!({"left": 0.0, "right": 100.0, "parent": 2, "child": 0, "metadata": null}),
            ]),
            populations: rows(vec![json!({"metadata": null})]),
            ..Default::default()
        }
    }

    #[test]
    fn test_import_copies_rows() {
        let tables = Tables::from_tree_sequence(&two_leaves(), &ImportOptions::default()).unwrap();
        assert_eq!(tables.time_units(), "generations");
        assert_eq!(tables.samples(), vec![0, 1]);
        assert_eq!(tables.iedges().child(), &[0, 1]);
        assert_eq!(tables.iedges().get(0).unwrap(), IEdgeRow::new(0, 100, 0, 100, 0, 2));
        assert!(tables.iedges().flags().is_valid_gig());
    }

    #[test]
    fn test_import_applies_options() {
        let options = ImportOptions {
            chromosome: Some(3),
            timedelta: 0.5,
            time_units: Some("years".to_string()),
        };
        let tables = Tables::from_tree_sequence(&two_leaves(), &options).unwrap();
        assert_eq!(tables.nodes().time(), &[0.5, 0.5, 2.0]);
        assert_eq!(tables.iedges().child_chromosome(), &[3, 3]);
        assert_eq!(tables.iedges().parent_chromosome(), &[3, 3]);
        assert_eq!(tables.time_units(), "years");
    }

    #[test]
    fn test_import_without_chromosome_leaves_null() {
        let tables = Tables::from_tree_sequence(&two_leaves(), &ImportOptions::default()).unwrap();
        assert_eq!(tables.iedges().child_chromosome(), &[NULL, NULL]);
    }

    #[test]
    fn test_import_individuals() {
        let mut source = two_leaves();
        source.individuals = rows(vec![
            json!({"flags": 0, "location": [], "parents": [-1, -1], "metadata": null}),
            json!({"flags": 0, "location": [], "parents": [0], "metadata": null}),
        ]);
        let tables = Tables::from_tree_sequence(&source, &ImportOptions::default()).unwrap();
        assert_eq!(tables.individuals().len(), 2);
        assert_eq!(tables.individuals().get(1).unwrap().parents, vec![0]);
    }

    #[test]
    fn test_rejects_unsupported_features() {
        let mut source = two_leaves();
        source.sites = rows(vec![json!({"position": 5.0, "ancestral_state": "A"})]);
        assert_eq!(
            Tables::from_tree_sequence(&source, &ImportOptions::default()),
            Err(TablesError::UnsupportedFeature { feature: "sites", count: 1 })
        );

        let mut source = two_leaves();
        source.populations.push(RowMap::new());
        assert!(matches!(
            Tables::from_tree_sequence(&source, &ImportOptions::default()),
            Err(TablesError::UnsupportedFeature { feature: "populations", count: 2 })
        ));

        let mut source = two_leaves();
        source.mutations = rows(vec![json!({"site": 0, "node": 0, "derived_state": "T"})]);
        assert_eq!(
            Tables::from_tree_sequence(&source, &ImportOptions::default()),
            Err(TablesError::UnsupportedFeature { feature: "mutations", count: 1 })
        );
    }

    #[test]
    fn test_import_checks_node_times() {
        let source = TreeSequenceTables::from_json(
            r#"{"nodes": [{"time": 5.0}, {"time": 1.0}],
                "edges": [{"left": 0, "right": 10, "parent": 1, "child": 0}]}"#,
        )
        .unwrap();
        let mut tables = Tables::from_tree_sequence(&source, &ImportOptions::default()).unwrap();
        assert_eq!(tables.iedges().len(), 1);
        assert!(!tables.iedges().flags().contains(IEdgeFlags::PARENT_OLDER_THAN_CHILD));
        assert!(tables.iedges().flags().contains(IEdgeFlags::NONDEGENERATE_INTERVALS));
        assert!(matches!(
            tables.validate_parent_older_than_child(),
            Err(TablesError::Ordering { child: 0, parent: 1, .. })
        ));
    }

    #[test]
    fn test_import_dangling_child_is_an_error() {
        let mut source = two_leaves();
        source.edges = rows(vec![json!({"left": 0, "right": 10, "parent": 2, "child": 9})]);
        assert!(matches!(
            Tables::from_tree_sequence(&source, &ImportOptions::default()),
            Err(TablesError::Reference { id: 9, .. })
        ));
    }

    #[test]
    fn test_rejects_fractional_coordinates() {
        let mut source = two_leaves();
        source.edges = rows(vec![json!({"left": 0.5, "right": 100.0, "parent": 2, "child": 0})]);
        assert!(matches!(
            Tables::from_tree_sequence(&source, &ImportOptions::default()),
            Err(TablesError::NotInteger { .. })
        ));
    }

    #[test]
    fn test_from_json_defaults_missing_sets() {
        let source = TreeSequenceTables::from_json(r#"{"nodes": [{"time": 1.0}]}"#).unwrap();
        assert_eq!(source.nodes.len(), 1);
        assert!(source.migrations.is_empty());
        let tables = Tables::from_tree_sequence(&source, &ImportOptions::default()).unwrap();
        assert_eq!(tables.time_units(), "unknown");
        assert!(tables.iedges().flags().contains(IEdgeFlags::PARENT_OLDER_THAN_CHILD));
    }
}
