//! Property tests for the structural algorithms.

use gig_tables::{IEdgeRow, Id, IndividualRow, NodeRow, NodeTimeValidation, Tables, NULL};
use proptest::prelude::*;
use serde_json::json;

/// Random but referentially valid tables: every link points at an
/// existing row or is `NULL`. Edge time order is not enforced.
fn arb_tables() -> impl Strategy<Value = Tables> {
    (1usize..12, 0usize..6).prop_flat_map(|(num_nodes, num_individuals)| {
        let individual = if num_individuals == 0 {
            Just(NULL).boxed()
        } else {
            prop_oneof![Just(NULL), (0..num_individuals as Id)].boxed()
        };
        let parent_link = individual.clone();
        let node_id = 0..num_nodes as Id;
        (
            prop::collection::vec((0u8..20, any::<bool>(), individual), num_nodes),
            prop::collection::vec(prop::collection::vec(parent_link, 0..3), num_individuals),
            prop::collection::vec((0i64..100, 1i64..50, node_id.clone(), node_id), 0..24),
        )
            .prop_map(|(nodes, individuals, iedges)| {
                let mut tables = Tables::new();
                for parents in individuals {
                    tables.individuals_mut().unwrap().add_row(IndividualRow::new(parents)).unwrap();
                }
                for (time, sample, individual) in nodes {
                    let row = if sample { NodeRow::sample(time.into()) } else { NodeRow::new(time.into()) };
                    tables.nodes_mut().unwrap().add_row(row.with_individual(individual)).unwrap();
                }
                for (left, span, child, parent) in iedges {
                    let row = IEdgeRow::new(left, left + span, left, left + span, child, parent);
                    tables.add_iedge_row(row, NodeTimeValidation::Trust).unwrap();
                }
                tables
            })
    })
}

fn parent_times(tables: &Tables) -> Vec<f64> {
    let times = tables.nodes().time();
    tables.iedges().parent().iter().map(|&parent| times[parent as usize]).collect()
}

proptest! {
    #[test]
    fn sort_is_idempotent(mut tables in arb_tables()) {
        tables.sort().unwrap();
        let once = tables.clone();
        tables.sort().unwrap();
        prop_assert_eq!(tables, once);
    }

    #[test]
    fn sort_orders_parent_times(mut tables in arb_tables()) {
        tables.sort().unwrap();
        let times = parent_times(&tables);
        prop_assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn sort_keeps_each_childs_edges_together(mut tables in arb_tables()) {
        tables.sort().unwrap();
        let times = parent_times(&tables);
        let child = tables.iedges().child();
        let child_left = tables.iedges().child_left();
        for i in 1..child.len() {
            // within one parent-time block, children are grouped and positions ascend
            if times[i] == times[i - 1] {
                prop_assert!(child[i - 1] <= child[i]);
                if child[i - 1] == child[i] {
                    prop_assert!(child_left[i - 1] <= child_left[i]);
                }
            }
        }
    }

    #[test]
    fn sort_is_a_permutation(tables in arb_tables()) {
        let mut sorted = tables.clone();
        sorted.sort().unwrap();
        let mut before: Vec<_> = tables.iedges().iter().map(|row| format!("{row:?}")).collect();
        let mut after: Vec<_> = sorted.iedges().iter().map(|row| format!("{row:?}")).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
        prop_assert_eq!(tables.iedges().flags(), sorted.iedges().flags());
    }

    #[test]
    fn decapitation_contains_survivors(mut tables in arb_tables(), cutoff in 0u8..21) {
        let cutoff = f64::from(cutoff);
        tables.decapitate(cutoff).unwrap();

        prop_assert!(tables.nodes().time().iter().all(|&time| time < cutoff));
        let num_nodes = tables.nodes().len() as Id;
        let num_individuals = tables.individuals().len() as Id;
        for (&child, &parent) in tables.iedges().child().iter().zip(tables.iedges().parent()) {
            prop_assert!((0..num_nodes).contains(&child));
            prop_assert!((0..num_nodes).contains(&parent));
        }
        for &parent in tables.individuals().parents().values() {
            prop_assert!(parent == NULL || (0..num_individuals).contains(&parent));
        }
        for &individual in tables.nodes().individual() {
            prop_assert!(individual == NULL || (0..num_individuals).contains(&individual));
        }
        prop_assert!(tables.check_references().is_ok());
    }

    #[test]
    fn decapitation_above_all_times_keeps_every_node(tables in arb_tables()) {
        let mut sorted = tables.clone();
        sorted.sort().unwrap();
        let mut decapitated = tables.clone();
        decapitated.decapitate(f64::INFINITY).unwrap();
        prop_assert_eq!(decapitated.nodes().time(), sorted.nodes().time());
        prop_assert_eq!(decapitated.iedges(), sorted.iedges());
    }

    #[test]
    fn time_shift_round_trips(mut tables in arb_tables(), delta in -64i32..64) {
        let delta = f64::from(delta) / 4.0;
        let before = tables.clone();
        tables.change_times(delta).unwrap();
        tables.change_times(-delta).unwrap();
        prop_assert_eq!(tables.nodes().time(), before.nodes().time());
        prop_assert_eq!(tables.nodes().individual(), before.nodes().individual());
        prop_assert_eq!(tables.nodes().flags(), before.nodes().flags());
        prop_assert_eq!(tables.iedges().flags(), before.iedges().flags());
    }

    #[test]
    fn append_round_trips(time in 0.0f64..1e6, flags in any::<u32>(), individual in -1i64..100) {
        let row = NodeRow { time, flags, individual };
        let mut tables = Tables::new();
        let id = tables.nodes_mut().unwrap().append(row).unwrap();
        prop_assert_eq!(tables.nodes().row(id).unwrap(), row);
    }

    #[test]
    fn int_rows_accept_integral_floats(left in 0i64..1000, span in 1i64..1000) {
        let mut tables = Tables::new();
        let fields = json!({
            "child_left": left as f64, "child_right": (left + span) as f64,
            "parent_left": left, "parent_right": left + span,
            "child": 0.0, "parent": 1,
        });
        let id = tables
            .add_iedge_fields(fields.as_object().unwrap(), NodeTimeValidation::Unspecified)
            .unwrap();
        prop_assert_eq!(
            tables.iedges().row(id).unwrap(),
            IEdgeRow::new(left, left + span, left, left + span, 0, 1)
        );
    }
}
