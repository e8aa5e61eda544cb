//! Property-based tests for transfer functions, aggregated preferences and
//! outranking flows.

use proptest::prelude::*;
use promethee_sort::domain::flows::FlowCalculator;
use promethee_sort::domain::foundation::PerformanceTable;
use promethee_sort::domain::preference::{
    CriteriaSet, Criterion, Direction, FunctionKind, PreferenceFunction, Promethee, Thresholds,
};

fn function_strategy() -> impl Strategy<Value = PreferenceFunction> {
    (0usize..6, 0.0..10.0f64, 0.0..10.0f64, 0.1..10.0f64).prop_map(|(kind, q, spread, s)| {
        let thresholds = Thresholds {
            q: Some(q),
            p: Some(q + spread),
            s: Some(s),
        };
        PreferenceFunction::build(FunctionKind::ALL[kind], &thresholds, "g").unwrap()
    })
}

fn table_strategy(criteria: usize) -> impl Strategy<Value = PerformanceTable> {
    prop::collection::vec(prop::collection::vec(-50.0..50.0f64, criteria), 2..7).prop_map(move |rows| {
        let ids: Vec<String> = (1..=criteria).map(|k| format!("g{}", k)).collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, values)| (format!("a{}", i), values))
            .collect();
        PerformanceTable::from_rows(ids, rows).unwrap()
    })
}

fn criteria(reinforced: bool) -> CriteriaSet {
    let directions = [Direction::Max, Direction::Min, Direction::Max];
    CriteriaSet::new(
        directions
            .iter()
            .enumerate()
            .map(|(k, &direction)| {
                let criterion = Criterion::new(
                    format!("g{}", k + 1),
                    direction,
                    PreferenceFunction::v_shape_indifference(2.0, 10.0).unwrap(),
                    (k + 1) as f64,
                )
                .unwrap();
                if reinforced {
                    criterion.with_reinforcement(30.0, 1.5 + k as f64).unwrap()
                } else {
                    criterion
                }
            })
            .collect(),
    )
    .unwrap()
}

// =============================================================================
// Transfer Function Properties
// =============================================================================

proptest! {
    /// P is non-decreasing in the deviation
    #[test]
    fn prop_transfer_function_monotone(f in function_strategy(), a in -20.0..20.0f64, b in -20.0..20.0f64) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(f.evaluate(low) <= f.evaluate(high), "{:?} not monotone", f);
    }

    /// P stays in [0, 1] and vanishes for non-positive deviations
    #[test]
    fn prop_transfer_function_bounded(f in function_strategy(), d in -20.0..20.0f64) {
        let value = f.evaluate(d);
        prop_assert!((0.0..=1.0).contains(&value));
        if d <= 0.0 {
            prop_assert_eq!(value, 0.0);
        }
    }
}

// =============================================================================
// Aggregation Properties
// =============================================================================

proptest! {
    /// Without reinforcement every aggregated degree lies in [0, 1]
    #[test]
    fn prop_aggregated_preference_bounded(table in table_strategy(3)) {
        let pi = Promethee::new(criteria(false)).preferences(&table).unwrap();
        for i in 0..table.row_count() {
            for value in pi.row_values(i) {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    /// With reinforcement the degree never exceeds the largest factor
    #[test]
    fn prop_reinforced_preference_bounded_by_factor(table in table_strategy(3)) {
        let promethee = Promethee::builder(criteria(true)).reinforcement(true).build().unwrap();
        let pi = promethee.preferences(&table).unwrap();
        let max_factor = promethee
            .criteria()
            .iter()
            .filter_map(|c| c.reinforcement.map(|r| r.factor))
            .fold(1.0, f64::max);
        prop_assert!(pi.max_value().unwrap_or(0.0) <= max_factor);
    }

    /// Recomputing on the same input gives bit-identical output
    #[test]
    fn prop_preferences_deterministic(table in table_strategy(3)) {
        let promethee = Promethee::new(criteria(false));
        prop_assert_eq!(promethee.preferences(&table).unwrap(), promethee.preferences(&table).unwrap());
    }
}

// =============================================================================
// Flow Properties
// =============================================================================

proptest! {
    /// Net flows over a full matrix sum to zero
    #[test]
    fn prop_net_flows_sum_to_zero(table in table_strategy(3)) {
        let pi = Promethee::new(criteria(false)).preferences(&table).unwrap();
        let flows = FlowCalculator::flows(&pi).unwrap();
        let total: f64 = flows.iter().map(|(_, f)| f.net).sum();
        prop_assert!(total.abs() < 1e-9);
    }

    /// Ranks start at 1 and never decrease along the ranking
    #[test]
    fn prop_complete_ranking_ordered(table in table_strategy(3)) {
        let pi = Promethee::new(criteria(false)).preferences(&table).unwrap();
        let ranking = FlowCalculator::complete_ranking(&FlowCalculator::flows(&pi).unwrap());
        prop_assert_eq!(ranking[0].rank, 1);
        prop_assert!(ranking.windows(2).all(|w| w[0].rank <= w[1].rank && w[0].net_flow >= w[1].net_flow));
    }
}
