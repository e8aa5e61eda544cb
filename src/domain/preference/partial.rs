//! Partial Preference Calculator - applies each criterion's transfer function
//! to the deviation cube, optionally with reinforced preference.

use serde::Serialize;
use tracing::debug;

use super::{normalize_directions, CriteriaSet, DeviationMatrix};
use crate::domain::foundation::{CriterionCube, DomainError, DomainResult, PerformanceTable};

/// Per-criterion preference degrees for every ordered (row, column) pair.
///
/// When reinforcement is enabled, a degree equal to the criterion's
/// reinforcement factor marks a reinforced pair and the matching flag is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialPreferences {
    values: CriterionCube,
    reinforced: Option<CriterionCube>,
}

impl PartialPreferences {
    pub fn values(&self) -> &CriterionCube {
        &self.values
    }

    pub fn at(&self, criterion: usize, row: usize, column: usize) -> f64 {
        self.values.at(criterion, row, column)
    }

    pub fn get(&self, criterion: &str, row: &str, column: &str) -> Option<f64> {
        self.values.get(criterion, row, column)
    }

    /// Whether the pair was reinforced on the criterion.
    pub fn is_reinforced(&self, criterion: usize, row: usize, column: usize) -> bool {
        self.reinforced
            .as_ref()
            .map(|flags| flags.at(criterion, row, column) > 0.0)
            .unwrap_or(false)
    }

    /// Whether reinforcement was evaluated at all.
    pub fn has_reinforcement(&self) -> bool {
        self.reinforced.is_some()
    }
}

/// Pair of partial preference cubes for alternatives compared with profiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePartialPreferences {
    pub alternatives_vs_profiles: PartialPreferences,
    pub profiles_vs_alternatives: PartialPreferences,
}

/// Computes partial preference indices.
pub struct PartialPreferenceCalculator;

impl PartialPreferenceCalculator {
    /// Applies the transfer functions (and reinforcement when requested)
    /// to an existing deviation cube.
    ///
    /// The cube's criteria must be the criteria set, in the same order.
    pub fn from_deviations(
        criteria: &CriteriaSet,
        deviations: &DeviationMatrix,
        use_reinforcement: bool,
    ) -> DomainResult<PartialPreferences> {
        let cube = deviations.cube();
        if cube.criteria().labels() != criteria.ids() {
            return Err(DomainError::validation(
                "deviations",
                "Deviation criteria do not match the criteria set",
            ));
        }

        let values = cube.map(|d, k, _, _| {
            let criterion = criteria.at(k);
            match criterion.reinforcement {
                Some(r) if use_reinforcement && d > r.threshold => r.factor,
                _ => criterion.function.evaluate(d),
            }
        });

        let reinforced = use_reinforcement.then(|| {
            cube.map(|d, k, _, _| match criteria.at(k).reinforcement {
                Some(r) if d > r.threshold => 1.0,
                _ => 0.0,
            })
        });

        Ok(PartialPreferences { values, reinforced })
    }

    /// Alternatives compared with each other.
    pub fn alternatives(
        criteria: &CriteriaSet,
        alternatives: &PerformanceTable,
        use_reinforcement: bool,
    ) -> DomainResult<PartialPreferences> {
        let normalized = normalize_directions(alternatives, criteria)?;
        let deviations = DeviationMatrix::within(&normalized);
        debug!(
            alternatives = normalized.row_count(),
            use_reinforcement, "Computing partial preferences"
        );
        Self::from_deviations(criteria, &deviations, use_reinforcement)
    }

    /// Alternatives against profiles and profiles against alternatives.
    pub fn with_profiles(
        criteria: &CriteriaSet,
        alternatives: &PerformanceTable,
        profiles: &PerformanceTable,
        use_reinforcement: bool,
    ) -> DomainResult<ProfilePartialPreferences> {
        let alternatives = normalize_directions(alternatives, criteria)?;
        let profiles = normalize_directions(profiles, criteria)?;
        debug!(
            alternatives = alternatives.row_count(),
            profiles = profiles.row_count(),
            "Computing partial preferences against profiles"
        );
        let forward = DeviationMatrix::between(&alternatives, &profiles)?;
        let backward = DeviationMatrix::between(&profiles, &alternatives)?;
        Ok(ProfilePartialPreferences {
            alternatives_vs_profiles: Self::from_deviations(criteria, &forward, use_reinforcement)?,
            profiles_vs_alternatives: Self::from_deviations(criteria, &backward, use_reinforcement)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::preference::{Criterion, Direction, PreferenceFunction};

    fn criteria(reinforced: bool) -> CriteriaSet {
        let mut g1 = Criterion::new("g1", Direction::Max, PreferenceFunction::v_shape(4.0).unwrap(), 1.0).unwrap();
        if reinforced {
            g1 = g1.with_reinforcement(6.0, 1.5).unwrap();
        }
        let g2 = Criterion::new("g2", Direction::Min, PreferenceFunction::usual(), 1.0).unwrap();
        CriteriaSet::new(vec![g1, g2]).unwrap()
    }

    fn table() -> PerformanceTable {
        PerformanceTable::from_rows(
            vec!["g1", "g2"],
            vec![("a", vec![10.0, 5.0]), ("b", vec![8.0, 3.0]), ("c", vec![1.0, 9.0])],
        )
        .unwrap()
    }

    #[test]
    fn applies_transfer_function_per_criterion() {
        let pp = PartialPreferenceCalculator::alternatives(&criteria(false), &table(), false).unwrap();
        assert_eq!(pp.get("g1", "a", "b"), Some(0.5));
        assert_eq!(pp.get("g1", "b", "a"), Some(0.0));
        assert_eq!(pp.get("g1", "a", "c"), Some(1.0));
        // g2 is minimised: b (3) beats a (5)
        assert_eq!(pp.get("g2", "b", "a"), Some(1.0));
        assert_eq!(pp.get("g2", "a", "b"), Some(0.0));
        assert!(!pp.has_reinforcement());
    }

    #[test]
    fn reinforcement_replaces_degree_beyond_threshold() {
        let pp = PartialPreferenceCalculator::alternatives(&criteria(true), &table(), true).unwrap();
        // a - c = 9 > 6
        assert_eq!(pp.get("g1", "a", "c"), Some(1.5));
        let a = 0;
        let c = 2;
        assert!(pp.is_reinforced(0, a, c));
        assert!(!pp.is_reinforced(0, c, a));
        // a - b = 2, not reinforced
        assert_eq!(pp.get("g1", "a", "b"), Some(0.5));
        assert!(!pp.is_reinforced(0, 0, 1));
    }

    #[test]
    fn reinforcement_ignored_when_disabled() {
        let pp = PartialPreferenceCalculator::alternatives(&criteria(true), &table(), false).unwrap();
        assert_eq!(pp.get("g1", "a", "c"), Some(1.0));
        assert!(!pp.is_reinforced(0, 0, 2));
    }

    #[test]
    fn with_profiles_returns_both_directions() {
        let profiles = PerformanceTable::from_rows(vec!["g1", "g2"], vec![("r1", vec![6.0, 4.0])]).unwrap();
        let pair = PartialPreferenceCalculator::with_profiles(&criteria(false), &table(), &profiles, false).unwrap();
        assert_eq!(pair.alternatives_vs_profiles.get("g1", "a", "r1"), Some(1.0));
        assert_eq!(pair.profiles_vs_alternatives.get("g1", "r1", "c"), Some(1.0));
        assert_eq!(pair.profiles_vs_alternatives.get("g2", "r1", "a"), Some(1.0));
        assert_eq!(pair.alternatives_vs_profiles.get("g2", "a", "r1"), Some(0.0));
    }
}
