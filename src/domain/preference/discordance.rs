//! Discordance and veto: how strongly some criterion argues against an
//! otherwise supported preference, and the element-wise attenuation of `Π`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CriteriaSet, DeviationMatrix, PartialPreferences};
use crate::domain::foundation::{
    CriterionCube, DecimalPlace, DomainError, DomainResult, PreferenceMatrix,
};

/// How partial vetoes are aggregated into one veto degree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoAggregation {
    /// Same sharpness formula as discordance, with `τ ∈ [1, n]`.
    Sharpness { tau: f64 },
    /// `Σ w_k·v_k / Σ w_k`.
    Weighted,
}

impl VetoAggregation {
    /// Sharpness parameter, when the mode has one.
    pub fn tau(&self) -> Option<f64> {
        match *self {
            VetoAggregation::Sharpness { tau } => Some(tau),
            VetoAggregation::Weighted => None,
        }
    }
}

/// Computes discordance and veto matrices and combines them with `Π`.
///
/// Every method takes the *reverse* comparison: the value for the pair
/// `(a, b)` is read from the `(b, a)` cell. For alternatives compared among
/// themselves the forward cube is its own reverse.
pub struct DiscordanceCalculator;

impl DiscordanceCalculator {
    /// Partial discordance `d_k(a,b) = pp_k(b,a)`, clamped to `[0, 1]`.
    ///
    /// The returned cube has the reverse cube's columns as rows.
    pub fn partial(reverse: &PartialPreferences) -> CriterionCube {
        let cube = reverse.values();
        CriterionCube::from_fn(cube.criteria(), cube.columns(), cube.rows(), |k, i, j| {
            cube.at(k, j, i).clamp(0.0, 1.0)
        })
    }

    /// Aggregated discordance `D(a,b) = 1 − Π_k (1 − d_k(a,b))^(τ/n)`.
    ///
    /// # Edge Cases
    /// - `τ` outside `[1, n]`: `TauOutOfRange`
    /// - `τ = n`: plain product of the complements
    pub fn discordance(
        reverse: &PartialPreferences,
        tau: f64,
        decimal_place: DecimalPlace,
    ) -> DomainResult<PreferenceMatrix> {
        let partial = Self::partial(reverse);
        let n = partial.criteria().len();
        check_tau(tau, n)?;
        let exponent = tau / n as f64;

        let matrix = PreferenceMatrix::from_fn(partial.rows(), partial.columns(), |i, j| {
            let product: f64 = (0..n)
                .map(|k| (1.0 - partial.at(k, i, j)).powf(exponent))
                .product();
            decimal_place.round(1.0 - product)
        });
        debug!(tau, criteria = n, "Computed discordance");
        Ok(matrix)
    }

    /// Veto degree from reverse deviations: `v_k(a,b) = 1` when
    /// `dev_k(b,a) ≥ veto_k`, for criteria that declare a veto threshold.
    pub fn veto(
        criteria: &CriteriaSet,
        reverse: &DeviationMatrix,
        aggregation: VetoAggregation,
        decimal_place: DecimalPlace,
    ) -> DomainResult<PreferenceMatrix> {
        let cube = reverse.cube();
        if cube.criteria().labels() != criteria.ids() {
            return Err(DomainError::validation(
                "deviations",
                "Deviation criteria do not match the criteria set",
            ));
        }
        let n = criteria.len();
        if let Some(tau) = aggregation.tau() {
            check_tau(tau, n)?;
        }
        let total_weight = criteria.total_weight();

        let vetoes = |i: usize, j: usize| {
            criteria.iter().enumerate().map(move |(k, c)| -> f64 {
                match c.veto_threshold {
                    Some(v) if cube.at(k, j, i) >= v => 1.0,
                    _ => 0.0,
                }
            })
        };

        let matrix = PreferenceMatrix::from_fn(cube.columns(), cube.rows(), |i, j| {
            let value = match aggregation {
                VetoAggregation::Sharpness { tau } => {
                    let exponent = tau / n as f64;
                    1.0 - vetoes(i, j)
                        .map(|v| (1.0 - v).powf(exponent))
                        .product::<f64>()
                }
                VetoAggregation::Weighted => {
                    vetoes(i, j)
                        .zip(criteria.iter())
                        .map(|(v, c)| v * c.weight)
                        .sum::<f64>()
                        / total_weight
                }
            };
            decimal_place.round(value)
        });
        debug!(?aggregation, "Computed veto");
        Ok(matrix)
    }

    /// `Π'(a,b) = Π(a,b)·(1 − D(a,b))`, matched by label.
    pub fn combine(
        preferences: &PreferenceMatrix,
        discordance: &PreferenceMatrix,
        decimal_place: DecimalPlace,
    ) -> DomainResult<PreferenceMatrix> {
        let rows = preferences
            .rows()
            .iter()
            .map(|label| discordance.rows().require("row", label))
            .collect::<DomainResult<Vec<_>>>()?;
        let columns = preferences
            .columns()
            .iter()
            .map(|label| discordance.columns().require("column", label))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(preferences.map(|pi, i, j| {
            let d = discordance.at(rows[i], columns[j]).unwrap_or(0.0);
            decimal_place.round(pi * (1.0 - d))
        }))
    }
}

fn check_tau(tau: f64, criteria: usize) -> DomainResult<()> {
    if !tau.is_finite() || tau < 1.0 || tau > criteria as f64 {
        return Err(DomainError::tau_out_of_range(tau, criteria));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, PerformanceTable};
    use crate::domain::preference::{
        normalize_directions, Criterion, Direction, PartialPreferenceCalculator,
        PreferenceFunction,
    };

    fn table() -> PerformanceTable {
        PerformanceTable::from_rows(
            vec!["g1", "g2"],
            vec![("a", vec![3.0, 1.0]), ("b", vec![1.0, 4.0])],
        )
        .unwrap()
    }

    fn v_shape_criteria() -> CriteriaSet {
        CriteriaSet::new(vec![
            Criterion::new("g1", Direction::Max, PreferenceFunction::v_shape(4.0).unwrap(), 3.0).unwrap(),
            Criterion::new("g2", Direction::Max, PreferenceFunction::v_shape(6.0).unwrap(), 1.0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn partial_discordance_reads_reverse_pair() {
        let pp = PartialPreferenceCalculator::alternatives(&v_shape_criteria(), &table(), false).unwrap();
        let d = DiscordanceCalculator::partial(&pp);
        assert_eq!(d.get("g2", "a", "b"), Some(0.5));
        assert_eq!(d.get("g1", "a", "b"), Some(0.0));
        assert_eq!(d.get("g1", "b", "a"), Some(0.5));
    }

    #[test]
    fn discordance_sharpness_changes_result() {
        let pp = PartialPreferenceCalculator::alternatives(&v_shape_criteria(), &table(), false).unwrap();
        let dp = DecimalPlace::new(3);

        let soft = DiscordanceCalculator::discordance(&pp, 1.0, dp).unwrap();
        // 1 - (1 - 0.5)^(1/2)
        assert_eq!(soft.get("a", "b"), Some(0.293));

        let sharp = DiscordanceCalculator::discordance(&pp, 2.0, dp).unwrap();
        assert_eq!(sharp.get("a", "b"), Some(0.5));
        assert_eq!(sharp.get("a", "a"), None);
    }

    #[test]
    fn tau_outside_range_is_rejected() {
        let pp = PartialPreferenceCalculator::alternatives(&v_shape_criteria(), &table(), false).unwrap();
        let dp = DecimalPlace::new(3);
        for tau in [0.5, 2.5, f64::NAN] {
            let err = DiscordanceCalculator::discordance(&pp, tau, dp).unwrap_err();
            assert_eq!(err.code, ErrorCode::TauOutOfRange);
        }
    }

    #[test]
    fn veto_modes() {
        let criteria = CriteriaSet::new(vec![
            Criterion::new("g1", Direction::Max, PreferenceFunction::usual(), 3.0)
                .unwrap()
                .with_veto(2.0)
                .unwrap(),
            Criterion::new("g2", Direction::Max, PreferenceFunction::usual(), 1.0)
                .unwrap()
                .with_veto(2.5)
                .unwrap(),
        ])
        .unwrap();
        let normalized = normalize_directions(&table(), &criteria).unwrap();
        let deviations = DeviationMatrix::within(&normalized);
        let dp = DecimalPlace::new(3);

        let sharp =
            DiscordanceCalculator::veto(&criteria, &deviations, VetoAggregation::Sharpness { tau: 2.0 }, dp).unwrap();
        // b beats a on g2 by 3 ≥ 2.5
        assert_eq!(sharp.get("a", "b"), Some(1.0));
        // a beats b on g1 by 2 ≥ 2
        assert_eq!(sharp.get("b", "a"), Some(1.0));

        let weighted =
            DiscordanceCalculator::veto(&criteria, &deviations, VetoAggregation::Weighted, dp).unwrap();
        assert_eq!(weighted.get("a", "b"), Some(0.25));
        assert_eq!(weighted.get("b", "a"), Some(0.75));
    }

    #[test]
    fn weighted_veto_ignores_sharpness_bounds() {
        let criteria = CriteriaSet::new(vec![
            Criterion::new("g1", Direction::Max, PreferenceFunction::usual(), 1.0)
                .unwrap()
                .with_veto(2.0)
                .unwrap(),
            Criterion::new("g2", Direction::Max, PreferenceFunction::usual(), 1.0).unwrap(),
        ])
        .unwrap();
        let normalized = normalize_directions(&table(), &criteria).unwrap();
        let deviations = DeviationMatrix::within(&normalized);
        let dp = DecimalPlace::new(3);

        assert_eq!(VetoAggregation::Weighted.tau(), None);
        let weighted = DiscordanceCalculator::veto(&criteria, &deviations, VetoAggregation::Weighted, dp).unwrap();
        assert_eq!(weighted.get("b", "a"), Some(0.5));

        let err = DiscordanceCalculator::veto(&criteria, &deviations, VetoAggregation::Sharpness { tau: 3.0 }, dp)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TauOutOfRange);
    }

    #[test]
    fn veto_aggregation_serializes_with_tau() {
        let json = serde_json::to_value(VetoAggregation::Sharpness { tau: 1.5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "sharpness": { "tau": 1.5 } }));
    }

    #[test]
    fn criteria_without_veto_never_veto() {
        let criteria = v_shape_criteria();
        let normalized = normalize_directions(&table(), &criteria).unwrap();
        let deviations = DeviationMatrix::within(&normalized);
        let veto = DiscordanceCalculator::veto(
            &criteria,
            &deviations,
            VetoAggregation::Sharpness { tau: 1.0 },
            DecimalPlace::new(3),
        )
        .unwrap();
        assert_eq!(veto.max_value(), Some(0.0));
    }

    #[test]
    fn combine_attenuates_by_label() {
        let pi = PreferenceMatrix::from_rows(
            vec!["a".into(), "b".into()],
            vec!["a".into(), "b".into()],
            vec![vec![0.0, 0.8], vec![0.3, 0.0]],
        )
        .unwrap();
        let d = PreferenceMatrix::from_rows(
            vec!["b".into(), "a".into()],
            vec!["b".into(), "a".into()],
            vec![vec![0.0, 1.0], vec![0.5, 0.0]],
        )
        .unwrap();
        let combined = DiscordanceCalculator::combine(&pi, &d, DecimalPlace::new(2)).unwrap();
        assert_eq!(combined.get("a", "b"), Some(0.4));
        assert_eq!(combined.get("b", "a"), Some(0.0));
    }

    #[test]
    fn combine_requires_matching_labels() {
        let pi = PreferenceMatrix::from_rows(
            vec!["a".into(), "b".into()],
            vec!["a".into(), "b".into()],
            vec![vec![0.0, 0.8], vec![0.3, 0.0]],
        )
        .unwrap();
        let d = PreferenceMatrix::from_rows(
            vec!["a".into(), "c".into()],
            vec!["a".into(), "c".into()],
            vec![vec![0.0, 1.0], vec![0.5, 0.0]],
        )
        .unwrap();
        let err = DiscordanceCalculator::combine(&pi, &d, DecimalPlace::new(2)).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingLabel);
    }
}
