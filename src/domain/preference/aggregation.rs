//! Preference Aggregator - weighted combination of partial preferences.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interaction::{resolve_interactions, ResolvedInteraction};
use super::{CriteriaSet, Interaction, InteractionFunction, InteractionKind, PartialPreferences};
use crate::domain::foundation::{DecimalPlace, DomainError, DomainResult, PreferenceMatrix};

/// Settings shared by every aggregation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationOptions {
    pub decimal_place: DecimalPlace,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub interaction_function: InteractionFunction,
}

impl AggregationOptions {
    pub fn with_decimal_place(decimal_place: DecimalPlace) -> Self {
        Self {
            decimal_place,
            ..Self::default()
        }
    }

    pub fn with_interactions(
        mut self,
        interactions: Vec<Interaction>,
        function: InteractionFunction,
    ) -> Self {
        self.interactions = interactions;
        self.interaction_function = function;
        self
    }
}

/// Aggregates partial preferences into `Π(i, j)`.
pub struct PreferenceAggregator;

impl PreferenceAggregator {
    /// Aggregates a square (alternatives-vs-alternatives) cube.
    ///
    /// # Algorithm
    /// `Π(i,j) = Σ_k w_k·pp_k(i,j) / Σ_k w'_k`, where `w'_k = w_k·rf_k` for
    /// criteria reinforced on the pair and `w_k` otherwise. Each declared
    /// interaction adds `Z(x, y)·coefficient·sign` to both numerator and
    /// denominator; for antagonistic pairs `y` is the reverse preference
    /// `pp_k2(j,i)`.
    ///
    /// # Edge Cases
    /// - Diagonal: excluded, no value
    /// - Interactions present: result may fall outside `[0, 1]`
    /// - Zero denominator: `InvariantViolation`
    pub fn aggregate(
        criteria: &CriteriaSet,
        partial: &PartialPreferences,
        options: &AggregationOptions,
    ) -> DomainResult<PreferenceMatrix> {
        let values = partial.values();
        let needs_reverse = options
            .interactions
            .iter()
            .any(|i| i.kind == InteractionKind::Antagonistic);
        if needs_reverse && values.rows() != values.columns() {
            return Err(DomainError::validation(
                "interactions",
                "Antagonistic interactions on a rectangular comparison need the reverse preferences",
            ));
        }
        Self::aggregate_inner(criteria, partial, options, |k, i, j| values.at(k, j, i))
    }

    /// Aggregates a rectangular cube, taking reverse preferences for
    /// antagonistic interactions from `reverse` (columns x rows).
    pub fn aggregate_with_reverse(
        criteria: &CriteriaSet,
        partial: &PartialPreferences,
        reverse: &PartialPreferences,
        options: &AggregationOptions,
    ) -> DomainResult<PreferenceMatrix> {
        let forward = partial.values();
        let backward = reverse.values();
        if forward.rows() != backward.columns() || forward.columns() != backward.rows() {
            return Err(DomainError::validation(
                "reverse",
                "Reverse preferences must swap the rows and columns of the forward preferences",
            ));
        }
        Self::aggregate_inner(criteria, partial, options, |k, i, j| backward.at(k, j, i))
    }

    fn aggregate_inner(
        criteria: &CriteriaSet,
        partial: &PartialPreferences,
        options: &AggregationOptions,
        reverse: impl Fn(usize, usize, usize) -> f64,
    ) -> DomainResult<PreferenceMatrix> {
        let values = partial.values();
        if values.criteria().labels() != criteria.ids() {
            return Err(DomainError::validation(
                "partial_preferences",
                "Partial preference criteria do not match the criteria set",
            ));
        }
        let interactions = resolve_interactions(criteria, &options.interactions)?;
        let dp = options.decimal_place;

        let mut zero_denominator = None;
        let matrix = PreferenceMatrix::from_fn(values.rows(), values.columns(), |i, j| {
            let (mut numerator, mut denominator) = criteria.iter().enumerate().fold(
                (0.0, 0.0),
                |(num, den), (k, criterion)| {
                    let degree = partial.at(k, i, j);
                    let weight = match criterion.reinforcement {
                        Some(r) if partial.is_reinforced(k, i, j) => criterion.weight * r.factor,
                        _ => criterion.weight,
                    };
                    (num + criterion.weight * degree, den + weight)
                },
            );
            for interaction in &interactions {
                let term = interaction_term(interaction, options.interaction_function, |k| {
                    partial.at(k, i, j)
                }, |k| reverse(k, i, j));
                numerator += term;
                denominator += term;
            }
            if denominator == 0.0 {
                zero_denominator.get_or_insert((i, j));
                return 0.0;
            }
            dp.round(numerator / denominator)
        });

        if let Some((i, j)) = zero_denominator {
            return Err(DomainError::invariant(format!(
                "Aggregation denominator vanished for pair ({}, {})",
                values.rows().label(i),
                values.columns().label(j)
            )));
        }

        debug!(
            rows = values.rows().len(),
            columns = values.columns().len(),
            interactions = interactions.len(),
            "Aggregated preferences"
        );
        Ok(matrix)
    }
}

fn interaction_term(
    interaction: &ResolvedInteraction,
    function: InteractionFunction,
    forward: impl Fn(usize) -> f64,
    reverse: impl Fn(usize) -> f64,
) -> f64 {
    let x = forward(interaction.first);
    let y = match interaction.kind {
        InteractionKind::Antagonistic => reverse(interaction.second),
        _ => forward(interaction.second),
    };
    function.apply(x, y) * interaction.coefficient * interaction.kind.sign()
}
