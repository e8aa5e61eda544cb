//! PROMETHEE preference pipeline: normalisation, deviations, partial
//! preferences, aggregation and the optional discordance/veto attenuation
//! wired together for one criteria set.

use serde::Serialize;
use tracing::debug;

use super::aggregation::{AggregationOptions, PreferenceAggregator};
use super::discordance::{DiscordanceCalculator, VetoAggregation};
use super::interaction::resolve_interactions;
use super::{
    normalize_directions, CriteriaSet, DeviationMatrix, Interaction, InteractionFunction,
    PartialPreferenceCalculator, PartialPreferences,
};
use crate::domain::foundation::{
    DecimalPlace, DomainError, DomainResult, PerformanceTable, PreferenceMatrix,
};

/// Aggregated preferences of alternatives and profiles against each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePreferences {
    pub alternatives_vs_profiles: PreferenceMatrix,
    pub profiles_vs_alternatives: PreferenceMatrix,
    pub profiles_vs_profiles: PreferenceMatrix,
}

/// Configured preference pipeline.
///
/// Every call recomputes from its inputs; the struct only holds immutable
/// configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Promethee {
    criteria: CriteriaSet,
    options: AggregationOptions,
    use_reinforcement: bool,
    discordance_tau: Option<f64>,
    veto: Option<VetoAggregation>,
}

impl Promethee {
    pub fn builder(criteria: CriteriaSet) -> PrometheeBuilder {
        PrometheeBuilder::new(criteria)
    }

    /// Pipeline with default options: no reinforcement, interactions,
    /// discordance or veto.
    pub fn new(criteria: CriteriaSet) -> Self {
        Self {
            criteria,
            options: AggregationOptions::default(),
            use_reinforcement: false,
            discordance_tau: None,
            veto: None,
        }
    }

    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    pub fn decimal_place(&self) -> DecimalPlace {
        self.options.decimal_place
    }

    pub fn uses_reinforcement(&self) -> bool {
        self.use_reinforcement
    }

    /// Partial preferences of the alternatives among themselves.
    pub fn partial_preferences(&self, alternatives: &PerformanceTable) -> DomainResult<PartialPreferences> {
        PartialPreferenceCalculator::alternatives(&self.criteria, alternatives, self.use_reinforcement)
    }

    /// Aggregated preference `Π` of the alternatives among themselves.
    pub fn preferences(&self, alternatives: &PerformanceTable) -> DomainResult<PreferenceMatrix> {
        let normalized = normalize_directions(alternatives, &self.criteria)?;
        let deviations = DeviationMatrix::within(&normalized);
        let partial =
            PartialPreferenceCalculator::from_deviations(&self.criteria, &deviations, self.use_reinforcement)?;
        debug!(alternatives = normalized.row_count(), "Computing aggregated preferences");
        self.aggregate(&partial, &partial, &deviations)
    }

    /// Aggregated preferences of alternatives against profiles, profiles
    /// against alternatives and profiles among themselves.
    pub fn preferences_with_profiles(
        &self,
        alternatives: &PerformanceTable,
        profiles: &PerformanceTable,
    ) -> DomainResult<ProfilePreferences> {
        let alternatives = normalize_directions(alternatives, &self.criteria)?;
        let profiles = normalize_directions(profiles, &self.criteria)?;
        debug!(
            alternatives = alternatives.row_count(),
            profiles = profiles.row_count(),
            "Computing aggregated preferences against profiles"
        );

        let forward = DeviationMatrix::between(&alternatives, &profiles)?;
        let backward = DeviationMatrix::between(&profiles, &alternatives)?;
        let within = DeviationMatrix::within(&profiles);

        let forward_pp =
            PartialPreferenceCalculator::from_deviations(&self.criteria, &forward, self.use_reinforcement)?;
        let backward_pp =
            PartialPreferenceCalculator::from_deviations(&self.criteria, &backward, self.use_reinforcement)?;
        let within_pp =
            PartialPreferenceCalculator::from_deviations(&self.criteria, &within, self.use_reinforcement)?;

        Ok(ProfilePreferences {
            alternatives_vs_profiles: self.aggregate(&forward_pp, &backward_pp, &backward)?,
            profiles_vs_alternatives: self.aggregate(&backward_pp, &forward_pp, &forward)?,
            profiles_vs_profiles: self.aggregate(&within_pp, &within_pp, &within)?,
        })
    }

    fn aggregate(
        &self,
        partial: &PartialPreferences,
        reverse: &PartialPreferences,
        reverse_deviations: &DeviationMatrix,
    ) -> DomainResult<PreferenceMatrix> {
        let dp = self.options.decimal_place;
        let mut pi = PreferenceAggregator::aggregate_with_reverse(&self.criteria, partial, reverse, &self.options)?;
        if let Some(tau) = self.discordance_tau {
            let discordance = DiscordanceCalculator::discordance(reverse, tau, dp)?;
            pi = DiscordanceCalculator::combine(&pi, &discordance, dp)?;
        }
        if let Some(aggregation) = self.veto {
            let veto = DiscordanceCalculator::veto(&self.criteria, reverse_deviations, aggregation, dp)?;
            pi = DiscordanceCalculator::combine(&pi, &veto, dp)?;
        }
        Ok(pi)
    }
}

/// Builder for [`Promethee`]; `build` validates the whole configuration so
/// no matrix is computed from an invalid one.
#[derive(Debug, Clone)]
pub struct PrometheeBuilder {
    criteria: CriteriaSet,
    options: AggregationOptions,
    use_reinforcement: bool,
    discordance_tau: Option<f64>,
    veto: Option<VetoAggregation>,
}

impl PrometheeBuilder {
    pub fn new(criteria: CriteriaSet) -> Self {
        Self {
            criteria,
            options: AggregationOptions::default(),
            use_reinforcement: false,
            discordance_tau: None,
            veto: None,
        }
    }

    pub fn decimal_place(mut self, decimal_place: DecimalPlace) -> Self {
        self.options.decimal_place = decimal_place;
        self
    }

    pub fn reinforcement(mut self, enabled: bool) -> Self {
        self.use_reinforcement = enabled;
        self
    }

    pub fn interactions(mut self, interactions: Vec<Interaction>, function: InteractionFunction) -> Self {
        self.options = self.options.with_interactions(interactions, function);
        self
    }

    /// Attenuates `Π` by discordance with sharpness `tau`.
    pub fn discordance(mut self, tau: f64) -> Self {
        self.discordance_tau = Some(tau);
        self
    }

    /// Attenuates `Π` by veto.
    pub fn veto(mut self, aggregation: VetoAggregation) -> Self {
        self.veto = Some(aggregation);
        self
    }

    pub fn build(self) -> DomainResult<Promethee> {
        let n = self.criteria.len();
        let taus = self
            .discordance_tau
            .into_iter()
            .chain(self.veto.and_then(|v| v.tau()));
        for tau in taus {
            if !tau.is_finite() || tau < 1.0 || tau > n as f64 {
                return Err(DomainError::tau_out_of_range(tau, n));
            }
        }
        resolve_interactions(&self.criteria, &self.options.interactions)?;
        if self.use_reinforcement && self.criteria.iter().all(|c| c.reinforcement.is_none()) {
            debug!("Reinforcement enabled but no criterion declares a reinforced threshold");
        }
        Ok(Promethee {
            criteria: self.criteria,
            options: self.options,
            use_reinforcement: self.use_reinforcement,
            discordance_tau: self.discordance_tau,
            veto: self.veto,
        })
    }
}
