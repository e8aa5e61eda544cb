//! FlowSort I/II - placement of profile-based flows among the flows of the
//! profiles in the reference set `R ∪ {a}`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::profiles::check_strict_dominance;
use super::{Bracket, Classification, LimitExcess, ProfileComparison, SortingOutcome};
use crate::domain::flows::{Flow, FlowCalculator, OutrankingFlows};
use crate::domain::foundation::{DomainError, DomainResult, PerformanceTable};
use crate::domain::preference::Promethee;

/// Which flows are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowSortVariant {
    /// Positive and negative flows placed separately; may leave a bracket.
    I,
    /// Net flow only; always precise.
    #[default]
    II,
}

/// FlowSort result for one alternative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSortAssignment {
    pub bracket: Bracket,
    /// Limits left by any of the placed flows (limiting profiles only).
    pub excesses: Vec<LimitExcess>,
}

/// Outcome of a FlowSort run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSortOutcome {
    pub outcome: SortingOutcome,
    /// Profile-based flows of the alternatives.
    pub flows: OutrankingFlows,
    /// Alternatives placed outside the limiting profiles.
    pub limit_excesses: Vec<(String, LimitExcess)>,
}

/// FlowSort classifier for one decision maker.
#[derive(Debug, Clone)]
pub struct FlowSort {
    promethee: Promethee,
    profiles: PerformanceTable,
    comparison: ProfileComparison,
}

impl FlowSort {
    /// Creates a classifier; profiles are ordered worst to best and must be
    /// strictly increasing on every criterion.
    pub fn new(
        promethee: Promethee,
        profiles: PerformanceTable,
        comparison: ProfileComparison,
    ) -> DomainResult<Self> {
        comparison.category_count(profiles.row_count())?;
        check_strict_dominance(promethee.criteria(), &profiles)?;
        Ok(Self {
            promethee,
            profiles,
            comparison,
        })
    }

    pub fn comparison(&self) -> ProfileComparison {
        self.comparison
    }

    pub fn category_count(&self) -> usize {
        self.comparison
            .category_count(self.profiles.row_count())
            .unwrap_or_default()
    }

    /// FlowSort I: brackets from separate positive and negative placements.
    pub fn flowsort_i(&self, alternatives: &PerformanceTable) -> DomainResult<FlowSortOutcome> {
        self.classify(alternatives, FlowSortVariant::I)
    }

    /// FlowSort II: precise categories from the net flow.
    pub fn flowsort_ii(&self, alternatives: &PerformanceTable) -> DomainResult<FlowSortOutcome> {
        self.classify(alternatives, FlowSortVariant::II)
    }

    pub fn classify(
        &self,
        alternatives: &PerformanceTable,
        variant: FlowSortVariant,
    ) -> DomainResult<FlowSortOutcome> {
        if let Some(shared) = alternatives
            .row_labels()
            .iter()
            .find(|a| self.profiles.rows().contains(a))
        {
            return Err(DomainError::validation(
                "alternatives",
                format!("Alternative '{}' shares its label with a profile", shared),
            ));
        }
        let preferences = self.promethee.preferences_with_profiles(alternatives, &self.profiles)?;
        let flows = FlowCalculator::profile_based(
            &preferences.alternatives_vs_profiles,
            &preferences.profiles_vs_alternatives,
        )?;

        let mut classifications = Vec::with_capacity(alternatives.row_count());
        let mut limit_excesses = Vec::new();
        for label in alternatives.row_labels() {
            let reference = FlowCalculator::reference_flows(&preferences, label)?;
            let profile_flows: Vec<Flow> = reference.profiles.iter().map(|(_, f)| f).collect();
            let assignment = Self::assign_from_flows(
                self.comparison,
                variant,
                reference.alternative,
                &profile_flows,
            )?;
            debug!(
                alternative = %label,
                bracket = %assignment.bracket,
                ?variant,
                "FlowSort placement"
            );
            limit_excesses.extend(assignment.excesses.iter().map(|e| (label.clone(), *e)));
            classifications.push(Classification::pending(label.as_str()).with_bracket(assignment.bracket)?);
        }

        Ok(FlowSortOutcome {
            outcome: SortingOutcome::new(classifications),
            flows,
            limit_excesses,
        })
    }

    /// Places one alternative's flows among the profile flows (ordered worst
    /// to best).
    ///
    /// # Edge Cases
    /// - Variant I with equal placements: degenerate bracket
    /// - Same excess from both flows: reported once
    pub fn assign_from_flows(
        comparison: ProfileComparison,
        variant: FlowSortVariant,
        alternative: Flow,
        profiles: &[Flow],
    ) -> DomainResult<FlowSortAssignment> {
        let placements = match variant {
            FlowSortVariant::I => {
                let positive: Vec<f64> = profiles.iter().map(|f| f.positive).collect();
                let negative: Vec<f64> = profiles.iter().map(|f| f.negative).collect();
                vec![
                    comparison.place(alternative.positive, &positive)?,
                    comparison.place_negative(alternative.negative, &negative)?,
                ]
            }
            FlowSortVariant::II => {
                let net: Vec<f64> = profiles.iter().map(|f| f.net).collect();
                vec![comparison.place(alternative.net, &net)?]
            }
        };

        let bracket = placements
            .iter()
            .map(|p| Bracket::precise(p.category))
            .reduce(|a, b| Bracket::spanning(a.worse.min(b.worse), a.better.max(b.better)))
            .ok_or_else(|| DomainError::invariant("No flow was placed"))?;
        let mut excesses: Vec<LimitExcess> = placements.iter().filter_map(|p| p.excess).collect();
        excesses.dedup();

        Ok(FlowSortAssignment { bracket, excesses })
    }
}
