//! Pipeline configuration shared by the classifiers

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::{DecimalPlace, DomainResult, PerformanceTable};
use crate::domain::preference::{CriteriaSet, Interaction, InteractionFunction, Promethee, PrometheeBuilder};
use crate::domain::sorting::{DecisionMaker, FlowSort, FlowSortGdss, ProfileComparison, PromSort};

/// Settings applied to every preference computation and classifier.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Decimal places kept when rounding preferences and distances
    #[serde(default = "default_decimal_place")]
    pub decimal_place: u8,

    /// How interacting partial preferences are combined
    #[serde(default)]
    pub interaction_function: InteractionFunction,

    /// Tie-break in the final assignment steps
    #[serde(default = "default_assign_to_better_class")]
    pub assign_to_better_class: bool,

    /// PromSort threshold on `d+ - d-`
    #[serde(default)]
    pub cut_point: f64,

    /// Profile semantics for FlowSort and FlowSort-GDSS
    #[serde(default)]
    pub profile_comparison: ProfileComparison,

    /// Discordance sharpness; no discordance when unset
    pub tau: Option<f64>,
}

impl PipelineConfig {
    pub fn decimal_place(&self) -> DecimalPlace {
        DecimalPlace::new(self.decimal_place)
    }

    /// Builder preloaded with the configured precision, interaction function
    /// and discordance.
    pub fn promethee_builder(&self, criteria: CriteriaSet, interactions: Vec<Interaction>) -> PrometheeBuilder {
        let builder = Promethee::builder(criteria)
            .decimal_place(self.decimal_place())
            .interactions(interactions, self.interaction_function);
        match self.tau {
            Some(tau) => builder.discordance(tau),
            None => builder,
        }
    }

    pub fn promethee(&self, criteria: CriteriaSet) -> DomainResult<Promethee> {
        self.promethee_builder(criteria, Vec::new()).build()
    }

    pub fn promsort(&self, promethee: Promethee, profiles: PerformanceTable) -> DomainResult<PromSort> {
        Ok(PromSort::new(promethee, profiles)?
            .with_cut_point(self.cut_point)
            .assign_to_better_class(self.assign_to_better_class))
    }

    pub fn flowsort(&self, promethee: Promethee, profiles: PerformanceTable) -> DomainResult<FlowSort> {
        FlowSort::new(promethee, profiles, self.profile_comparison)
    }

    pub fn gdss(&self, decision_makers: Vec<DecisionMaker>) -> DomainResult<FlowSortGdss> {
        Ok(FlowSortGdss::new(decision_makers, self.profile_comparison)?
            .assign_to_better_class(self.assign_to_better_class)
            .with_decimal_place(self.decimal_place()))
    }

    /// Validate pipeline configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.decimal_place > DecimalPlace::MAX {
            return Err(ValidationError::InvalidDecimalPlace {
                value: self.decimal_place,
                max: DecimalPlace::MAX,
            });
        }
        if !self.cut_point.is_finite() {
            return Err(ValidationError::InvalidCutPoint);
        }
        // The upper bound depends on the criteria count and is checked at build time.
        if let Some(tau) = self.tau {
            if !tau.is_finite() || tau < 1.0 {
                return Err(ValidationError::InvalidTau(tau));
            }
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            decimal_place: default_decimal_place(),
            interaction_function: InteractionFunction::default(),
            assign_to_better_class: default_assign_to_better_class(),
            cut_point: 0.0,
            profile_comparison: ProfileComparison::default(),
            tau: None,
        }
    }
}

fn default_decimal_place() -> u8 {
    DecimalPlace::DEFAULT.value()
}

fn default_assign_to_better_class() -> bool {
    true
}
