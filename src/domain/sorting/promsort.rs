//! PromSort - flow-based sorting with an imprecise first step and a
//! distance-based final step.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::profiles::check_dominance;
use super::{Bracket, Category, Classification, SortingOutcome};
use crate::domain::flows::{Flow, FlowCalculator};
use crate::domain::foundation::{DecimalPlace, DomainError, DomainResult, PerformanceTable};
use crate::domain::preference::Promethee;

/// Relation of an alternative to a profile derived from their
/// `(φ+, φ−)` flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRelation {
    /// At least as good on both flows, strictly better on one.
    Preferred,
    /// Both flows equal.
    Indifferent,
    /// At least as bad on both flows, strictly worse on one.
    ReversePreferred,
    /// The flows disagree.
    Incomparable,
}

impl FlowRelation {
    pub fn between(alternative: Flow, profile: Flow) -> Self {
        let positive_equal = alternative.positive == profile.positive;
        let negative_equal = alternative.negative == profile.negative;
        if positive_equal && negative_equal {
            FlowRelation::Indifferent
        } else if alternative.positive >= profile.positive && alternative.negative <= profile.negative {
            FlowRelation::Preferred
        } else if alternative.positive <= profile.positive && alternative.negative >= profile.negative {
            FlowRelation::ReversePreferred
        } else {
            FlowRelation::Incomparable
        }
    }
}

/// Distances of a bracketed alternative to the precisely assigned members
/// of its two candidate categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalStepDistances {
    /// Mean of `φ(a) − φ(x)` over members `x` of the worse category.
    pub positive: f64,
    /// Mean of `φ(y) − φ(a)` over members `y` of the better category.
    pub negative: f64,
}

/// PromSort classifier for one decision maker.
#[derive(Debug, Clone)]
pub struct PromSort {
    promethee: Promethee,
    profiles: PerformanceTable,
    cut_point: f64,
    assign_to_better_class: bool,
}

impl PromSort {
    /// Creates a classifier; profiles are ordered worst to best and must
    /// satisfy `profile_i + p_k < profile_{i+1}` on every criterion.
    pub fn new(promethee: Promethee, profiles: PerformanceTable) -> DomainResult<Self> {
        if profiles.is_empty() {
            return Err(DomainError::validation("profiles", "At least one profile is required"));
        }
        let criteria = promethee.criteria();
        check_dominance(criteria, &profiles, &criteria.preference_thresholds())?;
        Ok(Self {
            promethee,
            profiles,
            cut_point: 0.0,
            assign_to_better_class: true,
        })
    }

    pub fn with_cut_point(mut self, cut_point: f64) -> Self {
        self.cut_point = cut_point;
        self
    }

    pub fn assign_to_better_class(mut self, better: bool) -> Self {
        self.assign_to_better_class = better;
        self
    }

    /// Number of categories (profiles + 1).
    pub fn category_count(&self) -> usize {
        self.profiles.row_count() + 1
    }

    /// Classifies every alternative.
    ///
    /// # Algorithm
    /// 1. Flows over alternatives and profiles together
    /// 2. First step per alternative from its relation to each profile
    /// 3. Final step for brackets, against the alternatives assigned
    ///    precisely in step 2
    pub fn classify(&self, alternatives: &PerformanceTable) -> DomainResult<SortingOutcome> {
        if !self.cut_point.is_finite() {
            return Err(DomainError::validation("cut_point", "Cut point must be finite"));
        }
        let dp = self.promethee.decimal_place();
        let combined = alternatives.concat(&self.profiles)?;
        let preferences = self.promethee.preferences(&combined)?;
        let flows = FlowCalculator::flows(&preferences)?;

        let profile_flows = self
            .profiles
            .row_labels()
            .iter()
            .map(|r| flows.require(r))
            .collect::<DomainResult<Vec<_>>>()?;

        let first_step = alternatives
            .row_labels()
            .iter()
            .map(|a| {
                let bracket = Self::first_step(flows.require(a)?, &profile_flows)?;
                debug!(alternative = %a, %bracket, "PromSort first step");
                Classification::pending(a.as_str()).with_bracket(bracket)
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let mut members = first_step
            .iter()
            .filter_map(|c| c.category().map(|cat| (cat, c.alternative())))
            .try_fold(HashMap::<Category, Vec<f64>>::new(), |mut acc, (cat, a)| {
                acc.entry(cat).or_default().push(flows.require(a)?.net);
                Ok::<_, DomainError>(acc)
            })?;
        // Summation order must not depend on row order.
        for nets in members.values_mut() {
            nets.sort_by(f64::total_cmp);
        }

        let classifications = first_step
            .into_iter()
            .map(|record| {
                let bracket = match record.bracket() {
                    Some(b) if !b.is_precise() => b,
                    _ => return Ok(record),
                };
                let net = flows.require(record.alternative())?.net;
                let distances = Self::distances(
                    record.alternative(),
                    net,
                    members.get(&bracket.worse).map(Vec::as_slice).unwrap_or(&[]),
                    members.get(&bracket.better).map(Vec::as_slice).unwrap_or(&[]),
                    dp,
                );
                let category = Self::final_step(
                    bracket,
                    distances,
                    self.cut_point,
                    self.assign_to_better_class,
                    dp,
                );
                debug!(
                    alternative = %record.alternative(),
                    positive = distances.positive,
                    negative = distances.negative,
                    %category,
                    "PromSort final step"
                );
                record.resolve(category)
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(SortingOutcome::new(classifications))
    }

    /// First step: the last profile the alternative is preferred to fixes
    /// the worse end; the next profile decides whether the bracket widens.
    ///
    /// # Edge Cases
    /// - Preferred to the best profile: best category
    /// - Reverse-preferred by the worst profile: worst category
    /// - Next profile Indifferent or Incomparable: two-category bracket
    pub fn first_step(alternative: Flow, profiles: &[Flow]) -> DomainResult<Bracket> {
        let relations: Vec<FlowRelation> = profiles
            .iter()
            .map(|r| FlowRelation::between(alternative, *r))
            .collect();
        let last_preferred = relations
            .iter()
            .rposition(|r| *r == FlowRelation::Preferred)
            .map(|i| i + 1)
            .unwrap_or(0);

        let worse = Category::from_position(last_preferred);
        if last_preferred == profiles.len() {
            return Ok(Bracket::precise(worse));
        }
        match relations[last_preferred] {
            FlowRelation::Indifferent | FlowRelation::Incomparable => Bracket::new(worse, worse.next()),
            FlowRelation::ReversePreferred => Ok(Bracket::precise(worse)),
            FlowRelation::Preferred => Err(DomainError::invariant(
                "Profile after the last preferred profile is itself preferred",
            )),
        }
    }

    fn distances(
        alternative: &str,
        net: f64,
        worse_members: &[f64],
        better_members: &[f64],
        dp: DecimalPlace,
    ) -> FinalStepDistances {
        let mean = |values: &[f64], f: &dyn Fn(f64) -> f64, side: &str| {
            if values.is_empty() {
                warn!(alternative, side, "No precisely assigned alternative in category, distance is 0");
                return 0.0;
            }
            dp.round(values.iter().map(|&v| f(v)).sum::<f64>() / values.len() as f64)
        };
        FinalStepDistances {
            positive: mean(worse_members, &|x| net - x, "worse"),
            negative: mean(better_members, &|y| y - net, "better"),
        }
    }

    /// Final step: `d+ − d−` above the cut point goes to the better
    /// category, below to the worse one; equality follows the tie-break flag.
    pub fn final_step(
        bracket: Bracket,
        distances: FinalStepDistances,
        cut_point: f64,
        assign_to_better_class: bool,
        dp: DecimalPlace,
    ) -> Category {
        let difference = dp.round(distances.positive - distances.negative);
        if difference > cut_point {
            bracket.better
        } else if difference < cut_point {
            bracket.worse
        } else if assign_to_better_class {
            bracket.better
        } else {
            bracket.worse
        }
    }
}
