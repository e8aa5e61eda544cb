//! FlowSort-GDSS - FlowSort for a group of decision makers with weighted
//! voting and a weighted-distance final step.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::profiles::check_group_dominance;
use super::{Bracket, Category, Classification, ProfileComparison, SortingOutcome};
use crate::domain::flows::FlowCalculator;
use crate::domain::foundation::{
    DecimalPlace, DomainError, DomainResult, PerformanceTable, ValidationError,
};
use crate::domain::preference::{ProfilePreferences, Promethee};

/// One decision maker: own criteria (inside `promethee`), own profiles
/// ordered worst to best, and an importance weight.
#[derive(Debug, Clone)]
pub struct DecisionMaker {
    id: String,
    promethee: Promethee,
    profiles: PerformanceTable,
    weight: f64,
}

impl DecisionMaker {
    pub fn new(
        id: impl Into<String>,
        promethee: Promethee,
        profiles: PerformanceTable,
        weight: f64,
    ) -> DomainResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("decision maker id").into());
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ValidationError::non_positive_weight(id, weight).into());
        }
        Ok(Self {
            id,
            promethee,
            profiles,
            weight,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Label of one of this decision maker's profiles in the shared
    /// reference set.
    pub fn reference_label(&self, profile: &str) -> String {
        format!("{}/{}", self.id, profile)
    }
}

/// Weighted distances of the final step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupDistances {
    pub worse: f64,
    pub better: f64,
}

/// Votes behind one alternative's classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupVote {
    pub alternative: String,
    /// Decision maker id and its category vote, in decision maker order.
    pub votes: Vec<(String, Category)>,
    pub worse_voters: Vec<String>,
    pub better_voters: Vec<String>,
    /// Present only when the votes disagreed.
    pub distances: Option<GroupDistances>,
}

/// Outcome of a FlowSort-GDSS run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GdssOutcome {
    pub outcome: SortingOutcome,
    pub votes: Vec<GroupVote>,
}

/// FlowSort-GDSS classifier.
#[derive(Debug, Clone)]
pub struct FlowSortGdss {
    decision_makers: Vec<DecisionMaker>,
    comparison: ProfileComparison,
    assign_to_better_class: bool,
    decimal_place: DecimalPlace,
}

impl FlowSortGdss {
    /// Creates a classifier.
    ///
    /// # Errors
    /// - No decision makers, duplicate ids, or limiting profiles: validation
    /// - Decision makers evaluating different criteria: validation
    /// - Profile `i` of any decision maker not strictly below profile
    ///   `i + 1` of every decision maker: `DominanceViolation`
    pub fn new(decision_makers: Vec<DecisionMaker>, comparison: ProfileComparison) -> DomainResult<Self> {
        if comparison == ProfileComparison::Limiting {
            return Err(DomainError::validation(
                "comparison_with_profiles",
                "Group sorting supports boundary or central profiles only",
            ));
        }
        let first = decision_makers
            .first()
            .ok_or_else(|| DomainError::from(ValidationError::empty_field("decision_makers")))?;

        let mut seen = HashSet::new();
        for dm in &decision_makers {
            if !seen.insert(dm.id.as_str()) {
                return Err(DomainError::validation(
                    "decision_makers",
                    format!("Decision maker '{}' appears twice", dm.id),
                ));
            }
            let same_criteria = dm.promethee.criteria().ids() == first.promethee.criteria().ids()
                && dm
                    .promethee
                    .criteria()
                    .iter()
                    .zip(first.promethee.criteria().iter())
                    .all(|(a, b)| a.direction == b.direction);
            if !same_criteria {
                return Err(DomainError::validation(
                    "decision_makers",
                    format!("Decision maker '{}' evaluates different criteria", dm.id),
                ));
            }
            comparison.category_count(dm.profiles.row_count())?;
        }

        let sets: Vec<(&str, &PerformanceTable)> = decision_makers
            .iter()
            .map(|dm| (dm.id.as_str(), &dm.profiles))
            .collect();
        check_group_dominance(first.promethee.criteria(), &sets)?;

        Ok(Self {
            decision_makers,
            comparison,
            assign_to_better_class: true,
            decimal_place: DecimalPlace::default(),
        })
    }

    pub fn assign_to_better_class(mut self, better: bool) -> Self {
        self.assign_to_better_class = better;
        self
    }

    pub fn with_decimal_place(mut self, decimal_place: DecimalPlace) -> Self {
        self.decimal_place = decimal_place;
        self
    }

    pub fn decision_makers(&self) -> &[DecisionMaker] {
        &self.decision_makers
    }

    /// Classifies every alternative.
    ///
    /// # Algorithm
    /// 1. Reference set `R` = every profile of every decision maker
    /// 2. Per decision maker, flows in `R ∪ {a}` with its own criteria
    /// 3. General flow `φ_G` = importance-weighted sum of those flows
    /// 4. Each decision maker places `φ_G(a)` among `φ_G` of its own profiles
    /// 5. Unanimous votes assign; otherwise the weighted distances decide
    pub fn classify(&self, alternatives: &PerformanceTable) -> DomainResult<GdssOutcome> {
        let reference = self.reference_set()?;
        if let Some(shared) = alternatives
            .row_labels()
            .iter()
            .find(|a| reference.rows().contains(a))
        {
            return Err(DomainError::validation(
                "alternatives",
                format!("Alternative '{}' shares its label with a profile", shared),
            ));
        }

        let total_weight: f64 = self.decision_makers.iter().map(|dm| dm.weight).sum();
        let weights: Vec<f64> = self
            .decision_makers
            .iter()
            .map(|dm| dm.weight / total_weight)
            .collect();

        let preferences = self
            .decision_makers
            .iter()
            .map(|dm| dm.promethee.preferences_with_profiles(alternatives, &reference))
            .collect::<DomainResult<Vec<_>>>()?;
        debug!(
            decision_makers = self.decision_makers.len(),
            reference_profiles = reference.row_count(),
            alternatives = alternatives.row_count(),
            "Computed group preferences"
        );

        let mut classifications = Vec::with_capacity(alternatives.row_count());
        let mut votes = Vec::with_capacity(alternatives.row_count());
        for alternative in alternatives.row_labels() {
            let (classification, vote) =
                self.classify_one(alternative, &preferences, &weights)?;
            classifications.push(classification);
            votes.push(vote);
        }

        Ok(GdssOutcome {
            outcome: SortingOutcome::new(classifications),
            votes,
        })
    }

    fn reference_set(&self) -> DomainResult<PerformanceTable> {
        let mut tables = self
            .decision_makers
            .iter()
            .map(|dm| dm.profiles.relabel_rows(|r| dm.reference_label(r)));
        let first = tables
            .next()
            .ok_or_else(|| DomainError::invariant("Group without decision makers"))??;
        tables.try_fold(first, |acc, table| acc.concat(&table?))
    }

    fn classify_one(
        &self,
        alternative: &str,
        preferences: &[ProfilePreferences],
        weights: &[f64],
    ) -> DomainResult<(Classification, GroupVote)> {
        let (general, profile_general) = general_flows(alternative, preferences, weights)?;
        let profile_flow = |dm: &DecisionMaker, position: usize| -> DomainResult<f64> {
            let label = dm.reference_label(dm.profiles.rows().label(position));
            profile_general
                .get(&label)
                .copied()
                .ok_or_else(|| DomainError::missing_label("profile", label))
        };

        let votes = self
            .decision_makers
            .iter()
            .map(|dm| {
                let flows = (0..dm.profiles.row_count())
                    .map(|i| profile_flow(dm, i))
                    .collect::<DomainResult<Vec<_>>>()?;
                let placement = self.comparison.place(general, &flows)?;
                Ok((dm.id.clone(), placement.category))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let (bracket, worse_voters, better_voters) = Self::first_step(&votes)?;
        let record = Classification::pending(alternative).with_bracket(bracket)?;
        debug!(alternative, %bracket, "GDSS first step");

        if bracket.is_precise() {
            let vote = GroupVote {
                alternative: alternative.to_string(),
                votes,
                worse_voters,
                better_voters,
                distances: None,
            };
            return Ok((record, vote));
        }

        let side_distance = |voters: &[String], category: Category, upper: bool| -> DomainResult<f64> {
            let mut total = 0.0;
            for (dm, weight) in self.decision_makers.iter().zip(weights) {
                if !voters.contains(&dm.id) {
                    continue;
                }
                let distance = match self.comparison {
                    ProfileComparison::Central => (general - profile_flow(dm, category.position())?).abs(),
                    _ if upper => profile_flow(dm, category.ordinal())? - general,
                    _ => general - profile_flow(dm, category.position())?,
                };
                total += weight * distance;
            }
            Ok(self.decimal_place.round(total))
        };
        let distances = GroupDistances {
            worse: side_distance(&worse_voters, bracket.worse, false)?,
            better: side_distance(&better_voters, bracket.better, true)?,
        };
        let category = Self::final_step(bracket, distances, self.assign_to_better_class);
        debug!(
            alternative,
            worse = distances.worse,
            better = distances.better,
            %category,
            "GDSS final step"
        );

        let vote = GroupVote {
            alternative: alternative.to_string(),
            votes,
            worse_voters,
            better_voters,
            distances: Some(distances),
        };
        Ok((record.resolve(category)?, vote))
    }

    /// First step: unanimous votes give a precise bracket; otherwise the
    /// lowest and highest votes, with the decision makers behind each end.
    ///
    /// Decision makers voting strictly inside a bracket wider than two
    /// categories are in neither voter set.
    pub fn first_step(votes: &[(String, Category)]) -> DomainResult<(Bracket, Vec<String>, Vec<String>)> {
        let worse = votes
            .iter()
            .map(|(_, c)| *c)
            .min()
            .ok_or_else(|| DomainError::invariant("No votes cast"))?;
        let better = votes.iter().map(|(_, c)| *c).max().unwrap_or(worse);
        let voters = |category: Category| -> Vec<String> {
            votes
                .iter()
                .filter(|(_, c)| *c == category)
                .map(|(id, _)| id.clone())
                .collect()
        };
        Ok((Bracket::new(worse, better)?, voters(worse), voters(better)))
    }

    /// Final step: the smaller weighted distance wins; equality follows the
    /// tie-break flag.
    pub fn final_step(bracket: Bracket, distances: GroupDistances, assign_to_better_class: bool) -> Category {
        if distances.worse < distances.better {
            bracket.worse
        } else if distances.better < distances.worse {
            bracket.better
        } else if assign_to_better_class {
            bracket.better
        } else {
            bracket.worse
        }
    }
}

/// General net flow of the alternative and of every reference profile:
/// `φ_G = Σ_k ŵ_k φ_k`.
fn general_flows(
    alternative: &str,
    preferences: &[ProfilePreferences],
    weights: &[f64],
) -> DomainResult<(f64, HashMap<String, f64>)> {
    let mut general = 0.0;
    let mut profiles: HashMap<String, f64> = HashMap::new();
    for (prefs, weight) in preferences.iter().zip(weights) {
        let reference = FlowCalculator::reference_flows(prefs, alternative)?;
        general += weight * reference.alternative.net;
        for (label, flow) in reference.profiles.iter() {
            *profiles.entry(label.to_string()).or_insert(0.0) += weight * flow.net;
        }
    }
    Ok((general, profiles))
}
