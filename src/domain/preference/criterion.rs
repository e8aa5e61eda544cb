//! Criterion definitions and the validated criteria set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{FunctionKind, PreferenceFunction, Thresholds};
use crate::domain::foundation::{DomainError, DomainResult, LabelIndex, ValidationError};

/// Optimisation direction of a criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Max,
    Min,
}

impl Direction {
    /// Maps a raw performance so that higher is always better.
    pub fn normalize(&self, value: f64) -> f64 {
        match self {
            Direction::Max => value,
            Direction::Min => -value,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Max => write!(f, "max"),
            Direction::Min => write!(f, "min"),
        }
    }
}

/// Reinforced preference extension: deviations strictly above `threshold`
/// yield `factor` instead of the transfer-function output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reinforcement {
    pub threshold: f64,
    pub factor: f64,
}

/// One evaluation axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub direction: Direction,
    pub function: PreferenceFunction,
    pub weight: f64,
    pub reinforcement: Option<Reinforcement>,
    pub veto_threshold: Option<f64>,
}

impl Criterion {
    /// Creates a criterion, rejecting empty ids and non-positive weights.
    pub fn new(
        id: impl Into<String>,
        direction: Direction,
        function: PreferenceFunction,
        weight: f64,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("criterion id"));
        }
        check_weight(&id, weight)?;
        Ok(Self {
            id,
            direction,
            function,
            weight,
            reinforcement: None,
            veto_threshold: None,
        })
    }

    /// Creates a criterion from a function selector and raw thresholds.
    pub fn from_selector(
        id: impl Into<String>,
        direction: Direction,
        kind: FunctionKind,
        thresholds: &Thresholds,
        weight: f64,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let function = PreferenceFunction::build(kind, thresholds, &id)?;
        Self::new(id, direction, function, weight)
    }

    /// Adds a reinforced preference threshold and factor.
    ///
    /// The factor must exceed 1 and the threshold may not undercut the
    /// preference threshold of the transfer function.
    pub fn with_reinforcement(mut self, threshold: f64, factor: f64) -> Result<Self, ValidationError> {
        if !factor.is_finite() || factor <= 1.0 {
            return Err(ValidationError::out_of_range(
                format!("{}.reinforcement_factor", self.id),
                1.0,
                f64::MAX,
                factor,
            ));
        }
        let p = self.function.preference_threshold();
        if !threshold.is_finite() || threshold < p {
            return Err(ValidationError::out_of_range(
                format!("{}.reinforced_threshold", self.id),
                p,
                f64::MAX,
                threshold,
            ));
        }
        self.reinforcement = Some(Reinforcement { threshold, factor });
        Ok(self)
    }

    /// Adds a veto threshold, which may not undercut the preference threshold.
    pub fn with_veto(mut self, threshold: f64) -> Result<Self, ValidationError> {
        let p = self.function.preference_threshold();
        if !threshold.is_finite() || threshold < p {
            return Err(ValidationError::out_of_range(
                format!("{}.veto_threshold", self.id),
                p,
                f64::MAX,
                threshold,
            ));
        }
        self.veto_threshold = Some(threshold);
        Ok(self)
    }
}

fn check_weight(id: &str, weight: f64) -> Result<(), ValidationError> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(ValidationError::non_positive_weight(id, weight));
    }
    Ok(())
}

/// Ordered, validated set of criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriteriaSet {
    index: LabelIndex,
    criteria: Vec<Criterion>,
}

impl CriteriaSet {
    /// Builds a set, rejecting empty input and duplicate ids.
    pub fn new(criteria: Vec<Criterion>) -> DomainResult<Self> {
        if criteria.is_empty() {
            return Err(ValidationError::empty_field("criteria").into());
        }
        for criterion in &criteria {
            check_weight(&criterion.id, criterion.weight)?;
        }
        let index = LabelIndex::new(
            "criterion",
            criteria.iter().map(|c| c.id.clone()).collect(),
        )?;
        Ok(Self { index, criteria })
    }

    /// Replaces every weight with the one supplied by an external weighting
    /// procedure. The mapping must cover exactly the criteria of this set.
    pub fn with_weights(&self, weights: &HashMap<String, f64>) -> DomainResult<Self> {
        if weights.len() != self.criteria.len() {
            return Err(DomainError::dimension_mismatch(
                "weights",
                self.criteria.len(),
                weights.len(),
            ));
        }
        let criteria = self
            .criteria
            .iter()
            .map(|c| {
                let weight = *weights
                    .get(&c.id)
                    .ok_or_else(|| DomainError::missing_label("criterion", &c.id))?;
                check_weight(&c.id, weight)?;
                Ok(Criterion { weight, ..c.clone() })
            })
            .collect::<DomainResult<Vec<_>>>()?;
        Self::new(criteria)
    }

    pub fn index(&self) -> &LabelIndex {
        &self.index
    }

    pub fn ids(&self) -> &[String] {
        self.index.labels()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Criterion> {
        self.index.position(id).map(|k| &self.criteria[k])
    }

    pub fn at(&self, position: usize) -> &Criterion {
        &self.criteria[position]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }

    /// Preference thresholds in criterion order.
    pub fn preference_thresholds(&self) -> Vec<f64> {
        self.criteria
            .iter()
            .map(|c| c.function.preference_threshold())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn criterion(id: &str, weight: f64) -> Criterion {
        Criterion::new(id, Direction::Max, PreferenceFunction::usual(), weight).unwrap()
    }

    #[test]
    fn direction_min_flips_sign() {
        assert_eq!(Direction::Min.normalize(3.0), -3.0);
        assert_eq!(Direction::Max.normalize(3.0), 3.0);
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        let err = Criterion::new("g1", Direction::Max, PreferenceFunction::usual(), 0.0).unwrap_err();
        assert_eq!(err, ValidationError::non_positive_weight("g1", 0.0));
    }

    #[test]
    fn from_selector_builds_function() {
        let c = Criterion::from_selector(
            "price",
            Direction::Min,
            FunctionKind::VShapeIndifference,
            &Thresholds::indifference_preference(1.0, 4.0),
            2.0,
        )
        .unwrap();
        assert_eq!(c.function, PreferenceFunction::VShapeIndifference { q: 1.0, p: 4.0 });
        assert_eq!(c.direction, Direction::Min);
    }

    #[test]
    fn reinforcement_requires_factor_above_one() {
        let c = Criterion::new("g1", Direction::Max, PreferenceFunction::v_shape(2.0).unwrap(), 1.0).unwrap();
        assert!(c.clone().with_reinforcement(5.0, 1.0).is_err());
        assert!(c.clone().with_reinforcement(1.0, 1.5).is_err());
        let reinforced = c.with_reinforcement(5.0, 1.5).unwrap();
        assert_eq!(reinforced.reinforcement, Some(Reinforcement { threshold: 5.0, factor: 1.5 }));
    }

    #[test]
    fn veto_below_preference_threshold_is_rejected() {
        let c = Criterion::new("g1", Direction::Max, PreferenceFunction::v_shape(2.0).unwrap(), 1.0).unwrap();
        assert!(c.clone().with_veto(1.0).is_err());
        assert_eq!(c.with_veto(6.0).unwrap().veto_threshold, Some(6.0));
    }

    #[test]
    fn criteria_set_rejects_duplicates_and_empty() {
        assert!(CriteriaSet::new(vec![]).is_err());
        assert!(CriteriaSet::new(vec![criterion("g1", 1.0), criterion("g1", 2.0)]).is_err());
    }

    #[test]
    fn with_weights_replaces_by_id() {
        let set = CriteriaSet::new(vec![criterion("g1", 1.0), criterion("g2", 1.0)]).unwrap();
        let weights: HashMap<String, f64> =
            [("g2".to_string(), 3.0), ("g1".to_string(), 0.5)].into_iter().collect();
        let reweighted = set.with_weights(&weights).unwrap();
        assert_eq!(reweighted.get("g1").unwrap().weight, 0.5);
        assert_eq!(reweighted.get("g2").unwrap().weight, 3.0);
        assert_eq!(reweighted.total_weight(), 3.5);
    }

    #[test]
    fn with_weights_checks_coverage_and_sign() {
        let set = CriteriaSet::new(vec![criterion("g1", 1.0), criterion("g2", 1.0)]).unwrap();

        let short: HashMap<String, f64> = [("g1".to_string(), 1.0)].into_iter().collect();
        assert_eq!(set.with_weights(&short).unwrap_err().code, ErrorCode::DimensionMismatch);

        let wrong: HashMap<String, f64> =
            [("g1".to_string(), 1.0), ("g3".to_string(), 1.0)].into_iter().collect();
        assert_eq!(set.with_weights(&wrong).unwrap_err().code, ErrorCode::MissingLabel);

        let negative: HashMap<String, f64> =
            [("g1".to_string(), 1.0), ("g2".to_string(), -1.0)].into_iter().collect();
        assert_eq!(set.with_weights(&negative).unwrap_err().code, ErrorCode::NonPositiveWeight);
    }
}
