//! Criterion-pair interaction declarations.

use serde::{Deserialize, Serialize};

use super::CriteriaSet;
use crate::domain::foundation::{DomainError, DomainResult, ValidationError};

/// Kind of effect two criteria have on each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Joint preference on both criteria counts for more than the sum.
    Strengthening,
    /// Joint preference on both criteria counts for less than the sum.
    Weakening,
    /// Preference on the first criterion is offset by the opposite
    /// preference on the second.
    Antagonistic,
}

impl InteractionKind {
    /// Sign applied to the (positive) coefficient.
    pub fn sign(&self) -> f64 {
        match self {
            InteractionKind::Strengthening => 1.0,
            InteractionKind::Weakening | InteractionKind::Antagonistic => -1.0,
        }
    }
}

/// How two partial preferences are combined into one interaction term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionFunction {
    #[default]
    Minimum,
    Multiplication,
}

impl InteractionFunction {
    pub fn apply(&self, x: f64, y: f64) -> f64 {
        match self {
            InteractionFunction::Minimum => x.min(y),
            InteractionFunction::Multiplication => x * y,
        }
    }
}

/// Declared interaction between two criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub first: String,
    pub second: String,
    pub kind: InteractionKind,
    /// Magnitude of the effect; the sign comes from `kind`.
    pub coefficient: f64,
}

impl Interaction {
    pub fn new(
        first: impl Into<String>,
        second: impl Into<String>,
        kind: InteractionKind,
        coefficient: f64,
    ) -> Result<Self, ValidationError> {
        let first = first.into();
        let second = second.into();
        if first == second {
            return Err(ValidationError::invalid_format(
                "interaction",
                format!("criterion '{}' cannot interact with itself", first),
            ));
        }
        if !coefficient.is_finite() || coefficient <= 0.0 {
            return Err(ValidationError::out_of_range(
                format!("interaction {}/{}", first, second),
                f64::MIN_POSITIVE,
                f64::MAX,
                coefficient,
            ));
        }
        Ok(Self {
            first,
            second,
            kind,
            coefficient,
        })
    }
}

/// Interaction resolved to criterion positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResolvedInteraction {
    pub first: usize,
    pub second: usize,
    pub kind: InteractionKind,
    pub coefficient: f64,
}

/// Checks every interaction against the criteria set.
pub(crate) fn resolve_interactions(
    criteria: &CriteriaSet,
    interactions: &[Interaction],
) -> DomainResult<Vec<ResolvedInteraction>> {
    interactions
        .iter()
        .map(|i| {
            let first = criteria.index().require("criterion", &i.first)?;
            let second = criteria.index().require("criterion", &i.second)?;
            if first == second {
                return Err(DomainError::validation("interaction", "criterion cannot interact with itself"));
            }
            Ok(ResolvedInteraction {
                first,
                second,
                kind: i.kind,
                coefficient: i.coefficient,
            })
        })
        .collect()
}
