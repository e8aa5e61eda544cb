//! Net Flow Score - ranks alternatives by a score reduced from the
//! aggregated preference matrix, re-scoring tied groups on their own.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::domain::foundation::{DecimalPlace, DomainError, DomainResult, PreferenceMatrix};

/// Reduction applied to the compared values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFunction {
    Max,
    Min,
    #[default]
    Sum,
}

/// Which preferences are reduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDirection {
    /// `f(Π(a,b))`
    InFavor,
    /// `−f(Π(b,a))`
    Against,
    /// `f(Π(a,b) − Π(b,a))`
    #[default]
    Difference,
}

impl fmt::Display for ScoreDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreDirection::InFavor => write!(f, "in_favor"),
            ScoreDirection::Against => write!(f, "against"),
            ScoreDirection::Difference => write!(f, "difference"),
        }
    }
}

/// One alternative in a net flow score ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAlternative {
    pub label: String,
    /// Score over the full set of alternatives.
    pub score: f64,
    /// 1-based; alternatives whose tie could not be broken share a rank.
    pub rank: usize,
}

/// Net flow score ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetFlowScorer {
    function: ScoreFunction,
    direction: ScoreDirection,
    decimal_place: DecimalPlace,
}

impl NetFlowScorer {
    pub fn new(function: ScoreFunction, direction: ScoreDirection) -> Self {
        Self {
            function,
            direction,
            decimal_place: DecimalPlace::default(),
        }
    }

    /// Precision used when comparing scores for ties.
    pub fn with_decimal_place(mut self, decimal_place: DecimalPlace) -> Self {
        self.decimal_place = decimal_place;
        self
    }

    /// Scores of every alternative over the full matrix, in row order.
    pub fn scores(&self, preferences: &PreferenceMatrix) -> DomainResult<Vec<(String, f64)>> {
        check_square(preferences)?;
        let all: Vec<usize> = (0..preferences.rows().len()).collect();
        Ok(all
            .iter()
            .map(|&i| (preferences.rows().label(i).to_string(), self.score(preferences, i, &all)))
            .collect())
    }

    /// Ranks alternatives by descending score.
    ///
    /// # Algorithm
    /// Alternatives sharing a score are re-scored on the sub-matrix of the
    /// tied group only, recursively, until every tie is broken or a group
    /// re-scores to the same single tie.
    pub fn rank(&self, preferences: &PreferenceMatrix) -> DomainResult<Vec<ScoredAlternative>> {
        check_square(preferences)?;
        let all: Vec<usize> = (0..preferences.rows().len()).collect();
        let groups = self.order(preferences, all.clone());

        let mut ranked = Vec::with_capacity(all.len());
        let mut position = 1;
        for group in groups {
            for &i in &group {
                ranked.push(ScoredAlternative {
                    label: preferences.rows().label(i).to_string(),
                    score: self.score(preferences, i, &all),
                    rank: position,
                });
            }
            position += group.len();
        }
        debug!(
            alternatives = ranked.len(),
            function = ?self.function,
            direction = %self.direction,
            "Ranked by net flow score"
        );
        Ok(ranked)
    }

    /// Groups of row positions in rank order; a group holds more than one
    /// position only when its tie is unresolved.
    fn order(&self, preferences: &PreferenceMatrix, subset: Vec<usize>) -> Vec<Vec<usize>> {
        let mut scored: Vec<(usize, f64)> = subset
            .iter()
            .map(|&i| (i, self.score(preferences, i, &subset)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut current_score = None;
        for (i, score) in scored {
            if current_score != Some(score) && !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            current_score = Some(score);
            current.push(i);
        }
        if !current.is_empty() {
            groups.push(current);
        }

        groups
            .into_iter()
            .flat_map(|group| {
                if group.len() > 1 && group.len() < subset.len() {
                    self.order(preferences, group)
                } else {
                    vec![group]
                }
            })
            .collect()
    }

    fn score(&self, preferences: &PreferenceMatrix, i: usize, subset: &[usize]) -> f64 {
        let values = subset.iter().filter(|&&j| j != i).map(|&j| {
            let forward = preferences.at(i, j).unwrap_or(0.0);
            let backward = preferences.at(j, i).unwrap_or(0.0);
            match self.direction {
                ScoreDirection::InFavor => forward,
                ScoreDirection::Against => backward,
                ScoreDirection::Difference => forward - backward,
            }
        });
        let reduced = match self.function {
            ScoreFunction::Max => values.reduce(f64::max).unwrap_or(0.0),
            ScoreFunction::Min => values.reduce(f64::min).unwrap_or(0.0),
            ScoreFunction::Sum => values.sum(),
        };
        let signed = match self.direction {
            ScoreDirection::Against => -reduced,
            _ => reduced,
        };
        self.decimal_place.round(signed)
    }
}

fn check_square(preferences: &PreferenceMatrix) -> DomainResult<()> {
    if !preferences.is_square() {
        return Err(DomainError::validation(
            "preferences",
            "Net flow score needs the same labels on rows and columns",
        ));
    }
    Ok(())
}
