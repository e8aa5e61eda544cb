//! Placement of a flow among ordered profile flows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::Category;
use crate::domain::foundation::{DomainError, DomainResult, ValidationError};

/// Role the profiles play when delimiting categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileComparison {
    /// `m + 1` limits; flows outside the outermost limits are reported.
    Limiting,
    /// `m + 1` boundaries; the edge categories absorb the extremes.
    #[default]
    Boundary,
    /// `m` central profiles; midpoints between them delimit categories.
    Central,
}

impl ProfileComparison {
    /// Number of categories delimited by `profiles` profiles.
    pub fn category_count(&self, profiles: usize) -> DomainResult<usize> {
        let minimum = match self {
            ProfileComparison::Limiting | ProfileComparison::Boundary => 2,
            ProfileComparison::Central => 1,
        };
        if profiles < minimum {
            return Err(DomainError::validation(
                "profiles",
                format!("{} profiles need at least {} rows, got {}", self, minimum, profiles),
            ));
        }
        Ok(match self {
            ProfileComparison::Limiting | ProfileComparison::Boundary => profiles - 1,
            ProfileComparison::Central => profiles,
        })
    }

    /// Places a "higher is better" flow among profile flows ordered worst to
    /// best.
    ///
    /// # Rules
    /// - Boundary: first `h ≥ 1` with `φ(r_h) ≥ φ(a)` gives `C_h`, else `C_m`
    /// - Limiting: as Boundary inside `[φ(r_0), φ(r_m)]`; outside, the edge
    ///   category flagged `UnderLimit` / `OverLimit`
    /// - Central: first midpoint `(φ(c_h) + φ(c_{h+1})) / 2 ≥ φ(a)` gives
    ///   `C_h`, else `C_m`
    ///
    /// # Edge Cases
    /// - Decreasing profile flows: `InvariantViolation`
    pub fn place(&self, flow: f64, profile_flows: &[f64]) -> DomainResult<Placement> {
        let categories = self.category_count(profile_flows.len())?;
        if let Some(w) = profile_flows.windows(2).position(|w| w[0] > w[1]) {
            return Err(DomainError::invariant(format!(
                "Profile flows decrease between positions {} and {}",
                w,
                w + 1
            )));
        }

        let placement = match self {
            ProfileComparison::Boundary => Placement::inside(boundary_category(flow, profile_flows, categories)),
            ProfileComparison::Limiting => {
                let lowest = profile_flows[0];
                let highest = profile_flows[categories];
                if flow < lowest {
                    Placement::excess(Category::FIRST, LimitExcess::UnderLimit)
                } else if flow > highest {
                    Placement::excess(Category::from_position(categories - 1), LimitExcess::OverLimit)
                } else {
                    Placement::inside(boundary_category(flow, profile_flows, categories))
                }
            }
            ProfileComparison::Central => {
                let position = profile_flows
                    .windows(2)
                    .position(|w| flow <= (w[0] + w[1]) / 2.0)
                    .unwrap_or(categories - 1);
                Placement::inside(Category::from_position(position))
            }
        };
        if let Some(excess) = placement.excess {
            warn!(flow, %excess, category = %placement.category, "Flow outside the limiting profiles");
        }
        Ok(placement)
    }

    /// Places a "lower is better" flow (a negative flow) by negating it and
    /// the profile flows.
    pub fn place_negative(&self, flow: f64, profile_flows: &[f64]) -> DomainResult<Placement> {
        let negated: Vec<f64> = profile_flows.iter().map(|f| -f).collect();
        self.place(-flow, &negated)
    }
}

fn boundary_category(flow: f64, profile_flows: &[f64], categories: usize) -> Category {
    let h = (1..=categories)
        .find(|&h| profile_flows[h] >= flow)
        .unwrap_or(categories);
    Category::from_position(h - 1)
}

impl fmt::Display for ProfileComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProfileComparison::Limiting => "limiting",
            ProfileComparison::Boundary => "boundary",
            ProfileComparison::Central => "central",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ProfileComparison {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "limiting" => Ok(ProfileComparison::Limiting),
            "boundary" => Ok(ProfileComparison::Boundary),
            "central" => Ok(ProfileComparison::Central),
            other => Err(ValidationError::invalid_format(
                "comparison_with_profiles",
                format!("expected limiting, boundary or central, got '{}'", other),
            )),
        }
    }
}

/// Side on which a flow left the limiting profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitExcess {
    UnderLimit,
    OverLimit,
}

impl fmt::Display for LimitExcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitExcess::UnderLimit => write!(f, "under_limit"),
            LimitExcess::OverLimit => write!(f, "over_limit"),
        }
    }
}

/// Category chosen for one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub category: Category,
    pub excess: Option<LimitExcess>,
}

impl Placement {
    fn inside(category: Category) -> Self {
        Self {
            category,
            excess: None,
        }
    }

    fn excess(category: Category, excess: LimitExcess) -> Self {
        Self {
            category,
            excess: Some(excess),
        }
    }
}
