//! Outranking Flow Calculator - row and column means of aggregated preferences.

use serde::Serialize;
use tracing::debug;

use crate::domain::foundation::{DomainError, DomainResult, LabelIndex, PreferenceMatrix};
use crate::domain::preference::ProfilePreferences;

/// Positive, negative and net flow of one alternative or profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Flow {
    pub positive: f64,
    pub negative: f64,
    pub net: f64,
}

impl Flow {
    pub fn new(positive: f64, negative: f64) -> Self {
        Self {
            positive,
            negative,
            net: positive - negative,
        }
    }
}

/// Flows keyed by label, in the order of the underlying matrix rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutrankingFlows {
    labels: LabelIndex,
    flows: Vec<Flow>,
}

impl OutrankingFlows {
    pub fn labels(&self) -> &[String] {
        self.labels.labels()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<Flow> {
        self.labels.position(label).map(|i| self.flows[i])
    }

    /// Flow by label, failing with `MissingLabel`.
    pub fn require(&self, label: &str) -> DomainResult<Flow> {
        let i = self.labels.require("flow", label)?;
        Ok(self.flows[i])
    }

    pub fn at(&self, position: usize) -> Flow {
        self.flows[position]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Flow)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.flows.iter().copied())
    }

    pub fn net(&self, label: &str) -> Option<f64> {
        self.get(label).map(|f| f.net)
    }
}

/// Flows of the alternative and of every profile inside `R ∪ {a}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceFlows {
    pub alternative: Flow,
    pub profiles: OutrankingFlows,
}

/// Position of an alternative in the PROMETHEE II complete ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAlternative {
    pub label: String,
    pub net_flow: f64,
    /// 1-based; equal net flows share a rank.
    pub rank: usize,
}

/// Reduces preference matrices to outranking flows.
pub struct FlowCalculator;

impl FlowCalculator {
    /// Plain flows of a square matrix: `φ+(i) = mean_{j≠i} Π(i,j)`,
    /// `φ−(i) = mean_{j≠i} Π(j,i)`.
    ///
    /// # Edge Cases
    /// - Single row: no other row to compare with, all flows are 0
    pub fn flows(preferences: &PreferenceMatrix) -> DomainResult<OutrankingFlows> {
        if !preferences.is_square() {
            return Err(DomainError::validation(
                "preferences",
                "Plain flows need the same labels on rows and columns",
            ));
        }
        let n = preferences.rows().len();
        let others = n.saturating_sub(1).max(1) as f64;
        let flows = (0..n)
            .map(|i| {
                Flow::new(
                    preferences.row_values(i).sum::<f64>() / others,
                    preferences.column_values(i).sum::<f64>() / others,
                )
            })
            .collect();
        debug!(rows = n, "Computed outranking flows");
        Ok(OutrankingFlows {
            labels: preferences.rows().clone(),
            flows,
        })
    }

    /// Profile-based flows of alternatives: `φ+(a) = mean_r Π(a,r)` from the
    /// alternatives-vs-profiles matrix and `φ−(a) = mean_r Π(r,a)` from the
    /// profiles-vs-alternatives matrix, matched by label.
    pub fn profile_based(
        alternatives_vs_profiles: &PreferenceMatrix,
        profiles_vs_alternatives: &PreferenceMatrix,
    ) -> DomainResult<OutrankingFlows> {
        let alternatives = alternatives_vs_profiles.rows();
        let profiles = alternatives_vs_profiles.columns();
        if profiles.is_empty() {
            return Err(DomainError::validation("profiles", "At least one profile is required"));
        }
        let count = profiles.len() as f64;

        let flows = alternatives
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let column = profiles_vs_alternatives.columns().require("alternative", a)?;
                let negative = profiles
                    .iter()
                    .map(|r| {
                        let row = profiles_vs_alternatives.rows().require("profile", r)?;
                        Ok(profiles_vs_alternatives.at(row, column).unwrap_or(0.0))
                    })
                    .sum::<DomainResult<f64>>()?;
                let positive: f64 = alternatives_vs_profiles.row_values(i).sum();
                Ok(Flow::new(positive / count, negative / count))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(OutrankingFlows {
            labels: alternatives.clone(),
            flows,
        })
    }

    /// Flows of `alternative` and of every profile in the reference set
    /// `R ∪ {a}`: for profile `r_h`,
    /// `φ+(r_h) = (Σ_{r≠r_h} Π(r_h,r) + Π(r_h,a)) / |R|` and symmetrically for
    /// `φ−`; the alternative's flows are its profile-based flows.
    pub fn reference_flows(
        preferences: &ProfilePreferences,
        alternative: &str,
    ) -> DomainResult<ReferenceFlows> {
        let a_vs_r = &preferences.alternatives_vs_profiles;
        let r_vs_a = &preferences.profiles_vs_alternatives;
        let r_vs_r = &preferences.profiles_vs_profiles;

        let profiles = r_vs_r.rows();
        if profiles.is_empty() {
            return Err(DomainError::validation("profiles", "At least one profile is required"));
        }
        let count = profiles.len() as f64;
        let a_row = a_vs_r.rows().require("alternative", alternative)?;
        let a_column = r_vs_a.columns().require("alternative", alternative)?;

        let mut alternative_positive = 0.0;
        let mut alternative_negative = 0.0;
        let mut flows = Vec::with_capacity(profiles.len());
        for (h, label) in profiles.iter().enumerate() {
            let against_a = a_vs_r.at(a_row, a_vs_r.columns().require("profile", label)?);
            let over_a = r_vs_a.at(r_vs_a.rows().require("profile", label)?, a_column);
            let against_a = against_a.unwrap_or(0.0);
            let over_a = over_a.unwrap_or(0.0);
            alternative_positive += against_a;
            alternative_negative += over_a;

            let positive = r_vs_r.row_values(h).sum::<f64>() + over_a;
            let negative = r_vs_r.column_values(h).sum::<f64>() + against_a;
            flows.push(Flow::new(positive / count, negative / count));
        }

        Ok(ReferenceFlows {
            alternative: Flow::new(alternative_positive / count, alternative_negative / count),
            profiles: OutrankingFlows {
                labels: profiles.clone(),
                flows,
            },
        })
    }

    /// PROMETHEE II complete ranking by descending net flow; ties keep the
    /// input order and share a rank.
    pub fn complete_ranking(flows: &OutrankingFlows) -> Vec<RankedAlternative> {
        let mut order: Vec<usize> = (0..flows.len()).collect();
        order.sort_by(|&a, &b| flows.at(b).net.total_cmp(&flows.at(a).net));

        let mut ranked: Vec<RankedAlternative> = Vec::with_capacity(order.len());
        for (position, &i) in order.iter().enumerate() {
            let net_flow = flows.at(i).net;
            let rank = match ranked.last() {
                Some(previous) if previous.net_flow == net_flow => previous.rank,
                _ => position + 1,
            };
            ranked.push(RankedAlternative {
                label: flows.labels.label(i).to_string(),
                net_flow,
                rank,
            });
        }
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn square() -> PreferenceMatrix {
        PreferenceMatrix::from_rows(
            labels(&["a", "b", "c"]),
            labels(&["a", "b", "c"]),
            vec![
                vec![0.0, 0.6, 0.8],
                vec![0.2, 0.0, 0.4],
                vec![0.0, 0.4, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn plain_flows_are_row_and_column_means() {
        let flows = FlowCalculator::flows(&square()).unwrap();
        let a = flows.get("a").unwrap();
        assert!((a.positive - 0.7).abs() < 1e-12);
        assert!((a.negative - 0.1).abs() < 1e-12);
        assert!((a.net - 0.6).abs() < 1e-12);
        let c = flows.get("c").unwrap();
        assert!((c.positive - 0.2).abs() < 1e-12);
        assert!((c.negative - 0.6).abs() < 1e-12);
    }

    #[test]
    fn plain_flows_need_square_matrix() {
        let m = PreferenceMatrix::from_rows(labels(&["a"]), labels(&["r1"]), vec![vec![1.0]]).unwrap();
        assert!(FlowCalculator::flows(&m).is_err());
    }

    #[test]
    fn single_alternative_has_zero_flows() {
        let m = PreferenceMatrix::from_rows(labels(&["a"]), labels(&["a"]), vec![vec![0.0]]).unwrap();
        let flows = FlowCalculator::flows(&m).unwrap();
        assert_eq!(flows.get("a"), Some(Flow::default()));
    }

    #[test]
    fn profile_based_flows_use_both_matrices() {
        let a_vs_r = PreferenceMatrix::from_rows(
            labels(&["a1", "a2"]),
            labels(&["r1", "r2"]),
            vec![vec![1.0, 0.5], vec![0.0, 0.0]],
        )
        .unwrap();
        // columns deliberately in another order
        let r_vs_a = PreferenceMatrix::from_rows(
            labels(&["r2", "r1"]),
            labels(&["a2", "a1"]),
            vec![vec![1.0, 0.5], vec![1.0, 0.0]],
        )
        .unwrap();
        let flows = FlowCalculator::profile_based(&a_vs_r, &r_vs_a).unwrap();
        assert_eq!(flows.get("a1"), Some(Flow::new(0.75, 0.25)));
        assert_eq!(flows.get("a2"), Some(Flow::new(0.0, 1.0)));
    }

    #[test]
    fn reference_flows_include_the_alternative() {
        let prefs = ProfilePreferences {
            alternatives_vs_profiles: PreferenceMatrix::from_rows(
                labels(&["a"]),
                labels(&["r1", "r2"]),
                vec![vec![1.0, 0.0]],
            )
            .unwrap(),
            profiles_vs_alternatives: PreferenceMatrix::from_rows(
                labels(&["r1", "r2"]),
                labels(&["a"]),
                vec![vec![0.0], vec![1.0]],
            )
            .unwrap(),
            profiles_vs_profiles: PreferenceMatrix::from_rows(
                labels(&["r1", "r2"]),
                labels(&["r1", "r2"]),
                vec![vec![0.0, 0.0], vec![1.0, 0.0]],
            )
            .unwrap(),
        };
        let reference = FlowCalculator::reference_flows(&prefs, "a").unwrap();
        assert_eq!(reference.alternative, Flow::new(0.5, 0.5));
        assert_eq!(reference.profiles.get("r1"), Some(Flow::new(0.0, 1.0)));
        assert_eq!(reference.profiles.get("r2"), Some(Flow::new(1.0, 0.0)));
        assert!(FlowCalculator::reference_flows(&prefs, "zz").is_err());
    }

    #[test]
    fn complete_ranking_orders_by_net_flow() {
        let m = PreferenceMatrix::from_rows(
            labels(&["a", "b", "c"]),
            labels(&["a", "b", "c"]),
            vec![
                vec![0.0, 0.5, 0.5],
                vec![0.5, 0.0, 0.5],
                vec![1.0, 1.0, 0.0],
            ],
        )
        .unwrap();
        let ranking = FlowCalculator::complete_ranking(&FlowCalculator::flows(&m).unwrap());
        let order: Vec<_> = ranking.iter().map(|r| (r.label.as_str(), r.rank)).collect();
        assert_eq!(order, vec![("c", 1), ("a", 2), ("b", 2)]);
    }
}
