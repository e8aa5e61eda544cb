//! Category profile preconditions.

use tracing::debug;

use crate::domain::foundation::{DomainError, DomainResult, PerformanceTable};
use crate::domain::preference::{normalize_directions, CriteriaSet};

/// Checks that, after direction normalisation, every profile plus the
/// criterion's margin stays strictly below the next profile on every
/// criterion. Profiles are ordered worst to best.
///
/// # Edge Cases
/// - Fewer than two profiles: nothing to compare, always passes
/// - Zero margins: plain strict dominance
pub fn check_dominance(
    criteria: &CriteriaSet,
    profiles: &PerformanceTable,
    margins: &[f64],
) -> DomainResult<()> {
    if margins.len() != criteria.len() {
        return Err(DomainError::dimension_mismatch("dominance margins", criteria.len(), margins.len()));
    }
    let normalized = normalize_directions(profiles, criteria)?;
    for i in 1..normalized.row_count() {
        for (k, margin) in margins.iter().enumerate() {
            if normalized.value_at(i - 1, k) + margin >= normalized.value_at(i, k) {
                return Err(DomainError::dominance(
                    normalized.rows().label(i - 1),
                    normalized.rows().label(i),
                    criteria.at(k).id.clone(),
                ));
            }
        }
    }
    debug!(profiles = normalized.row_count(), "Profile dominance holds");
    Ok(())
}

/// Strict dominance without margins.
pub fn check_strict_dominance(criteria: &CriteriaSet, profiles: &PerformanceTable) -> DomainResult<()> {
    check_dominance(criteria, profiles, &vec![0.0; criteria.len()])
}

/// Cross-owner dominance: profile `i` of every owner must be strictly worse,
/// on every criterion, than profile `i + 1` of every owner (itself included).
///
/// All owners must supply the same number of profiles.
pub fn check_group_dominance(
    criteria: &CriteriaSet,
    profile_sets: &[(&str, &PerformanceTable)],
) -> DomainResult<()> {
    let normalized = profile_sets
        .iter()
        .map(|(owner, table)| Ok((*owner, normalize_directions(table, criteria)?)))
        .collect::<DomainResult<Vec<_>>>()?;

    let count = normalized.first().map(|(_, t)| t.row_count()).unwrap_or(0);
    for (owner, table) in &normalized {
        if table.row_count() != count {
            return Err(DomainError::dimension_mismatch(
                format!("profiles of '{}'", owner),
                count,
                table.row_count(),
            ));
        }
    }

    for i in 1..count {
        for (worse_owner, worse) in &normalized {
            for (better_owner, better) in &normalized {
                for k in 0..criteria.len() {
                    if worse.value_at(i - 1, k) >= better.value_at(i, k) {
                        return Err(DomainError::dominance(
                            format!("{}/{}", worse_owner, worse.rows().label(i - 1)),
                            format!("{}/{}", better_owner, better.rows().label(i)),
                            criteria.at(k).id.clone(),
                        ));
                    }
                }
            }
        }
    }
    debug!(owners = normalized.len(), profiles = count, "Group profile dominance holds");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::preference::{Criterion, Direction, PreferenceFunction};

    fn criteria() -> CriteriaSet {
        CriteriaSet::new(vec![
            Criterion::new("g1", Direction::Max, PreferenceFunction::v_shape(2.0).unwrap(), 1.0).unwrap(),
            Criterion::new("g2", Direction::Min, PreferenceFunction::usual(), 1.0).unwrap(),
        ])
        .unwrap()
    }

    fn profiles(rows: Vec<(&str, Vec<f64>)>) -> PerformanceTable {
        PerformanceTable::from_rows(vec!["g1", "g2"], rows).unwrap()
    }

    #[test]
    fn increasing_profiles_pass() {
        // g2 is minimised, so it must decrease
        let table = profiles(vec![("r1", vec![1.0, 9.0]), ("r2", vec![5.0, 4.0])]);
        assert!(check_strict_dominance(&criteria(), &table).is_ok());
    }

    #[test]
    fn equal_values_violate_strict_dominance() {
        let table = profiles(vec![("r1", vec![1.0, 9.0]), ("r2", vec![5.0, 9.0])]);
        let err = check_strict_dominance(&criteria(), &table).unwrap_err();
        assert_eq!(err.code, ErrorCode::DominanceViolation);
        assert_eq!(err.details.get("criterion"), Some(&"g2".to_string()));
    }

    #[test]
    fn margins_tighten_the_check() {
        let table = profiles(vec![("r1", vec![1.0, 9.0]), ("r2", vec![3.0, 4.0])]);
        assert!(check_strict_dominance(&criteria(), &table).is_ok());
        let err = check_dominance(&criteria(), &table, &criteria().preference_thresholds()).unwrap_err();
        assert_eq!(err.details.get("worse_profile"), Some(&"r1".to_string()));
        assert_eq!(err.details.get("criterion"), Some(&"g1".to_string()));
    }

    #[test]
    fn group_dominance_compares_across_owners() {
        let dm1 = profiles(vec![("r1", vec![1.0, 9.0]), ("r2", vec![5.0, 4.0])]);
        let dm2 = profiles(vec![("r1", vec![2.0, 8.0]), ("r2", vec![6.0, 3.0])]);
        assert!(check_group_dominance(&criteria(), &[("dm1", &dm1), ("dm2", &dm2)]).is_ok());

        // dm2's first profile now reaches dm1's second on g1
        let dm2 = profiles(vec![("r1", vec![5.0, 8.0]), ("r2", vec![6.0, 3.0])]);
        let err = check_group_dominance(&criteria(), &[("dm1", &dm1), ("dm2", &dm2)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::DominanceViolation);
        assert_eq!(err.details.get("worse_profile"), Some(&"dm2/r1".to_string()));
        assert_eq!(err.details.get("better_profile"), Some(&"dm1/r2".to_string()));
    }

    #[test]
    fn group_dominance_needs_equal_profile_counts() {
        let dm1 = profiles(vec![("r1", vec![1.0, 9.0]), ("r2", vec![5.0, 4.0])]);
        let dm2 = profiles(vec![("r1", vec![2.0, 8.0])]);
        let err = check_group_dominance(&criteria(), &[("dm1", &dm1), ("dm2", &dm2)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::DimensionMismatch);
    }
}
