//! Deviation Builder - per-criterion signed pairwise differences.

use serde::Serialize;

use crate::domain::foundation::{CriterionCube, DomainError, DomainResult, PerformanceTable};

/// `dev[k][i][j] = perf[i][k] - perf[j][k]` for every criterion `k`,
/// row `i` and column `j`.
///
/// Rows and columns may be alternatives, profiles, or one of each. Both
/// inputs are expected to be direction-normalised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviationMatrix(CriterionCube);

impl DeviationMatrix {
    /// Deviations of every row of `rows` against every row of `columns`.
    ///
    /// The criteria of `columns` are matched to those of `rows` by label.
    pub fn between(rows: &PerformanceTable, columns: &PerformanceTable) -> DomainResult<Self> {
        if rows.criterion_count() != columns.criterion_count() {
            return Err(DomainError::dimension_mismatch(
                "column table criteria",
                rows.criterion_count(),
                columns.criterion_count(),
            ));
        }
        let columns = columns.aligned_to(rows.criteria())?;
        let cube = CriterionCube::from_fn(
            rows.criteria_index(),
            rows.rows(),
            columns.rows(),
            |k, i, j| rows.value_at(i, k) - columns.value_at(j, k),
        );
        Ok(Self(cube))
    }

    /// Deviations of a table against itself.
    pub fn within(table: &PerformanceTable) -> Self {
        Self(CriterionCube::from_fn(
            table.criteria_index(),
            table.rows(),
            table.rows(),
            |k, i, j| table.value_at(i, k) - table.value_at(j, k),
        ))
    }

    pub fn cube(&self) -> &CriterionCube {
        &self.0
    }

    pub fn at(&self, criterion: usize, row: usize, column: usize) -> f64 {
        self.0.at(criterion, row, column)
    }

    pub fn get(&self, criterion: &str, row: &str, column: &str) -> Option<f64> {
        self.0.get(criterion, row, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_is_antisymmetric() {
        let table = PerformanceTable::from_rows(
            vec!["g1", "g2"],
            vec![("a", vec![3.0, 1.0]), ("b", vec![1.0, 4.0])],
        )
        .unwrap();
        let dev = DeviationMatrix::within(&table);
        assert_eq!(dev.get("g1", "a", "b"), Some(2.0));
        assert_eq!(dev.get("g1", "b", "a"), Some(-2.0));
        assert_eq!(dev.get("g2", "a", "b"), Some(-3.0));
        assert_eq!(dev.get("g2", "a", "a"), Some(0.0));
    }

    #[test]
    fn between_matches_columns_by_label() {
        let alternatives = PerformanceTable::from_rows(vec!["g1", "g2"], vec![("a", vec![5.0, 5.0])]).unwrap();
        let profiles = PerformanceTable::from_rows(
            vec!["g2", "g1"],
            vec![("r1", vec![1.0, 2.0]), ("r2", vec![8.0, 9.0])],
        )
        .unwrap();
        let dev = DeviationMatrix::between(&alternatives, &profiles).unwrap();
        assert_eq!(dev.get("g1", "a", "r1"), Some(3.0));
        assert_eq!(dev.get("g2", "a", "r1"), Some(4.0));
        assert_eq!(dev.get("g1", "a", "r2"), Some(-4.0));
        assert_eq!(dev.get("g1", "r1", "a"), None);
    }

    #[test]
    fn between_rejects_different_criteria() {
        let alternatives = PerformanceTable::from_rows(vec!["g1", "g2"], vec![("a", vec![5.0, 5.0])]).unwrap();
        let profiles = PerformanceTable::from_rows(vec!["g1"], vec![("r1", vec![1.0])]).unwrap();
        assert!(DeviationMatrix::between(&alternatives, &profiles).is_err());
    }
}
