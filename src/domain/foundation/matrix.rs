//! Label-keyed matrices: the 2-key `PreferenceMatrix` and the 3-key `CriterionCube`.

use serde::Serialize;

use super::{DomainError, DomainResult, LabelIndex};

/// Row label x column label matrix of preference-like degrees.
///
/// A cell whose row and column carry the same label is the self-comparison
/// and is excluded: it holds no value and `get` returns `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceMatrix {
    rows: LabelIndex,
    columns: LabelIndex,
    values: Vec<Option<f64>>,
}

impl PreferenceMatrix {
    /// Builds a matrix by evaluating `f(row, column)` on every
    /// off-diagonal cell.
    pub fn from_fn(
        rows: &LabelIndex,
        columns: &LabelIndex,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Self {
        let mut values = Vec::with_capacity(rows.len() * columns.len());
        for (i, row) in rows.iter().enumerate() {
            for (j, column) in columns.iter().enumerate() {
                if row == column {
                    values.push(None);
                } else {
                    values.push(Some(f(i, j)));
                }
            }
        }
        Self {
            rows: rows.clone(),
            columns: columns.clone(),
            values,
        }
    }

    /// Builds a matrix from dense rows. Diagonal entries are ignored.
    pub fn from_rows(
        row_labels: Vec<String>,
        column_labels: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> DomainResult<Self> {
        let row_index = LabelIndex::new("row", row_labels)?;
        let column_index = LabelIndex::new("column", column_labels)?;
        if rows.len() != row_index.len() {
            return Err(DomainError::dimension_mismatch("matrix rows", row_index.len(), rows.len()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != column_index.len() {
                return Err(DomainError::dimension_mismatch(
                    format!("matrix row '{}'", row_index.label(i)),
                    column_index.len(),
                    row.len(),
                ));
            }
        }
        Ok(Self::from_fn(&row_index, &column_index, |i, j| rows[i][j]))
    }

    pub fn rows(&self) -> &LabelIndex {
        &self.rows
    }

    pub fn columns(&self) -> &LabelIndex {
        &self.columns
    }

    /// Returns true when rows and columns are the same labels in the same order.
    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Cell by positions; `None` on the excluded diagonal.
    pub fn at(&self, row: usize, column: usize) -> Option<f64> {
        self.values[row * self.columns.len() + column]
    }

    /// Cell by labels; `None` for unknown labels or the excluded diagonal.
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.rows.position(row)?;
        let j = self.columns.position(column)?;
        self.at(i, j)
    }

    /// Off-diagonal values of one row.
    pub fn row_values(&self, row: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.columns.len()).filter_map(move |j| self.at(row, j))
    }

    /// Off-diagonal values of one column.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows.len()).filter_map(move |i| self.at(i, column))
    }

    /// Applies `f(value, row, column)` to every present cell.
    pub fn map(&self, mut f: impl FnMut(f64, usize, usize) -> f64) -> Self {
        let n = self.columns.len();
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(idx, v)| v.map(|v| f(v, idx / n, idx % n)))
            .collect();
        Self {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            values,
        }
    }

    /// Largest present value, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().flatten().copied().reduce(f64::max)
    }
}

/// Criterion x row x column cube used for deviations and partial preferences.
///
/// Storage is one flat array addressed by an explicit (criterion, row,
/// column) index function; lookups are by label on all three axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionCube {
    criteria: LabelIndex,
    rows: LabelIndex,
    columns: LabelIndex,
    values: Vec<f64>,
}

impl CriterionCube {
    pub fn from_fn(
        criteria: &LabelIndex,
        rows: &LabelIndex,
        columns: &LabelIndex,
        mut f: impl FnMut(usize, usize, usize) -> f64,
    ) -> Self {
        let mut values = Vec::with_capacity(criteria.len() * rows.len() * columns.len());
        for k in 0..criteria.len() {
            for i in 0..rows.len() {
                for j in 0..columns.len() {
                    values.push(f(k, i, j));
                }
            }
        }
        Self {
            criteria: criteria.clone(),
            rows: rows.clone(),
            columns: columns.clone(),
            values,
        }
    }

    fn offset(&self, criterion: usize, row: usize, column: usize) -> usize {
        (criterion * self.rows.len() + row) * self.columns.len() + column
    }

    pub fn criteria(&self) -> &LabelIndex {
        &self.criteria
    }

    pub fn rows(&self) -> &LabelIndex {
        &self.rows
    }

    pub fn columns(&self) -> &LabelIndex {
        &self.columns
    }

    pub fn at(&self, criterion: usize, row: usize, column: usize) -> f64 {
        self.values[self.offset(criterion, row, column)]
    }

    pub fn get(&self, criterion: &str, row: &str, column: &str) -> Option<f64> {
        let k = self.criteria.position(criterion)?;
        let i = self.rows.position(row)?;
        let j = self.columns.position(column)?;
        Some(self.at(k, i, j))
    }

    /// Returns a cube of the same shape with every value passed through `f`.
    pub fn map(&self, mut f: impl FnMut(f64, usize, usize, usize) -> f64) -> Self {
        Self::from_fn(&self.criteria, &self.rows, &self.columns, |k, i, j| {
            f(self.at(k, i, j), k, i, j)
        })
    }
}
