//! Performance Table - alternatives (or profiles) x criteria numeric matrix.

use serde::Serialize;
use std::collections::HashMap;

use super::{DomainError, DomainResult, LabelIndex, ValidationError};

/// Row-labelled numeric table whose columns are criterion ids.
///
/// Rows may be alternatives or category profiles; the table itself does
/// not care. Every cell is present and finite once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceTable {
    rows: LabelIndex,
    criteria: LabelIndex,
    /// Row-major cell values.
    values: Vec<f64>,
}

impl PerformanceTable {
    /// Creates a builder for constructing a performance table.
    pub fn builder() -> PerformanceTableBuilder {
        PerformanceTableBuilder::new()
    }

    /// Builds a table from `(label, values)` rows in criterion order.
    pub fn from_rows<L, C>(criteria: Vec<C>, rows: Vec<(L, Vec<f64>)>) -> DomainResult<Self>
    where
        L: Into<String>,
        C: Into<String>,
    {
        let mut builder = Self::builder().criteria(criteria);
        for (label, values) in rows {
            builder = builder.row(label, values);
        }
        builder.build()
    }

    pub fn row_labels(&self) -> &[String] {
        self.rows.labels()
    }

    pub fn criteria(&self) -> &[String] {
        self.criteria.labels()
    }

    pub fn rows(&self) -> &LabelIndex {
        &self.rows
    }

    pub fn criteria_index(&self) -> &LabelIndex {
        &self.criteria
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at a row / criterion position pair.
    pub fn value_at(&self, row: usize, criterion: usize) -> f64 {
        self.values[row * self.criteria.len() + criterion]
    }

    /// Value looked up by labels.
    pub fn value(&self, row: &str, criterion: &str) -> Option<f64> {
        let i = self.rows.position(row)?;
        let k = self.criteria.position(criterion)?;
        Some(self.value_at(i, k))
    }

    /// All values of one row, in criterion order.
    pub fn row(&self, label: &str) -> Option<&[f64]> {
        let i = self.rows.position(label)?;
        let n = self.criteria.len();
        Some(&self.values[i * n..(i + 1) * n])
    }

    /// Returns a copy whose criterion column `criterion` is transformed by `f`.
    pub fn map_criterion(&self, criterion: usize, f: impl Fn(f64) -> f64) -> Self {
        let mut out = self.clone();
        let n = self.criteria.len();
        for i in 0..self.rows.len() {
            let cell = &mut out.values[i * n + criterion];
            *cell = f(*cell);
        }
        out
    }

    /// Returns a table with the same rows and the criterion columns reordered
    /// to match `criteria`. Columns are matched by label.
    pub fn aligned_to(&self, criteria: &[String]) -> DomainResult<Self> {
        if criteria.len() != self.criteria.len() {
            return Err(DomainError::dimension_mismatch(
                "criteria",
                criteria.len(),
                self.criteria.len(),
            ));
        }
        let source: Vec<usize> = criteria
            .iter()
            .map(|c| self.criteria.require("criterion", c))
            .collect::<DomainResult<_>>()?;
        let mut values = Vec::with_capacity(self.values.len());
        for i in 0..self.rows.len() {
            values.extend(source.iter().map(|&k| self.value_at(i, k)));
        }
        Ok(Self {
            rows: self.rows.clone(),
            criteria: LabelIndex::new("criterion", criteria.to_vec())?,
            values,
        })
    }

    /// Stacks `other` below `self`. Criterion columns are matched by label.
    pub fn concat(&self, other: &PerformanceTable) -> DomainResult<Self> {
        let other = other.aligned_to(self.criteria.labels())?;
        let mut labels = self.rows.labels().to_vec();
        labels.extend(other.rows.labels().iter().cloned());
        let mut values = self.values.clone();
        values.extend_from_slice(&other.values);
        Ok(Self {
            rows: LabelIndex::new("row", labels)?,
            criteria: self.criteria.clone(),
            values,
        })
    }

    /// Returns the sub-table made of the given rows, in the given order.
    pub fn select_rows(&self, labels: &[String]) -> DomainResult<Self> {
        let n = self.criteria.len();
        let mut values = Vec::with_capacity(labels.len() * n);
        for label in labels {
            let i = self.rows.require("row", label)?;
            values.extend_from_slice(&self.values[i * n..(i + 1) * n]);
        }
        Ok(Self {
            rows: LabelIndex::new("row", labels.to_vec())?,
            criteria: self.criteria.clone(),
            values,
        })
    }

    /// Returns a copy with every row label rewritten by `f`.
    pub fn relabel_rows(&self, f: impl Fn(&str) -> String) -> DomainResult<Self> {
        let labels = self.rows.iter().map(|l| f(l)).collect();
        Ok(Self {
            rows: LabelIndex::new("row", labels)?,
            criteria: self.criteria.clone(),
            values: self.values.clone(),
        })
    }
}

/// Builder for constructing PerformanceTable instances.
#[derive(Debug, Default)]
pub struct PerformanceTableBuilder {
    criteria: Vec<String>,
    row_labels: Vec<String>,
    rows: HashMap<String, Vec<f64>>,
    cells: HashMap<(String, String), f64>,
}

impl PerformanceTableBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the criterion columns.
    pub fn criteria(mut self, ids: Vec<impl Into<String>>) -> Self {
        self.criteria = ids.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Declares the row labels without values; fill them with `cell`.
    pub fn rows(mut self, labels: Vec<impl Into<String>>) -> Self {
        for label in labels {
            let label = label.into();
            if !self.row_labels.contains(&label) {
                self.row_labels.push(label);
            }
        }
        self
    }

    /// Adds a full row in criterion order.
    pub fn row(mut self, label: impl Into<String>, values: Vec<f64>) -> Self {
        let label = label.into();
        if !self.row_labels.contains(&label) {
            self.row_labels.push(label.clone());
        }
        self.rows.insert(label, values);
        self
    }

    /// Sets a single cell by labels.
    pub fn cell(mut self, row: impl Into<String>, criterion: impl Into<String>, value: f64) -> Self {
        let row = row.into();
        if !self.row_labels.contains(&row) {
            self.row_labels.push(row.clone());
        }
        self.cells.insert((row, criterion.into()), value);
        self
    }

    /// Builds the table, checking that it is rectangular and finite.
    pub fn build(self) -> DomainResult<PerformanceTable> {
        if self.criteria.is_empty() {
            return Err(ValidationError::empty_field("criteria").into());
        }
        let criteria = LabelIndex::new("criterion", self.criteria)?;
        let n = criteria.len();
        let mut values = Vec::with_capacity(self.row_labels.len() * n);

        for label in &self.row_labels {
            let start = values.len();
            match self.rows.get(label) {
                Some(row) if row.len() != n => {
                    return Err(DomainError::dimension_mismatch(
                        format!("row '{}'", label),
                        n,
                        row.len(),
                    ));
                }
                Some(row) => values.extend_from_slice(row),
                None => values.resize(start + n, f64::NAN),
            }
            for (k, criterion) in criteria.iter().enumerate() {
                if let Some(&v) = self.cells.get(&(label.clone(), criterion.clone())) {
                    values[start + k] = v;
                }
            }
            if let Some(k) = (0..n).find(|&k| !values[start + k].is_finite()) {
                return Err(ValidationError::invalid_format(
                    format!("{}/{}", label, criteria.label(k)),
                    "performance must be a finite number",
                )
                .into());
            }
        }

        for (_, criterion) in self.cells.keys() {
            criteria.require("criterion", criterion)?;
        }

        Ok(PerformanceTable {
            rows: LabelIndex::new("row", self.row_labels)?,
            criteria,
            values,
        })
    }
}
