//! Direction Normalizer - turns every criterion into "higher is better".

use tracing::debug;

use super::{CriteriaSet, Direction};
use crate::domain::foundation::{DomainError, DomainResult, PerformanceTable};

/// Returns a copy of `table` aligned to the criteria order with minimised
/// criteria negated.
///
/// The table's columns must be exactly the criteria ids (in any order);
/// alignment is by label.
pub fn normalize_directions(
    table: &PerformanceTable,
    criteria: &CriteriaSet,
) -> DomainResult<PerformanceTable> {
    if table.criterion_count() != criteria.len() {
        return Err(DomainError::dimension_mismatch(
            "performance table criteria",
            criteria.len(),
            table.criterion_count(),
        ));
    }
    let mut normalized = table.aligned_to(criteria.ids())?;
    for (k, criterion) in criteria.iter().enumerate() {
        if criterion.direction == Direction::Min {
            normalized = normalized.map_criterion(k, |v| criterion.direction.normalize(v));
        }
    }
    debug!(
        rows = normalized.row_count(),
        criteria = criteria.len(),
        "Normalized criterion directions"
    );
    Ok(normalized)
}
