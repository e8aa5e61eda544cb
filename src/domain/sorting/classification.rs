//! Classification record of one alternative and its stage lifecycle.

use serde::Serialize;
use std::fmt;

use super::{Bracket, Category};
use crate::domain::foundation::{DomainError, DomainResult, StateMachine};

/// Where an alternative is in the two-phase assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStage {
    #[default]
    Pending,
    /// First step left two candidate categories.
    Bracketed,
    Assigned,
}

impl StateMachine for ClassificationStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ClassificationStage::*;
        matches!(
            (self, target),
            // Imprecise first step
            (Pending, Bracketed) |
            // Precise first step
            (Pending, Assigned) |
            // Final step
            (Bracketed, Assigned)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ClassificationStage::*;
        match self {
            Pending => vec![Bracketed, Assigned],
            Bracketed => vec![Assigned],
            Assigned => vec![],
        }
    }
}

impl fmt::Display for ClassificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClassificationStage::Pending => "Pending",
            ClassificationStage::Bracketed => "Bracketed",
            ClassificationStage::Assigned => "Assigned",
        };
        write!(f, "{}", s)
    }
}

/// Assignment state of one alternative.
///
/// Built fresh per alternative and advanced by value; the first-step
/// bracket is kept after the final step for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    alternative: String,
    stage: ClassificationStage,
    bracket: Option<Bracket>,
    category: Option<Category>,
}

impl Classification {
    pub fn pending(alternative: impl Into<String>) -> Self {
        Self {
            alternative: alternative.into(),
            stage: ClassificationStage::Pending,
            bracket: None,
            category: None,
        }
    }

    /// Records the first-step bracket. A degenerate bracket assigns directly.
    pub fn with_bracket(self, bracket: Bracket) -> DomainResult<Self> {
        let (target, category) = if bracket.is_precise() {
            (ClassificationStage::Assigned, Some(bracket.worse))
        } else {
            (ClassificationStage::Bracketed, None)
        };
        Ok(Self {
            stage: self.stage.transition_to(target)?,
            bracket: Some(bracket),
            category,
            ..self
        })
    }

    /// Collapses the bracket to one of its two ends.
    pub fn resolve(self, category: Category) -> DomainResult<Self> {
        let stage = self.stage.transition_to(ClassificationStage::Assigned)?;
        let bracket = self.bracket.ok_or_else(|| {
            DomainError::invariant(format!("'{}' has no bracket to resolve", self.alternative))
        })?;
        if category != bracket.worse && category != bracket.better {
            return Err(DomainError::invariant(format!(
                "{} is not an end of {} for '{}'",
                category, bracket, self.alternative
            )));
        }
        Ok(Self {
            stage,
            category: Some(category),
            ..self
        })
    }

    pub fn alternative(&self) -> &str {
        &self.alternative
    }

    pub fn stage(&self) -> ClassificationStage {
        self.stage
    }

    pub fn bracket(&self) -> Option<Bracket> {
        self.bracket
    }

    /// Final category, once assigned.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn is_assigned(&self) -> bool {
        self.stage == ClassificationStage::Assigned
    }
}

/// Classifications in the input order of the alternatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SortingOutcome {
    classifications: Vec<Classification>,
}

impl SortingOutcome {
    pub fn new(classifications: Vec<Classification>) -> Self {
        Self { classifications }
    }

    pub fn get(&self, alternative: &str) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.alternative == alternative)
    }

    pub fn category(&self, alternative: &str) -> Option<Category> {
        self.get(alternative).and_then(Classification::category)
    }

    pub fn bracket(&self, alternative: &str) -> Option<Bracket> {
        self.get(alternative).and_then(Classification::bracket)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Classification> {
        self.classifications.iter()
    }

    pub fn len(&self) -> usize {
        self.classifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifications.is_empty()
    }

    /// True when every alternative has a final category.
    pub fn is_complete(&self) -> bool {
        self.classifications.iter().all(Classification::is_assigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn c(n: usize) -> Category {
        Category::new(n).unwrap()
    }

    #[test]
    fn stage_transitions() {
        use ClassificationStage::*;
        assert!(Pending.can_transition_to(&Bracketed));
        assert!(Pending.can_transition_to(&Assigned));
        assert!(Bracketed.can_transition_to(&Assigned));
        assert!(!Assigned.can_transition_to(&Bracketed));
        assert!(!Bracketed.can_transition_to(&Pending));
        assert!(Assigned.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        use ClassificationStage::*;
        for stage in [Pending, Bracketed, Assigned] {
            for target in stage.valid_transitions() {
                assert!(stage.can_transition_to(&target), "{:?} -> {:?}", stage, target);
            }
        }
    }

    #[test]
    fn degenerate_bracket_assigns_directly() {
        let record = Classification::pending("a").with_bracket(Bracket::precise(c(1))).unwrap();
        assert_eq!(record.stage(), ClassificationStage::Assigned);
        assert_eq!(record.category(), Some(c(1)));
    }

    #[test]
    fn wide_bracket_waits_for_final_step() {
        let record = Classification::pending("a")
            .with_bracket(Bracket::new(c(2), c(3)).unwrap())
            .unwrap();
        assert_eq!(record.stage(), ClassificationStage::Bracketed);
        assert_eq!(record.category(), None);

        let resolved = record.resolve(c(3)).unwrap();
        assert_eq!(resolved.category(), Some(c(3)));
        assert_eq!(resolved.bracket(), Some(Bracket::new(c(2), c(3)).unwrap()));
    }

    #[test]
    fn resolving_outside_bracket_or_twice_fails() {
        let record = Classification::pending("a")
            .with_bracket(Bracket::new(c(2), c(3)).unwrap())
            .unwrap();
        assert_eq!(record.clone().resolve(c(1)).unwrap_err().code, ErrorCode::InvariantViolation);

        let assigned = record.resolve(c(2)).unwrap();
        assert!(assigned.resolve(c(3)).is_err());
        assert!(Classification::pending("b").resolve(c(1)).is_err());
    }

    #[test]
    fn outcome_lookup_by_alternative() {
        let outcome = SortingOutcome::new(vec![
            Classification::pending("a").with_bracket(Bracket::precise(c(2))).unwrap(),
            Classification::pending("b")
                .with_bracket(Bracket::new(c(1), c(2)).unwrap())
                .unwrap(),
        ]);
        assert_eq!(outcome.category("a"), Some(c(2)));
        assert_eq!(outcome.category("b"), None);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.len(), 2);
    }
}
