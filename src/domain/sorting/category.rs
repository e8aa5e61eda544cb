//! Ordered categories and first-step brackets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, DomainResult, ValidationError};

/// Ordered category `C1 < C2 < … < Cn`; the ordinal is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(usize);

impl Category {
    /// Worst category.
    pub const FIRST: Self = Self(1);

    pub fn new(ordinal: usize) -> Result<Self, ValidationError> {
        if ordinal == 0 {
            return Err(ValidationError::out_of_range(
                "category",
                1.0,
                f64::MAX,
                0.0,
            ));
        }
        Ok(Self(ordinal))
    }

    /// Category at a 0-based position in the category sequence.
    pub(crate) fn from_position(position: usize) -> Self {
        Self(position + 1)
    }

    pub fn ordinal(&self) -> usize {
        self.0
    }

    /// 0-based position in the category sequence.
    pub fn position(&self) -> usize {
        self.0 - 1
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// First-step result `[worse, better]`; degenerate when both are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bracket {
    pub worse: Category,
    pub better: Category,
}

impl Bracket {
    /// Creates a bracket; `worse` above `better` is an internal error.
    pub fn new(worse: Category, better: Category) -> DomainResult<Self> {
        if worse > better {
            return Err(DomainError::invariant(format!(
                "Bracket [{}, {}] is inverted",
                worse, better
            )));
        }
        Ok(Self { worse, better })
    }

    pub fn precise(category: Category) -> Self {
        Self {
            worse: category,
            better: category,
        }
    }

    /// Smallest bracket containing both categories.
    pub fn spanning(a: Category, b: Category) -> Self {
        Self {
            worse: a.min(b),
            better: a.max(b),
        }
    }

    pub fn is_precise(&self) -> bool {
        self.worse == self.better
    }

    pub fn contains(&self, category: Category) -> bool {
        self.worse <= category && category <= self.better
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.worse, self.better)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_ordered_and_one_based() {
        let c2 = Category::new(2).unwrap();
        assert!(Category::FIRST < c2);
        assert_eq!(c2.position(), 1);
        assert_eq!(c2.next().ordinal(), 3);
        assert_eq!(c2.to_string(), "C2");
        assert!(Category::new(0).is_err());
    }

    #[test]
    fn inverted_bracket_is_rejected() {
        let c1 = Category::FIRST;
        let c3 = Category::new(3).unwrap();
        assert!(Bracket::new(c3, c1).is_err());
        assert_eq!(Bracket::spanning(c3, c1), Bracket::new(c1, c3).unwrap());
    }

    #[test]
    fn precise_bracket_contains_only_its_category() {
        let c2 = Category::new(2).unwrap();
        let bracket = Bracket::precise(c2);
        assert!(bracket.is_precise());
        assert!(bracket.contains(c2));
        assert!(!bracket.contains(Category::FIRST));
        assert_eq!(bracket.to_string(), "[C2, C2]");
    }
}
