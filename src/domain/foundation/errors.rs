//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Threshold order violated for '{criterion}': indifference {q} exceeds preference {p}")]
    ThresholdOrder { criterion: String, q: f64, p: f64 },

    #[error("Weight of '{criterion}' must be positive, got {actual}")]
    NonPositiveWeight { criterion: String, actual: f64 },

    #[error("Unknown preference function selector '{selector}'")]
    UnknownPreferenceFunction { selector: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a threshold order error (`q > p`).
    pub fn threshold_order(criterion: impl Into<String>, q: f64, p: f64) -> Self {
        ValidationError::ThresholdOrder {
            criterion: criterion.into(),
            q,
            p,
        }
    }

    /// Creates a non-positive weight error.
    pub fn non_positive_weight(criterion: impl Into<String>, actual: f64) -> Self {
        ValidationError::NonPositiveWeight {
            criterion: criterion.into(),
            actual,
        }
    }

    /// Creates an unknown preference function error.
    pub fn unknown_preference_function(selector: impl Into<String>) -> Self {
        ValidationError::UnknownPreferenceFunction {
            selector: selector.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Configuration errors
    ValidationFailed,
    DimensionMismatch,
    MissingLabel,
    UnknownPreferenceFunction,
    NonPositiveWeight,
    InvalidDecimalPlace,

    // Domain invariant violations
    DominanceViolation,
    ThresholdOrder,
    TauOutOfRange,

    // Internal failures
    InvariantViolation,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::DimensionMismatch => "DIMENSION_MISMATCH",
            ErrorCode::MissingLabel => "MISSING_LABEL",
            ErrorCode::UnknownPreferenceFunction => "UNKNOWN_PREFERENCE_FUNCTION",
            ErrorCode::NonPositiveWeight => "NON_POSITIVE_WEIGHT",
            ErrorCode::InvalidDecimalPlace => "INVALID_DECIMAL_PLACE",
            ErrorCode::DominanceViolation => "DOMINANCE_VIOLATION",
            ErrorCode::ThresholdOrder => "THRESHOLD_ORDER",
            ErrorCode::TauOutOfRange => "TAU_OUT_OF_RANGE",
            ErrorCode::InvariantViolation => "INVARIANT_VIOLATION",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Creates a dimension mismatch error between two named inputs.
    pub fn dimension_mismatch(
        what: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        let what = what.into();
        Self::new(
            ErrorCode::DimensionMismatch,
            format!("{} has {} entries, expected {}", what, actual, expected),
        )
        .with_detail("input", what)
        .with_detail("expected", expected.to_string())
        .with_detail("actual", actual.to_string())
    }

    /// Creates an error for a label absent from a label-keyed structure.
    pub fn missing_label(axis: impl Into<String>, label: impl Into<String>) -> Self {
        let axis = axis.into();
        let label = label.into();
        Self::new(
            ErrorCode::MissingLabel,
            format!("Unknown {} label '{}'", axis, label),
        )
        .with_detail("axis", axis)
        .with_detail("label", label)
    }

    /// Creates a profile dominance violation.
    pub fn dominance(
        worse: impl Into<String>,
        better: impl Into<String>,
        criterion: impl Into<String>,
    ) -> Self {
        let worse = worse.into();
        let better = better.into();
        let criterion = criterion.into();
        Self::new(
            ErrorCode::DominanceViolation,
            format!(
                "Profile '{}' is not strictly dominated by '{}' on criterion '{}'",
                worse, better, criterion
            ),
        )
        .with_detail("worse_profile", worse)
        .with_detail("better_profile", better)
        .with_detail("criterion", criterion)
    }

    /// Creates an error for a sharpness parameter outside `[1, criteria]`.
    pub fn tau_out_of_range(tau: f64, criteria: usize) -> Self {
        Self::new(
            ErrorCode::TauOutOfRange,
            format!("Tau must lie in [1, {}], got {}", criteria, tau),
        )
        .with_detail("tau", tau.to_string())
        .with_detail("criteria", criteria.to_string())
    }

    /// Creates an internal invariant failure.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvariantViolation, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::ThresholdOrder { .. } => ErrorCode::ThresholdOrder,
            ValidationError::NonPositiveWeight { .. } => ErrorCode::NonPositiveWeight,
            ValidationError::UnknownPreferenceFunction { .. } => {
                ErrorCode::UnknownPreferenceFunction
            }
            ValidationError::OutOfRange { field, .. } if field == "decimal_place" => {
                ErrorCode::InvalidDecimalPlace
            }
            _ => ErrorCode::ValidationFailed,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Result alias used throughout the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;
