//! Foundation module - Shared domain primitives.
//!
//! Contains the label-keyed tables and matrices, value objects and error
//! types that form the vocabulary of the outranking pipeline.

mod errors;
mod labels;
mod matrix;
mod performance_table;
mod precision;
mod state_machine;

pub use errors::{DomainError, DomainResult, ErrorCode, ValidationError};
pub use labels::LabelIndex;
pub use matrix::{CriterionCube, PreferenceMatrix};
pub use performance_table::{PerformanceTable, PerformanceTableBuilder};
pub use precision::DecimalPlace;
pub use state_machine::StateMachine;
