//! State machine trait for lifecycle enums.
//!
//! Gives stage enums (such as the classification stage of an alternative)
//! one way to declare and enforce their allowed transitions.

use super::{DomainError, DomainResult};

/// Trait for enums that represent state machines.
///
/// Implementors define valid transitions and get a validated
/// `transition_to` for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ClassificationStage {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Pending, Bracketed) | (Bracketed, Assigned))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> { ... }
/// }
///
/// let stage = stage.transition_to(ClassificationStage::Assigned)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation.
    ///
    /// An invalid transition is a broken internal invariant, never a
    /// caller error.
    fn transition_to(&self, target: Self) -> DomainResult<Self> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::invariant(format!(
                "Cannot transition from {:?} to {:?}",
                self, target
            )))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
