//! Sorting Module - assignment of alternatives to ordered categories.
//!
//! # Components
//!
//! - `Category` / `Bracket` - Ordered categories and first-step brackets
//! - `Classification` - Per-alternative record driven by `ClassificationStage`
//! - `ProfileComparison` - Limiting, boundary and central placement rules
//! - `PromSort` - Relation-based first step, distance-based final step
//! - `FlowSort` - FlowSort I (positive/negative flows) and II (net flow)
//! - `FlowSortGdss` - Group sorting with weighted votes and distances
//! - `profiles` - Dominance preconditions on category profiles
//!
//! # Design Philosophy
//!
//! Every classifier validates its profiles when constructed, so no flow is
//! computed for an inconsistent configuration. Classification records are
//! built fresh per alternative and advanced by value.

mod category;
mod classification;
mod flowsort;
mod gdss;
mod placement;
pub mod profiles;
mod promsort;

pub use category::{Bracket, Category};
pub use classification::{Classification, ClassificationStage, SortingOutcome};
pub use flowsort::{FlowSort, FlowSortAssignment, FlowSortOutcome, FlowSortVariant};
pub use gdss::{DecisionMaker, FlowSortGdss, GdssOutcome, GroupDistances, GroupVote};
pub use placement::{LimitExcess, Placement, ProfileComparison};
pub use promsort::{FinalStepDistances, FlowRelation, PromSort};
