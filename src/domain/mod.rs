//! Domain layer containing the outranking pipeline.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (label-keyed tables and matrices, precision, errors)
//! - `preference` - Transfer functions, criteria, partial and aggregated preferences
//! - `flows` - Outranking flows and flow-based rankings
//! - `sorting` - PromSort, FlowSort I/II and FlowSort-GDSS

pub mod flows;
pub mod foundation;
pub mod preference;
pub mod sorting;
