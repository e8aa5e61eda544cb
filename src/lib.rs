//! PROMETHEE Sort - outranking preferences and category assignment
//!
//! This crate computes PROMETHEE preference degrees and outranking flows and
//! assigns alternatives to ordered categories with PromSort, FlowSort I/II
//! and the group variant FlowSort-GDSS.

pub mod config;
pub mod domain;
