//! Preference Module - from raw performances to aggregated preference degrees.
//!
//! # Components
//!
//! - `PreferenceFunction` - The six generalized criteria (transfer functions)
//! - `Criterion` / `CriteriaSet` - Direction, function, weight, reinforcement, veto
//! - `normalize_directions` - Makes every criterion "higher is better"
//! - `DeviationMatrix` - Per-criterion signed pairwise differences
//! - `PartialPreferenceCalculator` - Transfer functions applied to deviations
//! - `PreferenceAggregator` - Weighted aggregation, reinforcement, interactions
//! - `DiscordanceCalculator` - Discordance, veto and their combination with `Π`
//! - `Promethee` - The whole pipeline for one criteria set
//!
//! # Design Philosophy
//!
//! Everything here is a pure function of its inputs. Intermediate matrices
//! are recomputed on every call and looked up by label on every axis.

mod aggregation;
mod criterion;
mod deviation;
mod direction;
mod discordance;
mod generalized_criterion;
mod interaction;
mod partial;
mod pipeline;

pub use aggregation::{AggregationOptions, PreferenceAggregator};
pub use criterion::{CriteriaSet, Criterion, Direction, Reinforcement};
pub use deviation::DeviationMatrix;
pub use direction::normalize_directions;
pub use discordance::{DiscordanceCalculator, VetoAggregation};
pub use generalized_criterion::{FunctionKind, PreferenceFunction, Thresholds};
pub use interaction::{Interaction, InteractionFunction, InteractionKind};
pub use partial::{PartialPreferenceCalculator, PartialPreferences, ProfilePartialPreferences};
pub use pipeline::{ProfilePreferences, Promethee, PrometheeBuilder};
