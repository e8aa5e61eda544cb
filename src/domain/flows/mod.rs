//! Flows Module - outranking flows and flow-based rankings.
//!
//! - `FlowCalculator` - Plain, profile-based and reference-set flows, PROMETHEE II ranking
//! - `NetFlowScorer` - Max/min/sum score ranking with tie re-scoring

mod net_flow_score;
mod outranking_flow;

pub use net_flow_score::{NetFlowScorer, ScoreDirection, ScoreFunction, ScoredAlternative};
pub use outranking_flow::{
    Flow, FlowCalculator, OutrankingFlows, RankedAlternative, ReferenceFlows,
};
