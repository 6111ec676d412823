//! Aggregation and decision stages of the classification pipeline.
//!
//! Detectors in `features` produce signals; these components turn the
//! signals into totals and the totals into a label.

pub mod decision_engine;
pub mod score_aggregator;

pub use decision_engine::{DecisionConfig, DecisionEngine, FinalDecision};
pub use score_aggregator::{AggregateScore, ScoreAggregator};
