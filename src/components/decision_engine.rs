//! Decision Engine Component
//!
//! Maps the two aggregate totals to a label through ordered, inclusive
//! threshold checks and derives confidence and the external score.

use crate::components::score_aggregator::AggregateScore;
use crate::models::ClassificationLabel;
use serde::{Deserialize, Serialize};

pub const MAX_REASONS: usize = 5;
pub const LEGIT_REASON: &str = "No suspicious patterns detected";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    pub phishing_threshold: f64,
    pub fraud_threshold: f64,
    pub spam_threshold: f64,
    pub phishing_score_weight: f64,
    pub fraud_score_weight: f64,
    pub spam_score_weight: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            phishing_threshold: 0.5,
            fraud_threshold: 0.35,
            spam_threshold: 0.4,
            phishing_score_weight: 15.0,
            fraud_score_weight: 12.0,
            spam_score_weight: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalDecision {
    pub label: ClassificationLabel,
    pub confidence: f64,
    pub score: f64,
    pub reasons: Vec<String>,
}

pub struct DecisionEngine {
    config: DecisionConfig,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(DecisionConfig::default())
    }
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    /// First matching rule wins: phishing, fraud, spam, then legit.
    pub fn make_decision(&self, aggregate: AggregateScore) -> FinalDecision {
        let AggregateScore {
            phishing_score,
            spam_score,
            mut reasons,
        } = aggregate;

        let (label, confidence, weight) = if phishing_score >= self.config.phishing_threshold {
            (
                ClassificationLabel::Phishing,
                phishing_score,
                self.config.phishing_score_weight,
            )
        } else if phishing_score >= self.config.fraud_threshold {
            (
                ClassificationLabel::Fraud,
                phishing_score,
                self.config.fraud_score_weight,
            )
        } else if spam_score >= self.config.spam_threshold {
            (
                ClassificationLabel::Spam,
                spam_score,
                self.config.spam_score_weight,
            )
        } else {
            // Sub-threshold partial signals are dropped from the explanation.
            reasons = vec![LEGIT_REASON.to_string()];
            (
                ClassificationLabel::Legit,
                1.0 - phishing_score.max(spam_score),
                0.0,
            )
        };

        reasons.truncate(MAX_REASONS);

        FinalDecision {
            label,
            confidence,
            score: confidence * weight,
            reasons,
        }
    }
}
