//! Score Aggregator Component
//!
//! Sums detector signals into the phishing and spam totals. Totals are
//! clamped once, at finalization, so weight past the ceiling is discarded
//! rather than redistributed.

use crate::features::{Channel, Signal};

pub const SCORE_CEILING: f64 = 1.0;

/// Decimal places kept when settling a total, so sums such as
/// 0.3 + 0.15 + 0.05 land exactly on the threshold they add up to.
const SCORE_PRECISION: i32 = 9;

/// Both totals after clamping, plus every reason in evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateScore {
    pub phishing_score: f64,
    pub spam_score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ScoreAggregator {
    phishing: f64,
    spam: f64,
    reasons: Vec<String>,
}

impl ScoreAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, channel: Channel, signal: Signal) {
        // Non-finite or negative weights count as zero.
        let weight = if signal.weight.is_finite() && signal.weight > 0.0 {
            signal.weight
        } else {
            0.0
        };
        match channel {
            Channel::Phishing => self.phishing += weight,
            Channel::Spam => self.spam += weight,
        }
        self.reasons.extend(signal.reasons);
    }

    pub fn finalize(self) -> AggregateScore {
        AggregateScore {
            phishing_score: settle_score(self.phishing),
            spam_score: settle_score(self.spam),
            reasons: self.reasons,
        }
    }
}

fn settle_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_PRECISION);
    ((score * factor).round() / factor).clamp(0.0, SCORE_CEILING)
}
