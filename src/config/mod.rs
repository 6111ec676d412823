pub mod toml_config;

use crate::components::DecisionConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "AI_ENGINE_";
pub const MODEL_VERSION: &str = "1.1.0-heuristic";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub model_version: String,
    /// Characters kept per text field before normalization; 0 keeps all.
    pub max_text_length: usize,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

/// Multipliers turning a label's confidence into the external score.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub phishing_score_weight: f64,
    pub fraud_score_weight: f64,
    pub spam_score_weight: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Mail Threat Engine".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            model_version: MODEL_VERSION.to_string(),
            max_text_length: 100_000,
            scoring: ScoringConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let decision = DecisionConfig::default();
        Self {
            phishing_score_weight: decision.phishing_score_weight,
            fraud_score_weight: decision.fraud_score_weight,
            spam_score_weight: decision.spam_score_weight,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn decision_config(&self) -> DecisionConfig {
        DecisionConfig {
            phishing_score_weight: self.scoring.phishing_score_weight,
            fraud_score_weight: self.scoring.fraud_score_weight,
            spam_score_weight: self.scoring.spam_score_weight,
            ..DecisionConfig::default()
        }
    }

    /// Apply `AI_ENGINE_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(env_override)
    }

    /// Apply overrides from `lookup`, keyed by the suffix after the prefix.
    /// Values that fail to parse are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        override_parsed(&lookup, "PHISHING_SCORE_WEIGHT", &mut self.scoring.phishing_score_weight);
        override_parsed(&lookup, "FRAUD_SCORE_WEIGHT", &mut self.scoring.fraud_score_weight);
        override_parsed(&lookup, "SPAM_SCORE_WEIGHT", &mut self.scoring.spam_score_weight);
        override_parsed(&lookup, "MAX_TEXT_LENGTH", &mut self.max_text_length);
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        self
    }

    /// Reject settings that would make scores meaningless.
    pub fn validate(&self) -> anyhow::Result<()> {
        let weights = [
            ("phishing_score_weight", self.scoring.phishing_score_weight),
            ("fraud_score_weight", self.scoring.fraud_score_weight),
            ("spam_score_weight", self.scoring.spam_score_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{} must be a non-negative number, got {}", name, value);
            }
        }
        if self.model_version.trim().is_empty() {
            anyhow::bail!("model_version must not be empty");
        }
        Ok(())
    }
}

/// Value of `AI_ENGINE_<key>` in the process environment.
pub fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{}{}", ENV_PREFIX, key)).ok()
}

fn override_parsed<T, F>(lookup: &F, key: &str, target: &mut T)
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => log::warn!("Ignoring unparseable {}{}={}", ENV_PREFIX, key, raw),
        }
    }
}
