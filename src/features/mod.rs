pub mod attachment;
pub mod brand_impersonation;
pub mod link_analyzer;
pub mod phrases;
pub mod regional;
pub mod sender_alignment;
pub mod subject;
pub mod tld_risk;
pub mod urgency;

use crate::domain_utils::{DomainUtils, SenderAddress};
use crate::models::AnalyzeRequest;
use regex::{Regex, RegexBuilder};

/// Which running total a detector feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Phishing,
    Spam,
}

/// A weighted piece of evidence from one detector. Lives only for one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signal {
    pub weight: f64,
    pub reasons: Vec<String>,
}

impl Signal {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(weight: f64, reason: impl Into<String>) -> Self {
        Self {
            weight,
            reasons: vec![reason.into()],
        }
    }

    pub fn add(&mut self, weight: f64, reason: impl Into<String>) {
        self.weight += weight;
        self.reasons.push(reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.weight == 0.0 && self.reasons.is_empty()
    }
}

/// Everything a detector may look at, prepared once per call.
pub struct EvaluationContext<'a> {
    pub request: &'a AnalyzeRequest,
    /// Normalized subject + body + PDF text.
    pub text: String,
    /// Normalized subject alone, for subject-only matchers.
    pub subject: String,
    pub sender: Option<SenderAddress>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(request: &'a AnalyzeRequest, text: String, subject: String) -> Self {
        let sender = request.from_address().and_then(DomainUtils::parse_sender);
        Self {
            request,
            text,
            subject,
            sender,
        }
    }

    /// Lower-cased raw From header, for the substring gates.
    pub fn raw_from_lower(&self) -> Option<String> {
        self.request.from_address().map(str::to_lowercase)
    }
}

pub trait Detector: Send + Sync {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal>;
    fn name(&self) -> &str;
    fn channel(&self) -> Channel {
        Channel::Phishing
    }
}

/// A themed table of case-insensitive patterns compiled once.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<(Regex, String)>,
}

impl PatternSet {
    /// Each entry pairs a pattern with the reason reported when it matches first.
    pub fn compile(entries: &[(&str, &str)]) -> anyhow::Result<Self> {
        let mut patterns = Vec::with_capacity(entries.len());
        for (pattern, reason) in entries {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| anyhow::anyhow!("invalid pattern '{}': {}", pattern, e))?;
            patterns.push((regex, reason.to_string()));
        }
        Ok(Self { patterns })
    }

    pub fn from_patterns(patterns: &[&str]) -> anyhow::Result<Self> {
        let entries: Vec<(&str, &str)> = patterns.iter().map(|p| (*p, *p)).collect();
        Self::compile(&entries)
    }

    /// Number of distinct patterns that match somewhere in `text`.
    pub fn count_matches(&self, text: &str) -> usize {
        self.patterns
            .iter()
            .filter(|(regex, _)| regex.is_match(text))
            .count()
    }

    /// Reason attached to the first matching pattern, in table order.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(regex, _)| regex.is_match(text))
            .map(|(_, reason)| reason.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// `min(cap, matches * per_match)`, the shared shape of the counting themes.
pub fn capped_weight(matches: usize, per_match: f64, cap: f64) -> f64 {
    (matches as f64 * per_match).min(cap)
}
