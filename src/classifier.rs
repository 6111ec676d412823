//! The classification engine.
//!
//! Holds the immutable detector table and runs one message through it:
//! normalize, evaluate every detector in a fixed order, aggregate, decide.
//! Nothing here mutates after construction, so one instance serves any
//! number of threads.

use crate::components::{AggregateScore, DecisionEngine, ScoreAggregator};
use crate::config::Settings;
use crate::features::attachment::PdfLinkAnalyzer;
use crate::features::brand_impersonation::BrandImpersonationAnalyzer;
use crate::features::link_analyzer::LinkAnalyzer;
use crate::features::phrases::{SpamPhraseAnalyzer, SuspiciousPhraseAnalyzer};
use crate::features::regional::{GovernmentImpersonationAnalyzer, RegionalUrgencyAnalyzer};
use crate::features::sender_alignment::{
    HeaderMismatchAnalyzer, SenderAnomalyAnalyzer, SuspiciousSenderAnalyzer,
};
use crate::features::subject::VagueSubjectAnalyzer;
use crate::features::tld_risk::TldRiskTable;
use crate::features::urgency::UrgencyAnalyzer;
use crate::features::{Detector, EvaluationContext, Signal};
use crate::models::{AnalyzeRequest, ClassificationResult, HealthResponse};
use crate::normalization::TextNormalizer;
use lazy_static::lazy_static;
use std::time::Instant;

lazy_static! {
    static ref SHARED_CLASSIFIER: ThreatClassifier = build_shared();
}

fn build_shared() -> ThreatClassifier {
    let settings = Settings::default().with_env_overrides();
    ThreatClassifier::new(settings)
        .or_else(|e| {
            log::warn!("Invalid engine settings ({:#}), using defaults", e);
            ThreatClassifier::new(Settings::default())
        })
        .expect("built-in detector patterns compile")
}

pub struct ThreatClassifier {
    settings: Settings,
    normalizer: TextNormalizer,
    detectors: Vec<Box<dyn Detector>>,
    decision_engine: DecisionEngine,
    started: Instant,
}

impl ThreatClassifier {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;
        let tlds = TldRiskTable::default();

        // Evaluation order is part of the calibration.
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(UrgencyAnalyzer::new()?),
            Box::new(BrandImpersonationAnalyzer::new()),
            Box::new(SuspiciousPhraseAnalyzer::new()?),
            Box::new(LinkAnalyzer::new(tlds.clone())),
            Box::new(HeaderMismatchAnalyzer::new()),
            Box::new(SenderAnomalyAnalyzer::new()),
            Box::new(RegionalUrgencyAnalyzer::new()?),
            Box::new(VagueSubjectAnalyzer::new()?),
            Box::new(SuspiciousSenderAnalyzer::new(tlds)?),
            Box::new(GovernmentImpersonationAnalyzer::new()?),
            Box::new(PdfLinkAnalyzer::new()),
            Box::new(SpamPhraseAnalyzer::new()?),
        ];

        log::debug!(
            "Classifier {} built with {} detectors",
            settings.model_version,
            detectors.len()
        );

        Ok(Self {
            normalizer: TextNormalizer::new(settings.max_text_length),
            decision_engine: DecisionEngine::new(settings.decision_config()),
            detectors,
            settings,
            started: Instant::now(),
        })
    }

    /// Process-wide instance built on first use from defaults plus
    /// `AI_ENGINE_*` overrides.
    pub fn shared() -> &'static ThreatClassifier {
        &SHARED_CLASSIFIER
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn model_version(&self) -> &str {
        &self.settings.model_version
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Runs every detector and returns the clamped totals with all reasons.
    pub fn aggregate(&self, request: &AnalyzeRequest) -> AggregateScore {
        let text = self.normalizer.unify(
            &request.subject,
            &request.body,
            request.pdf_text.as_deref(),
        );
        let subject = self.normalizer.normalize(&request.subject);
        let context = EvaluationContext::new(request, text, subject);

        let mut aggregator = ScoreAggregator::new();
        for detector in &self.detectors {
            let signal = detector.evaluate(&context).unwrap_or_else(|e| {
                log::warn!("Detector {} degraded to no signal: {:#}", detector.name(), e);
                Signal::none()
            });
            if !signal.is_empty() {
                log::debug!(
                    "{}: +{:.3} {:?}",
                    detector.name(),
                    signal.weight,
                    signal.reasons
                );
            }
            aggregator.add(detector.channel(), signal);
        }
        aggregator.finalize()
    }

    pub fn classify(&self, request: &AnalyzeRequest) -> ClassificationResult {
        let start = Instant::now();

        let aggregate = self.aggregate(request);
        let (phishing_score, spam_score) = (aggregate.phishing_score, aggregate.spam_score);
        let decision = self.decision_engine.make_decision(aggregate);

        let processing_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        log::info!(
            "Classification: {} (confidence={:.2}, score={:.1}, phishing={:.2}, spam={:.2})",
            decision.label,
            decision.confidence,
            decision.score,
            phishing_score,
            spam_score
        );

        ClassificationResult {
            label: decision.label,
            confidence: round_to(decision.confidence, 3),
            score: round_to(decision.score, 2),
            reasons: decision.reasons,
            processing_time_ms: round_to(processing_time_ms, 2),
            model_version: self.settings.model_version.clone(),
        }
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            model_loaded: !self.detectors.is_empty(),
            version: self.settings.app_version.clone(),
            uptime_seconds: round_to(self.started.elapsed().as_secs_f64(), 2),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
