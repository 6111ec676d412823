use super::{Detector, EvaluationContext, PatternSet, Signal};

const URGENCY_WEIGHT: f64 = 0.3;

const URGENCY_PATTERNS: &[&str] = &[
    r"\burgent\b",
    r"\bimmediately\b",
    r"\bsuspended\b",
    r"\bverify\b.*\baccount\b",
    r"\bconfirm\b.*\bidentity\b",
    r"\baction\s+required\b",
    r"\bwithin\s+\d+\s+hours?\b",
    r"\baccount\s+will\s+be\s+(closed|suspended|terminated)\b",
    r"\bfinal\s+warning\b",
    r"\blast\s+chance\b",
];

/// Pressure language ("act now or lose access"). Any hit contributes a flat
/// weight; the reason reports how many patterns fired.
pub struct UrgencyAnalyzer {
    patterns: PatternSet,
}

impl UrgencyAnalyzer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            patterns: PatternSet::from_patterns(URGENCY_PATTERNS)?,
        })
    }
}

impl Detector for UrgencyAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let matches = self.patterns.count_matches(&context.text);
        if matches == 0 {
            return Ok(Signal::none());
        }
        log::debug!("Urgency patterns matched: {}", matches);
        Ok(Signal::new(
            URGENCY_WEIGHT,
            format!("Urgency language detected ({} patterns)", matches),
        ))
    }

    fn name(&self) -> &str {
        "urgency"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalyzeRequest;

    fn evaluate(text: &str) -> Signal {
        let request = AnalyzeRequest::default();
        let context = EvaluationContext::new(&request, text.to_string(), String::new());
        UrgencyAnalyzer::new().unwrap().evaluate(&context).unwrap()
    }

    #[test]
    fn test_flat_weight_regardless_of_count() {
        let signal = evaluate("urgent: your account will be suspended immediately");
        assert_eq!(signal.weight, URGENCY_WEIGHT);
        assert_eq!(
            signal.reasons,
            vec!["Urgency language detected (4 patterns)".to_string()]
        );
    }

    #[test]
    fn test_time_window_pattern() {
        let signal = evaluate("please respond within 24 hours");
        assert_eq!(signal.weight, URGENCY_WEIGHT);
    }

    #[test]
    fn test_calm_text() {
        assert!(evaluate("minutes from the tuesday planning meeting").is_empty());
    }
}
