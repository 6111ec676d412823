use super::{capped_weight, Channel, Detector, EvaluationContext, PatternSet, Signal};

const SUSPICIOUS_PER_MATCH: f64 = 0.1;
const SUSPICIOUS_CAP: f64 = 0.3;

const SPAM_PER_MATCH: f64 = 0.15;
const SPAM_CAP: f64 = 0.5;

const SUSPICIOUS_PHRASES: &[&str] = &[
    r"click\s+(here|below|the\s+link)",
    r"update\s+your\s+(payment|billing|account)",
    r"your\s+account\s+has\s+been\s+(compromised|hacked)",
    r"unusual\s+(activity|login|sign-in)",
    r"verify\s+your\s+identity",
    r"confirm\s+your\s+password",
    r"win\s+\$?\d+",
    r"you\s+have\s+won",
    r"lottery\s+winner",
    r"inheritance\s+from",
    r"nigerian\s+prince",
    r"transfer\s+\$?\d+\s*(million|thousand)?",
];

const SPAM_PHRASES: &[&str] = &[
    r"\bfree\b.*\b(offer|gift|trial)\b",
    r"\blimited\s+time\b",
    r"\bact\s+now\b",
    r"\bcongratulations\b",
    r"\bunsubscribe\b",
    r"\bclick\s+here\b",
    r"\bbuy\s+now\b",
    r"\bdiscount\b.*\b\d+%",
];

/// Social-engineering phrasing typical of credential theft and advance-fee
/// scams. Each distinct phrase adds weight up to a cap.
pub struct SuspiciousPhraseAnalyzer {
    patterns: PatternSet,
}

impl SuspiciousPhraseAnalyzer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            patterns: PatternSet::from_patterns(SUSPICIOUS_PHRASES)?,
        })
    }
}

impl Detector for SuspiciousPhraseAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let matches = self.patterns.count_matches(&context.text);
        if matches == 0 {
            return Ok(Signal::none());
        }
        Ok(Signal::new(
            capped_weight(matches, SUSPICIOUS_PER_MATCH, SUSPICIOUS_CAP),
            format!("Suspicious phrases detected ({} patterns)", matches),
        ))
    }

    fn name(&self) -> &str {
        "suspicious_phrases"
    }
}

/// Bulk-marketing phrasing. Feeds the spam total only.
pub struct SpamPhraseAnalyzer {
    patterns: PatternSet,
}

impl SpamPhraseAnalyzer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            patterns: PatternSet::from_patterns(SPAM_PHRASES)?,
        })
    }
}

impl Detector for SpamPhraseAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let matches = self.patterns.count_matches(&context.text);
        if matches == 0 {
            return Ok(Signal::none());
        }
        Ok(Signal::new(
            capped_weight(matches, SPAM_PER_MATCH, SPAM_CAP),
            format!("Spam phrases detected ({} patterns)", matches),
        ))
    }

    fn name(&self) -> &str {
        "spam_phrases"
    }

    fn channel(&self) -> Channel {
        Channel::Spam
    }
}
