use super::{Detector, EvaluationContext, PatternSet, Signal};

const VAGUE_SUBJECT_WEIGHT: f64 = 0.15;

// Anchored to the whole normalized subject so ordinary subjects that merely
// contain one of these words do not fire.
const VAGUE_SUBJECT_PATTERNS: &[(&str, &str)] = &[
    (
        r"^(your|my|the|new|a)?\s*(document|documents|file|files|invoice|payment|order|package|delivery)[.!:]?$",
        "Vague subject line referencing a document or payment",
    ),
    (
        r"^(re|fw|fwd)\s*:?\s*$",
        "Empty reply/forward subject line",
    ),
    (
        r"^(hi|hello|hey|dear|greetings|ol[áa]|oi)[.!,]?$",
        "Generic greeting used as subject line",
    ),
    (
        r"^(important|urgent|attention|notice|info|information|update|aviso|importante)[.!:]*$",
        "Single-word alarm subject line",
    ),
    (
        r"^(see|view|check|open)\s+(attached|attachment|this|document|file)[.!]?$",
        "Subject asks to open an unspecified attachment",
    ),
    (
        r"^(document|file)\s+(shared|sent|for\s+you)[.!]?$",
        "Subject announces an unspecified shared document",
    ),
];

/// Subjects that say nothing about the message, a common lure for opening a
/// link or attachment. Only the first matching shape is reported.
pub struct VagueSubjectAnalyzer {
    patterns: PatternSet,
}

impl VagueSubjectAnalyzer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            patterns: PatternSet::compile(VAGUE_SUBJECT_PATTERNS)?,
        })
    }
}

impl Detector for VagueSubjectAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        if context.subject.is_empty() {
            return Ok(Signal::none());
        }
        Ok(self
            .patterns
            .first_match(&context.subject)
            .map(|reason| Signal::new(VAGUE_SUBJECT_WEIGHT, reason))
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "vague_subject"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalyzeRequest;

    fn evaluate(subject: &str) -> Signal {
        let request = AnalyzeRequest::default();
        let context = EvaluationContext::new(&request, String::new(), subject.to_string());
        VagueSubjectAnalyzer::new().unwrap().evaluate(&context).unwrap()
    }

    #[test]
    fn test_vague_subjects() {
        let signal = evaluate("your document");
        assert_eq!(signal.weight, VAGUE_SUBJECT_WEIGHT);
        assert_eq!(
            signal.reasons,
            vec!["Vague subject line referencing a document or payment"]
        );

        assert!(!evaluate("invoice").is_empty());
        assert!(!evaluate("fwd:").is_empty());
        assert!(!evaluate("hello!").is_empty());
        assert!(!evaluate("important!!").is_empty());
        assert!(!evaluate("see attached").is_empty());
    }

    #[test]
    fn test_specific_subjects_do_not_fire() {
        assert!(evaluate("").is_empty());
        assert!(evaluate("your document review for the q3 budget").is_empty());
        assert!(evaluate("urgent: verify your account immediately").is_empty());
        assert!(evaluate("re: lunch on friday?").is_empty());
    }
}
