//! Brazilian Portuguese pressure language and government impersonation.
//!
//! Local scams lean on tax, traffic-fine and social-security agencies far
//! more than on commercial brands, so they get their own tables.

use super::{capped_weight, Detector, EvaluationContext, PatternSet, Signal};

const REGIONAL_PER_MATCH: f64 = 0.1;
const REGIONAL_CAP: f64 = 0.3;

const GOVERNMENT_WEIGHT: f64 = 0.3;

/// Official senders carry this suffix somewhere in their From value.
const OFFICIAL_SENDER_SUFFIX: &str = ".gov.br";

const REGIONAL_URGENCY_PATTERNS: &[&str] = &[
    r"\burgente\b",
    r"\bimediatamente\b",
    r"\bsua\s+conta\s+(ser[áa]|foi)\s+(bloqueada|suspensa|cancelada|encerrada)",
    r"\b(regularize|regularizar)\b",
    r"\bpend[êe]ncias?\b",
    r"\bprazo\s+de\s+\d+\s+(horas|dias)\b",
    r"\b(cpf|cnpj)\s+(irregular|bloqueado|suspenso|cancelado)",
    r"\b[úu]ltimo\s+aviso\b",
    r"\bevite\s+(multas?|bloqueio|protesto)\b",
    r"\b(clique|acesse)\s+(aqui|no\s+link)\b",
];

const GOVERNMENT_BODIES: &[(&str, &str)] = &[
    (r"\breceita\s+federal\b", "receita federal"),
    (r"\bdetran\b", "detran"),
    (r"\binss\b", "inss"),
    (r"\bgov\.br\b", "gov.br"),
    (r"\bgoverno\s+federal\b", "governo federal"),
    (r"\bpol[íi]cia\s+federal\b", "policia federal"),
    (r"\bminist[ée]rio\s+d[aoe]s?\b", "ministerio"),
    (r"\bjusti[çc]a\s+(eleitoral|federal)\b", "justica"),
    (r"\bprefeitura\b", "prefeitura"),
];

pub struct RegionalUrgencyAnalyzer {
    patterns: PatternSet,
}

impl RegionalUrgencyAnalyzer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            patterns: PatternSet::from_patterns(REGIONAL_URGENCY_PATTERNS)?,
        })
    }
}

impl Detector for RegionalUrgencyAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let matches = self.patterns.count_matches(&context.text);
        if matches == 0 {
            return Ok(Signal::none());
        }
        Ok(Signal::new(
            capped_weight(matches, REGIONAL_PER_MATCH, REGIONAL_CAP),
            format!("Regional urgency language detected ({} patterns)", matches),
        ))
    }

    fn name(&self) -> &str {
        "regional_urgency"
    }
}

/// Mail invoking a government body from a sender whose From value lacks the
/// official suffix. An absent From header counts as unofficial.
pub struct GovernmentImpersonationAnalyzer {
    bodies: PatternSet,
}

impl GovernmentImpersonationAnalyzer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            bodies: PatternSet::compile(GOVERNMENT_BODIES)?,
        })
    }
}

impl Detector for GovernmentImpersonationAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let body = match self.bodies.first_match(&context.text) {
            Some(body) => body,
            None => return Ok(Signal::none()),
        };

        let official = context
            .raw_from_lower()
            .map(|from| from.contains(OFFICIAL_SENDER_SUFFIX))
            .unwrap_or(false);
        if official {
            return Ok(Signal::none());
        }

        Ok(Signal::new(
            GOVERNMENT_WEIGHT,
            format!("Possible government impersonation: {}", body),
        ))
    }

    fn name(&self) -> &str {
        "government_impersonation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalyzeRequest;

    fn context<'a>(request: &'a AnalyzeRequest, text: &str) -> EvaluationContext<'a> {
        EvaluationContext::new(request, text.to_string(), String::new())
    }

    #[test]
    fn test_regional_urgency() {
        let request = AnalyzeRequest::default();
        let analyzer = RegionalUrgencyAnalyzer::new().unwrap();
        let signal = analyzer
            .evaluate(&context(
                &request,
                "urgente: sua conta será bloqueada. regularize imediatamente",
            ))
            .unwrap();
        assert_eq!(signal.weight, REGIONAL_CAP);
        assert_eq!(
            signal.reasons,
            vec!["Regional urgency language detected (4 patterns)"]
        );

        let calm = analyzer
            .evaluate(&context(&request, "reunião de equipe na terça"))
            .unwrap();
        assert!(calm.is_empty());
    }

    #[test]
    fn test_government_impersonation_from_unofficial_sender() {
        let request = AnalyzeRequest::new("", "").with_headers(Some("aviso@receita-online.com"), None);
        let analyzer = GovernmentImpersonationAnalyzer::new().unwrap();
        let signal = analyzer
            .evaluate(&context(&request, "a receita federal identificou pendências no seu cpf"))
            .unwrap();
        assert_eq!(signal.weight, GOVERNMENT_WEIGHT);
        assert_eq!(
            signal.reasons,
            vec!["Possible government impersonation: receita federal"]
        );
    }

    #[test]
    fn test_official_sender_is_exempt() {
        let request =
            AnalyzeRequest::new("", "").with_headers(Some("Receita <nao-responda@receita.fazenda.gov.br>"), None);
        let analyzer = GovernmentImpersonationAnalyzer::new().unwrap();
        let signal = analyzer
            .evaluate(&context(&request, "comunicado da receita federal"))
            .unwrap();
        assert!(signal.is_empty());
    }

    #[test]
    fn test_missing_sender_counts_as_unofficial() {
        let request = AnalyzeRequest::default();
        let analyzer = GovernmentImpersonationAnalyzer::new().unwrap();
        let signal = analyzer
            .evaluate(&context(&request, "multa do detran em aberto"))
            .unwrap();
        assert_eq!(signal.weight, GOVERNMENT_WEIGHT);
    }
}
