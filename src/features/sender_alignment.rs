use super::tld_risk::TldRiskTable;
use super::{Detector, EvaluationContext, PatternSet, Signal};
use crate::domain_utils::{DomainUtils, SenderAddress};
use crate::entropy;

const MISMATCH_WEIGHT: f64 = 0.3;

const DIGIT_DENSITY_WEIGHT: f64 = 0.15;
const SUBDOMAIN_ENTROPY_WEIGHT: f64 = 0.2;
const MAX_LOCAL_DIGITS: usize = 3;
const MAX_LOCAL_DIGIT_RATIO: f64 = 0.3;
const MIN_LOCAL_LEN_FOR_RATIO: usize = 5;
const MAX_PLAIN_LABELS: usize = 3;
const SUBDOMAIN_MIN_LEN: usize = 5;
const SUBDOMAIN_ENTROPY: f64 = 3.5;

const SENDER_TLD_WEIGHT: f64 = 0.2;
const MASS_MAILING_WEIGHT: f64 = 0.1;
const SHORT_BASE_WEIGHT: f64 = 0.05;
const SHORT_BASE_MAX_LEN: usize = 4;

const MASS_MAILING_PATTERNS: &[&str] = &[
    r"^(noreply|no-reply|mailer|bulk|newsletter|promo|marketing)[0-9._-]*@",
    r"^[a-z]+[0-9]{3,}@",
    r"@(mail|email|smtp|mx|send)[0-9]+\.",
];

fn require_sender<'a>(context: &'a EvaluationContext) -> anyhow::Result<Option<&'a SenderAddress>> {
    match (&context.sender, context.request.from_address()) {
        (Some(sender), _) => Ok(Some(sender)),
        (None, Some(raw)) => Err(anyhow::anyhow!("unparseable From address '{}'", raw)),
        (None, None) => Ok(None),
    }
}

/// From and Reply-To pointing at different domains.
pub struct HeaderMismatchAnalyzer;

impl HeaderMismatchAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeaderMismatchAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for HeaderMismatchAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let (from, reply_to) = match (context.request.from_address(), context.request.reply_to()) {
            (Some(from), Some(reply_to)) => (from, reply_to),
            _ => return Ok(Signal::none()),
        };

        let from_domain = DomainUtils::extract_domain(from);
        let reply_domain = DomainUtils::extract_domain(reply_to);
        match (from_domain, reply_domain) {
            (Some(from_domain), Some(reply_domain)) if from_domain != reply_domain => {
                log::debug!("Reply-To diverts {} to {}", from_domain, reply_domain);
                Ok(Signal::new(
                    MISMATCH_WEIGHT,
                    format!(
                        "From/Reply-To domain mismatch: {} vs {}",
                        from_domain, reply_domain
                    ),
                ))
            }
            _ => Ok(Signal::none()),
        }
    }

    fn name(&self) -> &str {
        "header_mismatch"
    }
}

/// Machine-generated looking sender addresses: digit-stuffed local parts and
/// random subdomains on deep hostnames.
pub struct SenderAnomalyAnalyzer;

impl SenderAnomalyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn has_excessive_digits(local_part: &str) -> bool {
        let length = local_part.chars().count();
        let digits = local_part.chars().filter(|c| c.is_ascii_digit()).count();
        digits > MAX_LOCAL_DIGITS
            || (length >= MIN_LOCAL_LEN_FOR_RATIO
                && digits as f64 / length as f64 > MAX_LOCAL_DIGIT_RATIO)
    }

    /// First label of a domain deeper than three labels, when it looks random.
    pub fn random_subdomain(domain: &str) -> Option<&str> {
        if DomainUtils::label_count(domain) <= MAX_PLAIN_LABELS {
            return None;
        }
        domain
            .split('.')
            .next()
            .filter(|label| entropy::is_high_entropy_label(label, SUBDOMAIN_MIN_LEN, SUBDOMAIN_ENTROPY))
    }
}

impl Default for SenderAnomalyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SenderAnomalyAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let sender = match require_sender(context)? {
            Some(sender) => sender,
            None => return Ok(Signal::none()),
        };

        let mut signal = Signal::none();
        if Self::has_excessive_digits(&sender.local_part) {
            signal.add(
                DIGIT_DENSITY_WEIGHT,
                "Sender address contains excessive digits",
            );
        }
        if let Some(label) = Self::random_subdomain(&sender.domain) {
            signal.add(
                SUBDOMAIN_ENTROPY_WEIGHT,
                format!("High-entropy sender subdomain: {}", label),
            );
        }
        Ok(signal)
    }

    fn name(&self) -> &str {
        "sender_anomaly"
    }
}

/// Sender reputation by shape: throwaway TLDs, bulk-mailer local parts and
/// tiny purely alphabetic domain names.
pub struct SuspiciousSenderAnalyzer {
    tlds: TldRiskTable,
    mass_mailing: PatternSet,
}

impl SuspiciousSenderAnalyzer {
    pub fn new(tlds: TldRiskTable) -> anyhow::Result<Self> {
        Ok(Self {
            tlds,
            mass_mailing: PatternSet::from_patterns(MASS_MAILING_PATTERNS)?,
        })
    }

    fn short_alphabetic_base(domain: &str) -> Option<&str> {
        DomainUtils::domain_base(domain).filter(|base| {
            !base.is_empty()
                && base.chars().count() <= SHORT_BASE_MAX_LEN
                && base.chars().all(|c| c.is_ascii_alphabetic())
        })
    }
}

impl Detector for SuspiciousSenderAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let sender = match require_sender(context)? {
            Some(sender) => sender,
            None => return Ok(Signal::none()),
        };

        let mut signal = Signal::none();
        if let Some(tld) = self.tlds.suspicious_tld(&sender.domain) {
            signal.add(SENDER_TLD_WEIGHT, format!("Sender uses suspicious TLD: .{}", tld));
        }
        if self.mass_mailing.first_match(&sender.address).is_some() {
            signal.add(
                MASS_MAILING_WEIGHT,
                "Sender address matches mass-mailing pattern",
            );
        }
        if let Some(base) = Self::short_alphabetic_base(&sender.domain) {
            signal.add(
                SHORT_BASE_WEIGHT,
                format!("Sender domain base is unusually short: {}", base),
            );
        }
        Ok(signal)
    }

    fn name(&self) -> &str {
        "suspicious_sender"
    }
}
