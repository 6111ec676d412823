use super::tld_risk::TldRiskTable;
use super::{Detector, EvaluationContext, Signal};
use crate::entropy;
use regex::Regex;
use url::{Host, Url};

const IP_HOST_WEIGHT: f64 = 0.3;
const SUSPICIOUS_TLD_WEIGHT: f64 = 0.2;
const ENCODING_WEIGHT: f64 = 0.2;
const LOGIN_KEYWORD_WEIGHT: f64 = 0.15;
const LONG_URL_WEIGHT: f64 = 0.1;
const LONG_PLAINTEXT_URL_WEIGHT: f64 = 0.05;
const HOST_ENTROPY_WEIGHT: f64 = 0.15;

const MAX_ENCODED_OCTETS: usize = 3;
const LONG_URL_LENGTH: usize = 100;
const HOST_LABEL_MIN_LEN: usize = 7;
const HOST_LABEL_ENTROPY: f64 = 3.8;

/// Cap applied to the summed per-URL weight before scaling.
const URL_TOTAL_CAP: f64 = 1.0;
/// Share of the capped URL score that reaches the phishing total.
const URL_SCORE_MULTIPLIER: f64 = 0.5;

const LOGIN_KEYWORDS: &[&str] = &["login", "signin", "verify", "secure", "account"];

/// Per-URL findings before scaling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlAssessment {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Structural URL heuristics: raw IP hosts, throwaway TLDs, obfuscating
/// percent-encoding, credential keywords, length, and random-looking hosts.
pub struct LinkAnalyzer {
    encoded_octet_regex: Regex,
    tlds: TldRiskTable,
}

impl LinkAnalyzer {
    pub fn new(tlds: TldRiskTable) -> Self {
        Self {
            encoded_octet_regex: Regex::new(r"%[0-9a-fA-F]{2}").unwrap(),
            tlds,
        }
    }

    /// Scores one URL. Returns `None` when the URL cannot be parsed or has no
    /// host; such URLs contribute nothing.
    pub fn assess_url(&self, raw: &str) -> Option<UrlAssessment> {
        let parsed = match Url::parse(raw.trim()) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("Skipping unparseable URL '{}': {}", raw, e);
                return None;
            }
        };
        let host = parsed.host()?;

        let mut assessment = UrlAssessment::default();
        let mut add = |weight: f64, reason: String| {
            assessment.score += weight;
            assessment.reasons.push(reason);
        };

        match &host {
            Host::Ipv4(_) => add(
                IP_HOST_WEIGHT,
                "URL contains IP address instead of domain".to_string(),
            ),
            Host::Domain(domain) => {
                if let Some(tld) = self.tlds.suspicious_tld(domain) {
                    add(SUSPICIOUS_TLD_WEIGHT, format!("Suspicious TLD: .{}", tld));
                }
            }
            Host::Ipv6(_) => {}
        }

        if self.encoded_octet_regex.find_iter(raw).count() > MAX_ENCODED_OCTETS {
            add(
                ENCODING_WEIGHT,
                "URL contains excessive encoding".to_string(),
            );
        }

        let lower = raw.to_lowercase();
        if LOGIN_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
            add(
                LOGIN_KEYWORD_WEIGHT,
                "URL contains login-related keywords".to_string(),
            );
        }

        if raw.chars().count() > LONG_URL_LENGTH {
            add(LONG_URL_WEIGHT, "Unusually long URL".to_string());
            if parsed.scheme() == "http" {
                add(
                    LONG_PLAINTEXT_URL_WEIGHT,
                    "Long URL served without TLS".to_string(),
                );
            }
        }

        if let Host::Domain(domain) = &host {
            if let Some(label) = first_host_label(domain) {
                if entropy::is_high_entropy_label(label, HOST_LABEL_MIN_LEN, HOST_LABEL_ENTROPY) {
                    add(
                        HOST_ENTROPY_WEIGHT,
                        format!("High-entropy URL host label: {}", label),
                    );
                }
            }
        }

        Some(assessment)
    }

    /// Sum over all URLs, capped, with every reason in input order.
    pub fn analyze_urls(&self, urls: &[String]) -> UrlAssessment {
        let mut total = UrlAssessment::default();
        for url in urls {
            if let Some(assessment) = self.assess_url(url) {
                total.score += assessment.score;
                total.reasons.extend(assessment.reasons);
            }
        }
        total.score = total.score.min(URL_TOTAL_CAP);
        total
    }
}

/// First label of the host that is not `www`.
fn first_host_label(domain: &str) -> Option<&str> {
    domain
        .split('.')
        .find(|label| !label.is_empty() && !label.eq_ignore_ascii_case("www"))
}

impl Detector for LinkAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let urls = &context.request.urls;
        if urls.is_empty() {
            return Ok(Signal::none());
        }

        let assessment = self.analyze_urls(urls);
        log::debug!(
            "URL analysis over {} URLs: raw score {:.2}",
            urls.len(),
            assessment.score
        );
        Ok(Signal {
            weight: assessment.score * URL_SCORE_MULTIPLIER,
            reasons: assessment.reasons,
        })
    }

    fn name(&self) -> &str {
        "url_analysis"
    }
}
