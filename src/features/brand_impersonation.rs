use super::{Detector, EvaluationContext, Signal};

const IMPERSONATION_WEIGHT: f64 = 0.25;

const BRAND_KEYWORDS: &[&str] = &[
    "paypal",
    "amazon",
    "microsoft",
    "apple",
    "google",
    "netflix",
    "bank",
    "santander",
    "bradesco",
    "itau",
    "nubank",
    "caixa",
    "banco do brasil",
    "support",
    "security team",
];

/// Throwaway TLDs that disqualify a From address even when it names the brand.
const DISQUALIFYING_SENDER_TLDS: &[&str] = &[".xyz", ".top", ".click"];

/// Flags mail that talks about a well-known brand while the From header
/// does not carry that brand's name.
///
/// The check is a substring test against the raw From value, not a parsed
/// domain comparison: `paypal.example.org` passes as PayPal. Only the first
/// qualifying brand is reported.
pub struct BrandImpersonationAnalyzer {
    brands: Vec<String>,
}

impl Default for BrandImpersonationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BrandImpersonationAnalyzer {
    pub fn new() -> Self {
        Self {
            brands: BRAND_KEYWORDS.iter().map(|b| b.to_string()).collect(),
        }
    }

    pub fn is_impersonating(&self, brand: &str, from_lower: &str) -> bool {
        !from_lower.contains(brand)
            || DISQUALIFYING_SENDER_TLDS
                .iter()
                .any(|tld| from_lower.contains(tld))
    }
}

impl Detector for BrandImpersonationAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        let from_lower = match context.raw_from_lower() {
            Some(from) => from,
            None => return Ok(Signal::none()),
        };

        for brand in &self.brands {
            if context.text.contains(brand.as_str()) && self.is_impersonating(brand, &from_lower) {
                log::debug!("Brand '{}' mentioned by unrelated sender {}", brand, from_lower);
                return Ok(Signal::new(
                    IMPERSONATION_WEIGHT,
                    format!("Possible brand impersonation: {}", brand),
                ));
            }
        }

        Ok(Signal::none())
    }

    fn name(&self) -> &str {
        "brand_impersonation"
    }
}
