use crate::domain_utils::DomainUtils;
use std::collections::HashSet;

/// TLDs with abuse rates high enough to count as evidence on their own.
pub const SUSPICIOUS_TLDS: &[&str] = &[
    "xyz", "top", "click", "link", "pw", "tk", "ml", "ga", "cf", "gq", "work", "party", "review",
    "country", "stream", "download", "racing", "win", "bid", "date", "faith", "loan", "men",
    "cricket", "science",
];

/// Lookup table shared by the URL and sender analyzers.
#[derive(Debug, Clone)]
pub struct TldRiskTable {
    suspicious: HashSet<String>,
}

impl Default for TldRiskTable {
    fn default() -> Self {
        Self::new(SUSPICIOUS_TLDS.iter().copied())
    }
}

impl TldRiskTable {
    pub fn new<'a>(tlds: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            suspicious: tlds
                .into_iter()
                .map(|tld| tld.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn is_suspicious(&self, tld: &str) -> bool {
        self.suspicious
            .contains(&tld.trim_start_matches('.').to_lowercase())
    }

    /// The domain's TLD when it is in the suspicious set.
    pub fn suspicious_tld(&self, domain: &str) -> Option<String> {
        DomainUtils::extract_tld(domain).filter(|tld| self.is_suspicious(tld))
    }
}
