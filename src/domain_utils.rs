/// Minimal address and domain helpers shared by the sender and URL analyzers
pub struct DomainUtils;

/// An email address split into its two halves, both lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderAddress {
    pub address: String,
    pub local_part: String,
    pub domain: String,
}

impl DomainUtils {
    /// Unwrap a `Name <user@host>` header value into the bare address
    pub fn extract_address(header_value: &str) -> String {
        let trimmed = header_value.trim();
        if let (Some(start), Some(end)) = (trimmed.rfind('<'), trimmed.rfind('>')) {
            if start < end {
                return trimmed[start + 1..end].trim().to_lowercase();
            }
        }
        trimmed.to_lowercase()
    }

    /// Substring after the last `@`, as written (no case folding)
    pub fn raw_domain(address: &str) -> Option<&str> {
        address
            .rsplit_once('@')
            .map(|(_, domain)| domain.trim_end_matches('>').trim())
            .filter(|domain| !domain.is_empty())
    }

    /// Extract domain from email address
    pub fn extract_domain(email: &str) -> Option<String> {
        Self::raw_domain(&Self::extract_address(email)).map(|d| d.to_lowercase())
    }

    pub fn parse_sender(header_value: &str) -> Option<SenderAddress> {
        let address = Self::extract_address(header_value);
        let (local_part, domain) = address.rsplit_once('@')?;
        if local_part.is_empty() || domain.is_empty() {
            return None;
        }
        Some(SenderAddress {
            local_part: local_part.to_string(),
            domain: domain.to_string(),
            address: address.clone(),
        })
    }

    /// Rightmost label of a domain, if the domain has at least two labels
    pub fn extract_tld(domain: &str) -> Option<String> {
        let parts: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
        if parts.len() >= 2 {
            parts.last().map(|tld| tld.to_lowercase())
        } else {
            None
        }
    }

    /// Label immediately left of the TLD (`example` in `mail.example.com`)
    pub fn domain_base(domain: &str) -> Option<&str> {
        let parts: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
        if parts.len() >= 2 {
            Some(parts[parts.len() - 2])
        } else {
            None
        }
    }

    pub fn label_count(domain: &str) -> usize {
        domain
            .trim_end_matches('.')
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
    }
}
