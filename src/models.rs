//! Request and response contracts.
//!
//! Field names follow the JSON shape the mail filter's scoring module sends
//! and expects back, so renames here are wire-visible.

use crate::error::{RequestError, RequestResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationLabel {
    Legit,
    Spam,
    Phishing,
    Fraud,
}

impl ClassificationLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationLabel::Legit => "legit",
            ClassificationLabel::Spam => "spam",
            ClassificationLabel::Phishing => "phishing",
            ClassificationLabel::Fraud => "fraud",
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailHeaders {
    #[serde(rename = "from", alias = "from_address", default)]
    pub from_address: Option<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
    // Accepted for contract compatibility; no detector reads these yet.
    #[serde(default)]
    pub return_path: Option<String>,
    #[serde(default)]
    pub x_mailer: Option<String>,
}

/// One message to classify. Immutable for the duration of a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeRequest {
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub pdf_text: Option<String>,
    #[serde(default)]
    pub headers: Option<EmailHeaders>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl AnalyzeRequest {
    /// Parse a request at the boundary. Missing `subject`/`body` and unknown
    /// fields are rejected here so the engine only ever sees valid input.
    pub fn from_json(json: &str) -> RequestResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pdf_text(mut self, text: impl Into<String>) -> Self {
        self.pdf_text = Some(text.into());
        self
    }

    pub fn with_headers(mut self, from: Option<&str>, reply_to: Option<&str>) -> Self {
        self.headers = Some(EmailHeaders {
            from_address: from.map(str::to_string),
            reply_to: reply_to.map(str::to_string),
            ..Default::default()
        });
        self
    }

    pub fn from_address(&self) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.from_address.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn reply_to(&self) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.reply_to.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// PDF text counts as present only when non-empty.
    pub fn pdf_text(&self) -> Option<&str> {
        self.pdf_text.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: ClassificationLabel,
    pub confidence: f64,
    /// Label-weighted value consumed by the downstream filter's threshold.
    pub score: f64,
    pub reasons: Vec<String>,
    pub processing_time_ms: f64,
    pub model_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
    pub uptime_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub email_id: String,
    pub original_label: ClassificationLabel,
    pub correct_label: ClassificationLabel,
    #[serde(default)]
    pub user_notes: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl FeedbackRequest {
    pub fn from_json(json: &str) -> RequestResult<Self> {
        let feedback: FeedbackRequest = serde_json::from_str(json)?;
        if feedback.email_id.trim().is_empty() {
            return Err(RequestError::MissingField("email_id"));
        }
        Ok(feedback)
    }
}
