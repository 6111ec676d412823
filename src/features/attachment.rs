use super::{Detector, EvaluationContext, Signal};

const PDF_WITH_LINKS_WEIGHT: f64 = 0.2;

/// A PDF attachment combined with outbound links. The PDF extractor runs
/// upstream; only the presence of its text matters here.
pub struct PdfLinkAnalyzer;

impl PdfLinkAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfLinkAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PdfLinkAnalyzer {
    fn evaluate(&self, context: &EvaluationContext) -> anyhow::Result<Signal> {
        if context.request.pdf_text().is_some() && !context.request.urls.is_empty() {
            Ok(Signal::new(PDF_WITH_LINKS_WEIGHT, "PDF contains external URLs"))
        } else {
            Ok(Signal::none())
        }
    }

    fn name(&self) -> &str {
        "pdf_with_links"
    }
}
