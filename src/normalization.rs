use regex::Regex;

/// Flattens message text into the single lower-cased form every text
/// detector matches against.
pub struct TextNormalizer {
    markup_regex: Regex,
    whitespace_regex: Regex,
    max_text_length: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TextNormalizer {
    /// `max_text_length` bounds how many characters of each field are kept
    /// before normalization. Zero disables the bound.
    pub fn new(max_text_length: usize) -> Self {
        Self {
            markup_regex: Regex::new(r"<[^>]+>").unwrap(),
            whitespace_regex: Regex::new(r"\s+").unwrap(),
            max_text_length,
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let stripped = self.markup_regex.replace_all(text, " ");
        let collapsed = self.whitespace_regex.replace_all(&stripped, " ");
        collapsed.to_lowercase().trim().to_string()
    }

    /// Joins subject, body and PDF text with single-space separators and
    /// normalizes the result.
    pub fn unify(&self, subject: &str, body: &str, pdf_text: Option<&str>) -> String {
        let combined = format!(
            "{} {} {}",
            self.bounded(subject),
            self.bounded(body),
            self.bounded(pdf_text.unwrap_or(""))
        );
        self.normalize(&combined)
    }

    fn bounded<'a>(&self, text: &'a str) -> &'a str {
        if self.max_text_length == 0 {
            return text;
        }
        match text.char_indices().nth(self.max_text_length) {
            Some((cut, _)) => {
                log::debug!(
                    "Truncating text field from {} bytes to {} characters",
                    text.len(),
                    self.max_text_length
                );
                &text[..cut]
            }
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markup_and_collapses_whitespace() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.normalize("<p>Hello\n\n  <b>WORLD</b></p>\t!"),
            "hello world !"
        );
    }

    #[test]
    fn test_empty_input() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.unify("", "", None), "");
    }

    #[test]
    fn test_unify_joins_fields() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.unify("Subject", "<div>Body</div>", Some("PDF Text")),
            "subject body pdf text"
        );
        assert_eq!(normalizer.unify("Subject", "Body", None), "subject body");
    }

    #[test]
    fn test_field_bound_respects_char_boundaries() {
        let normalizer = TextNormalizer::new(3);
        assert_eq!(normalizer.unify("ação urgente", "", None), "açã");
    }
}
