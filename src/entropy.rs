//! Shannon entropy of short identifiers.
//!
//! Used as an anomaly proxy by the sender and URL analyzers: a subdomain or
//! host label with a flat character distribution is more likely to be
//! machine generated than typed by a person.

use std::collections::HashMap;

/// Shannon entropy in bits per symbol, computed over characters.
pub fn shannon_entropy(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let mut frequencies: HashMap<char, usize> = HashMap::new();
    let mut length = 0usize;
    for c in text.chars() {
        *frequencies.entry(c).or_insert(0) += 1;
        length += 1;
    }

    let length = length as f64;
    frequencies
        .values()
        .map(|&count| {
            let p = count as f64 / length;
            -p * p.log2()
        })
        .sum()
}

/// True when `label` is longer than `min_len` characters and its entropy
/// exceeds `threshold`.
pub fn is_high_entropy_label(label: &str, min_len: usize, threshold: f64) -> bool {
    label.chars().count() > min_len && shannon_entropy(label) > threshold
}
