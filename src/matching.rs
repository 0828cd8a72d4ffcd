// src/matching.rs

//! Keyword relevance and location eligibility.
//!
//! Keyword lists are matched as substrings of the normalized title, so short
//! keywords such as `ai` also hit unrelated words. Location variants are
//! substrings of the punctuation-stripped location text in the same way, so
//! `us` also hits `houston` or `australia`.

use std::collections::HashSet;

use crate::models::FilterConfig;

/// Trim and lower-case text before any comparison.
pub fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Lower-case, unify dashes, and turn every run of non-alphanumerics into a
/// single space.
///
/// `"Seattle, WA, USA"` becomes `"seattle wa usa"` and `"U.S."` becomes `"u s"`.
pub fn normalize_location(s: &str) -> String {
    let lowered = s.to_lowercase().replace(['\u{2013}', '\u{2014}'], "-");
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Filters built from the configured keyword and location lists.
#[derive(Debug, Clone)]
pub struct Matcher {
    keywords: Vec<String>,
    exclude: Vec<String>,
    us_variants: Vec<String>,
}

impl Matcher {
    pub fn new(filters: &FilterConfig) -> Self {
        let clean = |items: &[String], f: fn(&str) -> String| -> Vec<String> {
            let mut seen = HashSet::new();
            items
                .iter()
                .map(|s| f(s))
                .filter(|s| !s.is_empty() && seen.insert(s.clone()))
                .collect()
        };

        Self {
            keywords: clean(&filters.keywords, normalize_text),
            exclude: clean(&filters.exclude, normalize_text),
            us_variants: clean(&filters.us_variants, normalize_location),
        }
    }

    /// True iff the title contains an inclusion keyword and no exclusion keyword.
    pub fn keyword_match(&self, title: &str) -> bool {
        let t = normalize_text(title);
        if t.is_empty() {
            return false;
        }
        self.keywords.iter().any(|k| t.contains(k.as_str())) && !self.contains_excluded(&t)
    }

    /// True if the text mentions any exclusion keyword.
    ///
    /// Used on secondary vendor fields such as a subtitle or commitment.
    pub fn mentions_excluded(&self, text: &str) -> bool {
        self.contains_excluded(&normalize_text(text))
    }

    fn contains_excluded(&self, normalized: &str) -> bool {
        self.exclude.iter().any(|x| normalized.contains(x.as_str()))
    }

    /// True if the location is remote or names the United States.
    pub fn is_eligible_location(&self, location: &str) -> bool {
        if location.to_lowercase().contains("remote") {
            return true;
        }
        let normalized = normalize_location(location);
        if normalized.is_empty() {
            return false;
        }
        self.us_variants
            .iter()
            .any(|v| normalized.contains(v.as_str()))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}

/// True if the page body mentions one of the phrases, case-insensitively.
pub fn mentions_any(body: &str, phrases: &[String]) -> bool {
    let lowered = body.to_lowercase();
    phrases
        .iter()
        .map(|p| p.trim().to_lowercase())
        .any(|p| !p.is_empty() && lowered.contains(&p))
}
