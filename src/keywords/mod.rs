//! Keyword detection: whole-word exact matching with an optional fuzzy fallback tier.
//!
//! Fuzzy matching compares each keyword against the *entire* cleaned transcript, and only
//! runs after an exact miss. The fuzzy backend is a [`FuzzyMatcher`] chosen at construction:
//! [`IndelRatio`] for real similarity, [`ExactOnly`] when fuzzy matching is unavailable.

pub mod fuzzy;


pub use fuzzy::{ExactOnly, FuzzyMatcher, IndelRatio, indel_ratio};

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::constants::DEFAULT_FUZZY_THRESHOLD;
use crate::text::clean;

/// Keyword matcher bound to a fuzzy backend and acceptance threshold.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    fuzzy: Arc<dyn FuzzyMatcher>,
    threshold: f64,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(Arc::new(IndelRatio), DEFAULT_FUZZY_THRESHOLD)
    }
}

impl KeywordMatcher {
    pub fn new(fuzzy: Arc<dyn FuzzyMatcher>, threshold: f64) -> Self {
        Self { fuzzy, threshold }
    }

    /// Matcher whose fuzzy tier degrades to exact matching.
    pub fn exact_only() -> Self {
        Self::new(Arc::new(ExactOnly), DEFAULT_FUZZY_THRESHOLD)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn supports_fuzzy(&self) -> bool {
        self.fuzzy.supports_fuzzy()
    }

    /// Keywords that occur as whole words (case-insensitive), in input order with original casing.
    pub fn find_exact(&self, text: &str, keywords: &[String]) -> Vec<String> {
        let haystack = clean(text).to_lowercase();
        keywords
            .iter()
            .filter(|kw| !kw.is_empty() && contains_whole_word(&haystack, kw))
            .cloned()
            .collect()
    }

    /// Exact match per keyword, falling back to a fuzzy ratio against the whole text.
    pub fn find_fuzzy(&self, text: &str, keywords: &[String]) -> Vec<String> {
        if !self.fuzzy.supports_fuzzy() {
            return self.find_exact(text, keywords);
        }

        let haystack = clean(text).to_lowercase();
        let mut found = Vec::new();
        for kw in keywords {
            if kw.is_empty() {
                continue;
            }
            if contains_whole_word(&haystack, kw) {
                found.push(kw.clone());
                continue;
            }
            let ratio = self.fuzzy.ratio(&kw.to_lowercase(), &haystack);
            if ratio >= self.threshold {
                debug!(keyword = %kw, ratio, "Fuzzy keyword match");
                found.push(kw.clone());
            }
        }
        found
    }

    /// Returns `(matched / total * 100, matched)`; fuzzy is only tried when exact finds nothing.
    pub fn keyword_score(
        &self,
        text: &str,
        keywords: &[String],
        use_fuzzy: bool,
    ) -> (f64, Vec<String>) {
        if keywords.is_empty() {
            return (0.0, Vec::new());
        }

        let mut matched = self.find_exact(text, keywords);
        if matched.is_empty() && use_fuzzy {
            matched = self.find_fuzzy(text, keywords);
        }

        let score = matched.len() as f64 / keywords.len() as f64 * 100.0;
        (score, matched)
    }
}

fn contains_whole_word(haystack: &str, keyword: &str) -> bool {
    let pattern = format!(r"\b{}\b", regex::escape(&keyword.to_lowercase()));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(haystack),
        Err(e) => {
            warn!(keyword = %keyword, error = %e, "Keyword pattern rejected, treating as miss");
            false
        }
    }
}
