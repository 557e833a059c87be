//! Pattern matcher.
//!
//! Matching is plain substring containment over the lower-cased, space-joined
//! symptom text. Short triggers can hit inside unrelated words and negations
//! are not understood ("no bleeding" matches `bleeding`). That limitation is
//! kept on purpose; see DESIGN.md.

use super::patterns::{self, PatternBand, RiskPattern};

/// Normalised view over one report's symptom strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatcher {
    text: String,
}

/// One matched pattern together with the trigger phrases that hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub band: PatternBand,
    pub pattern: &'static RiskPattern,
    pub matched_triggers: Vec<&'static str>,
}

impl PatternMatcher {
    pub fn new<S: AsRef<str>>(symptoms: &[S]) -> Self {
        let text = symptoms
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self { text }
    }

    /// The joined, lower-cased text the patterns are matched against.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True if `term` (expected lower-case) occurs anywhere in the text.
    pub fn contains(&self, term: &str) -> bool {
        !term.is_empty() && self.text.contains(term)
    }

    pub fn contains_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|t| self.contains(t))
    }

    /// The first matching pattern of a band, if any.
    pub fn first_match(&self, band: PatternBand) -> Option<PatternMatch> {
        patterns::band(band)
            .iter()
            .find_map(|pattern| self.match_pattern(band, pattern))
    }

    fn match_pattern(&self, band: PatternBand, pattern: &'static RiskPattern) -> Option<PatternMatch> {
        let matched_triggers: Vec<&'static str> = pattern
            .triggers
            .iter()
            .copied()
            .filter(|t| self.contains(t))
            .collect();

        if matched_triggers.is_empty() {
            None
        } else {
            Some(PatternMatch {
                band,
                pattern,
                matched_triggers,
            })
        }
    }
}
