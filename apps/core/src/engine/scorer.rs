//! Tier selection: turns pattern matches into a base verdict.

use super::matcher::{PatternMatch, PatternMatcher};
use super::patterns::{PatternBand, ROUTINE_CONFIDENCE, ROUTINE_RECOMMENDATIONS};
use super::verdict::{RiskLevel, Urgency, VerdictBuilder};

/// Which rule produced the base verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseOutcome {
    Matched(PatternMatch),
    NoPattern,
}

/// Selects the base tier. Emergency short-circuits the moderate band and only
/// the first match of a band is used, so extra matches never escalate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TierSelector;

impl TierSelector {
    pub fn new() -> Self {
        Self
    }

    pub fn select(&self, matcher: &PatternMatcher) -> (BaseOutcome, VerdictBuilder) {
        if let Some(hit) = matcher.first_match(PatternBand::Emergency) {
            let verdict = Self::from_match(&hit).reasoning(format!(
                "{} detected; immediate evaluation required.",
                hit.pattern.condition
            ));
            return (BaseOutcome::Matched(hit), verdict);
        }

        if let Some(hit) = matcher.first_match(PatternBand::Moderate) {
            let verdict = Self::from_match(&hit).reasoning(format!(
                "{} identified; monitor and consult provider.",
                hit.pattern.condition
            ));
            return (BaseOutcome::Matched(hit), verdict);
        }

        let verdict = VerdictBuilder::new(RiskLevel::Low, Urgency::Routine, ROUTINE_CONFIDENCE)
            .recommendations(ROUTINE_RECOMMENDATIONS.iter().copied())
            .reasoning("No high- or moderate-risk pattern detected; standard guidance applies.");
        (BaseOutcome::NoPattern, verdict)
    }

    fn from_match(hit: &PatternMatch) -> VerdictBuilder {
        VerdictBuilder::new(hit.band.risk_level(), hit.band.urgency(), hit.band.confidence())
            .recommendations(hit.pattern.recommendations.iter().copied())
    }
}
