//! Contextual adjustments applied after tier selection.
//!
//! Rules run in a fixed order and may only tighten risk or urgency. The one
//! exception to "tighten" is the preterm rule, which replaces the base
//! verdict outright (still never lower than before).

use super::matcher::PatternMatcher;
use super::patterns::EMERGENCY_CONFIDENCE;
use super::report::SymptomReport;
use super::verdict::{RiskLevel, Urgency, VerdictBuilder};

const FIRST_TRIMESTER_END: u32 = 12;
const PRETERM_START: u32 = 20;
const TERM_START: u32 = 37;

const EARLY_PREGNANCY_TERMS: &[&str] = &["bleeding", "cramping", "spotting"];
const CONTRACTIONS: &str = "contractions";
const HISTORY_CONFIDENCE_BOOST: f32 = 0.1;

const PRETERM_RECOMMENDATIONS: &[&str] = &[
    "Seek immediate medical attention",
    "Possible preterm labor",
    "Hospital evaluation required",
];

/// A rule that fired during adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    FirstTrimesterCaution,
    PretermOverride,
    TermLaborNote,
    PreviousComplications,
    AdditionalNotes,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ContextualAdjuster;

impl ContextualAdjuster {
    pub fn new() -> Self {
        Self
    }

    /// Applies every rule in order and returns the ones that fired.
    pub fn apply(
        &self,
        report: &SymptomReport,
        matcher: &PatternMatcher,
        verdict: &mut VerdictBuilder,
    ) -> Vec<Adjustment> {
        let mut applied = Vec::new();

        if let Some(week) = report.gestational_week {
            if Self::first_trimester(week, matcher, verdict) {
                applied.push(Adjustment::FirstTrimesterCaution);
            }
            if Self::preterm_contractions(week, matcher, verdict) {
                applied.push(Adjustment::PretermOverride);
            }
            if Self::term_contractions(week, matcher, verdict) {
                applied.push(Adjustment::TermLaborNote);
            }
        }

        if report.has_previous_complications() && Self::previous_complications(verdict) {
            applied.push(Adjustment::PreviousComplications);
        }

        if let Some(notes) = report.additional_notes.as_deref() {
            if Self::additional_notes(notes, verdict) {
                applied.push(Adjustment::AdditionalNotes);
            }
        }

        applied
    }

    fn first_trimester(week: u32, matcher: &PatternMatcher, verdict: &mut VerdictBuilder) -> bool {
        if week >= FIRST_TRIMESTER_END
            || verdict.risk_level == RiskLevel::High
            || !matcher.contains_any(EARLY_PREGNANCY_TERMS)
        {
            return false;
        }

        if verdict.urgency == Urgency::Routine {
            verdict.raise_urgency(Urgency::Within24Hours);
            verdict.raise_risk(RiskLevel::Moderate);
        }
        verdict
            .recommendations
            .push("First trimester bleeding or cramping requires prompt evaluation".to_string());
        verdict.append_reasoning(&format!(
            "First trimester (week {}) bleeding or cramping warrants prompt evaluation.",
            week
        ));
        true
    }

    fn preterm_contractions(week: u32, matcher: &PatternMatcher, verdict: &mut VerdictBuilder) -> bool {
        if !(PRETERM_START..TERM_START).contains(&week) || !matcher.contains(CONTRACTIONS) {
            return false;
        }

        verdict.risk_level = RiskLevel::High;
        verdict.urgency = Urgency::Immediate;
        verdict.confidence = verdict.confidence.max(EMERGENCY_CONFIDENCE);
        verdict.recommendations = PRETERM_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect();
        verdict.reasoning = format!(
            "Preterm contractions detected at week {}; immediate evaluation required.",
            week
        );
        true
    }

    fn term_contractions(week: u32, matcher: &PatternMatcher, verdict: &mut VerdictBuilder) -> bool {
        if week < TERM_START || !matcher.contains(CONTRACTIONS) {
            return false;
        }

        verdict
            .recommendations
            .push("Full-term pregnancy - contractions may indicate labor".to_string());
        verdict.append_reasoning("Term pregnancy with contractions; labor assessment may be needed.");
        true
    }

    fn previous_complications(verdict: &mut VerdictBuilder) -> bool {
        if verdict.risk_level == RiskLevel::Low {
            return false;
        }

        verdict.urgency = verdict.urgency.escalate();
        verdict.confidence = (verdict.confidence + HISTORY_CONFIDENCE_BOOST).min(1.0);
        verdict.recommendations.push(
            "Previous complications increase current risk - seek prompt medical evaluation"
                .to_string(),
        );
        verdict.append_reasoning("Previous pregnancy complications noted in assessment.");
        true
    }

    fn additional_notes(notes: &str, verdict: &mut VerdictBuilder) -> bool {
        let notes = notes.trim();
        if notes.is_empty() {
            return false;
        }
        let terminator = if notes.ends_with(['.', '!', '?']) { "" } else { "." };
        verdict.append_reasoning(&format!("Additional reported symptoms: {}{}", notes, terminator));
        true
    }
}
