//! # Assessment Engine
//!
//! Pure, synchronous symptom-to-risk classifier. No I/O and no state beyond
//! the static pattern tables, so it is safe to call concurrently from any
//! number of requests.
//!
//! ## Components
//! - `patterns`: static knowledge base, partitioned into emergency and moderate bands
//! - `matcher`: substring matching of triggers against the joined symptom text
//! - `scorer`: base tier selection (emergency first, first match wins)
//! - `adjuster`: gestational-week, history and notes adjustments
//! - `verdict`: output types and the verdict builder
//! - `report`: engine input

pub mod adjuster;
pub mod matcher;
pub mod patterns;
pub mod report;
pub mod scorer;
pub mod verdict;

pub use adjuster::{Adjustment, ContextualAdjuster};
pub use matcher::{PatternMatch, PatternMatcher};
pub use patterns::{PatternBand, RiskPattern};
pub use report::SymptomReport;
pub use scorer::{BaseOutcome, TierSelector};
pub use verdict::{AssessmentVerdict, RiskLevel, Urgency, VerdictBuilder};

use tracing::debug;

/// Rule-based risk engine: matcher, tier selector and adjuster in sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskEngine {
    selector: TierSelector,
    adjuster: ContextualAdjuster,
}

impl RiskEngine {
    pub fn new() -> Self {
        Self {
            selector: TierSelector::new(),
            adjuster: ContextualAdjuster::new(),
        }
    }

    /// Scores a report. Never fails; an empty symptom list yields the routine verdict.
    pub fn assess(&self, report: &SymptomReport) -> AssessmentVerdict {
        let matcher = PatternMatcher::new(&report.symptoms);
        let (outcome, mut verdict) = self.selector.select(&matcher);
        let applied = self.adjuster.apply(report, &matcher, &mut verdict);

        match &outcome {
            BaseOutcome::Matched(hit) => debug!(
                condition = hit.pattern.condition,
                triggers = ?hit.matched_triggers,
                ?applied,
                "assessment rules applied"
            ),
            BaseOutcome::NoPattern => debug!(?applied, "no pattern matched"),
        }
        verdict.build()
    }
}

/// Function form of [`RiskEngine::assess`].
pub fn assess(
    symptoms: &[String],
    gestational_week: Option<u32>,
    previous_complications: Option<bool>,
    additional_notes: Option<&str>,
) -> AssessmentVerdict {
    let report = SymptomReport {
        symptoms: symptoms.to_vec(),
        gestational_week,
        previous_complications,
        additional_notes: additional_notes.map(str::to_string),
    };
    RiskEngine::new().assess(&report)
}
