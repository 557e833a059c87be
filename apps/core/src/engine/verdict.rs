//! Verdict types produced by the assessment engine.
//!
//! `Urgency` is ordered by ascending severity, so `Ord` comparisons express
//! "more urgent than" directly.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse severity classification of the reported symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }

    /// Parses a wire label, returning `None` for anything outside the closed set.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "moderate" => Some(RiskLevel::Moderate),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Recommended response timeframe, from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Routine,
    WithinWeek,
    #[serde(rename = "within_24_hours")]
    Within24Hours,
    Immediate,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Routine => "routine",
            Urgency::WithinWeek => "within_week",
            Urgency::Within24Hours => "within_24_hours",
            Urgency::Immediate => "immediate",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "routine" => Some(Urgency::Routine),
            "within_week" => Some(Urgency::WithinWeek),
            "within_24_hours" => Some(Urgency::Within24Hours),
            "immediate" => Some(Urgency::Immediate),
            _ => None,
        }
    }

    /// One step up the scale; `Immediate` is a fixed point.
    pub fn escalate(self) -> Self {
        match self {
            Urgency::Routine => Urgency::WithinWeek,
            Urgency::WithinWeek => Urgency::Within24Hours,
            Urgency::Within24Hours | Urgency::Immediate => Urgency::Immediate,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Final, immutable result of an assessment.
///
/// Fields are private; a verdict is only produced through [`VerdictBuilder`]
/// (which clamps confidence) or [`AssessmentVerdict::safe_default`].
/// Deserialising goes through [`StoredVerdict`] and rejects out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredVerdict")]
pub struct AssessmentVerdict {
    risk_level: RiskLevel,
    urgency: Urgency,
    confidence: f32,
    recommendations: Vec<String>,
    reasoning: String,
}

const SAFE_DEFAULT_RECOMMENDATIONS: &[&str] = &[
    "Contact your healthcare provider to discuss your symptoms",
    "Monitor symptoms closely and keep a detailed symptom diary",
    "Seek immediate medical attention if symptoms worsen or new symptoms develop",
    "Do not ignore concerning symptoms during pregnancy",
];

impl AssessmentVerdict {
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Conservative verdict returned when no scorer could produce one.
    /// Never `Low`.
    pub fn safe_default() -> Self {
        VerdictBuilder::new(RiskLevel::Moderate, Urgency::Within24Hours, 0.5)
            .recommendations(SAFE_DEFAULT_RECOMMENDATIONS.iter().copied())
            .reasoning(
                "Automated assessment was unavailable. Please consult with your healthcare \
                 provider for a comprehensive evaluation of your symptoms.",
            )
            .build()
    }
}

/// Mutable staging area for a verdict. The engine stages and adjusts here,
/// then freezes the result with [`VerdictBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictBuilder {
    pub risk_level: RiskLevel,
    pub urgency: Urgency,
    pub confidence: f32,
    pub recommendations: Vec<String>,
    pub reasoning: String,
}

impl VerdictBuilder {
    pub fn new(risk_level: RiskLevel, urgency: Urgency, confidence: f32) -> Self {
        Self {
            risk_level,
            urgency,
            confidence,
            recommendations: Vec::new(),
            reasoning: String::new(),
        }
    }

    pub fn recommendations<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Appends a sentence to the reasoning, separated by a single space.
    pub fn append_reasoning(&mut self, clause: &str) {
        if !self.reasoning.is_empty() && !self.reasoning.ends_with(' ') {
            self.reasoning.push(' ');
        }
        self.reasoning.push_str(clause);
    }

    /// Raises risk to at least `floor`.
    pub fn raise_risk(&mut self, floor: RiskLevel) {
        self.risk_level = self.risk_level.max(floor);
    }

    /// Raises urgency to at least `floor`.
    pub fn raise_urgency(&mut self, floor: Urgency) {
        self.urgency = self.urgency.max(floor);
    }

    pub fn build(self) -> AssessmentVerdict {
        let confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let recommendations = if self.recommendations.is_empty() {
            SAFE_DEFAULT_RECOMMENDATIONS
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            self.recommendations
        };

        AssessmentVerdict {
            risk_level: self.risk_level,
            urgency: self.urgency,
            confidence,
            recommendations,
            reasoning: self.reasoning,
        }
    }
}

/// Wire form of a verdict, checked before it becomes an [`AssessmentVerdict`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredVerdict {
    risk_level: RiskLevel,
    urgency: Urgency,
    confidence: f32,
    recommendations: Vec<String>,
    reasoning: String,
}

impl TryFrom<StoredVerdict> for AssessmentVerdict {
    type Error = AppError;

    fn try_from(stored: StoredVerdict) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&stored.confidence) {
            return Err(AppError::Validation(format!(
                "Verdict confidence {} is outside [0, 1]",
                stored.confidence
            )));
        }
        if stored.recommendations.iter().all(|r| r.trim().is_empty()) {
            return Err(AppError::Validation(
                "Verdict has no recommendations".to_string(),
            ));
        }

        Ok(Self {
            risk_level: stored.risk_level,
            urgency: stored.urgency,
            confidence: stored.confidence,
            recommendations: stored.recommendations,
            reasoning: stored.reasoning,
        })
    }
}
