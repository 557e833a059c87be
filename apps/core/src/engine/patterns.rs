//! Static knowledge base of symptom patterns.
//!
//! Declaration order matters: within a band the first pattern with a matching
//! trigger wins, so higher-acuity patterns are declared first.

use super::verdict::{RiskLevel, Urgency};

/// Priority partition of the knowledge base. Emergency is always checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternBand {
    Emergency,
    Moderate,
}

impl PatternBand {
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            PatternBand::Emergency => RiskLevel::High,
            PatternBand::Moderate => RiskLevel::Moderate,
        }
    }

    pub fn urgency(&self) -> Urgency {
        match self {
            PatternBand::Emergency => Urgency::Immediate,
            PatternBand::Moderate => Urgency::Within24Hours,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            PatternBand::Emergency => EMERGENCY_CONFIDENCE,
            PatternBand::Moderate => MODERATE_CONFIDENCE,
        }
    }
}

/// A named cluster of trigger phrases tied to a clinical concern.
#[derive(Debug, PartialEq, Eq)]
pub struct RiskPattern {
    /// Lower-case phrases, matched by substring containment.
    pub triggers: &'static [&'static str],
    pub condition: &'static str,
    /// Pattern-specific advice. Moderate patterns share [`MODERATE_RECOMMENDATIONS`].
    pub recommendations: &'static [&'static str],
}

pub const EMERGENCY_CONFIDENCE: f32 = 0.9;
pub const MODERATE_CONFIDENCE: f32 = 0.75;
pub const ROUTINE_CONFIDENCE: f32 = 0.7;

pub static EMERGENCY_PATTERNS: &[RiskPattern] = &[
    RiskPattern {
        triggers: &["severe headache", "vision changes", "vision"],
        condition: "Preeclampsia risk",
        recommendations: &[
            "Seek immediate medical attention",
            "Blood pressure check needed",
            "Protein urine test required",
        ],
    },
    RiskPattern {
        triggers: &["heavy bleeding", "severe bleeding", "severe cramping"],
        condition: "Hemorrhage risk",
        recommendations: &[
            "Go to emergency room immediately",
            "Call 911 if bleeding is severe",
            "Do not delay medical care",
        ],
    },
    RiskPattern {
        triggers: &["fever", "chills"],
        condition: "Infection risk",
        recommendations: &[
            "Contact healthcare provider immediately",
            "Temperature monitoring",
            "Blood work may be needed",
        ],
    },
    RiskPattern {
        triggers: &["chest pain", "difficulty breathing"],
        condition: "Cardiovascular emergency",
        recommendations: &[
            "Call 911 immediately",
            "Go to emergency room",
            "May indicate heart or lung problems",
        ],
    },
    RiskPattern {
        triggers: &["fainting", "severe dizziness"],
        condition: "Circulatory emergency",
        recommendations: &[
            "Seek immediate medical evaluation",
            "Blood pressure and heart rate check",
            "IV fluids may be needed",
        ],
    },
    RiskPattern {
        triggers: &["no fetal movement"],
        condition: "Fetal distress",
        recommendations: &[
            "Go to labor and delivery or the emergency room immediately",
            "Fetal heart rate monitoring needed",
            "Do not wait to see if movement returns",
        ],
    },
    RiskPattern {
        triggers: &["severe abdominal pain"],
        condition: "Abdominal emergency",
        recommendations: &[
            "Seek immediate medical evaluation",
            "Ultrasound may be needed to rule out ectopic pregnancy or abruption",
            "Do not take pain medication before being assessed",
        ],
    },
];

pub static MODERATE_PATTERNS: &[RiskPattern] = &[
    RiskPattern {
        triggers: &["bleeding", "cramping"],
        condition: "Potential complications",
        recommendations: MODERATE_RECOMMENDATIONS,
    },
    RiskPattern {
        triggers: &["headache", "swelling"],
        condition: "Pre-eclampsia monitoring",
        recommendations: MODERATE_RECOMMENDATIONS,
    },
    RiskPattern {
        triggers: &["vomiting", "persistent vomiting"],
        condition: "Hyperemesis concern",
        recommendations: MODERATE_RECOMMENDATIONS,
    },
    RiskPattern {
        triggers: &["contractions", "regular contractions"],
        condition: "Preterm labor risk",
        recommendations: MODERATE_RECOMMENDATIONS,
    },
    RiskPattern {
        triggers: &["decreased fetal movement", "reduced fetal movement"],
        condition: "Reduced fetal movement",
        recommendations: MODERATE_RECOMMENDATIONS,
    },
    RiskPattern {
        triggers: &["elevated blood pressure", "high blood pressure"],
        condition: "Hypertension monitoring",
        recommendations: MODERATE_RECOMMENDATIONS,
    },
];

pub const MODERATE_RECOMMENDATIONS: &[&str] = &[
    "Contact healthcare provider within 24 hours",
    "Monitor symptoms closely",
    "Seek immediate care if symptoms worsen",
    "Keep a symptom diary",
];

pub const ROUTINE_RECOMMENDATIONS: &[&str] = &[
    "Continue routine prenatal care as scheduled",
    "Monitor symptoms and contact your provider if they worsen",
    "Maintain healthy pregnancy practices",
    "Keep emergency contact numbers readily available",
];

/// Returns the patterns of a band in declaration order.
pub fn band(band: PatternBand) -> &'static [RiskPattern] {
    match band {
        PatternBand::Emergency => EMERGENCY_PATTERNS,
        PatternBand::Moderate => MODERATE_PATTERNS,
    }
}
