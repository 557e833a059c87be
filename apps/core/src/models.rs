use crate::engine::{AssessmentVerdict, RiskLevel, SymptomReport, Urgency};
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Incoming assessment request, as posted by a host front-end.
///
/// This is the validation boundary: a malformed gestational week is rejected
/// here and never reaches the engine.
#[derive(Debug, Serialize, Deserialize, Clone, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    /// Free-text symptom strings, in the order the user reported them.
    pub symptoms: Vec<String>,
    /// Completed weeks of pregnancy.
    #[validate(range(min = 1, max = 42))]
    #[serde(default)]
    pub gestational_week: Option<u32>,
    #[serde(default)]
    pub previous_complications: Option<bool>,
    /// Free-text notes; passed through to the reasoning, never parsed.
    #[validate(length(max = 2000))]
    #[serde(default, alias = "additionalNotes")]
    pub additional_symptoms: Option<String>,
}

impl AssessmentRequest {
    /// Parses and validates a JSON request body.
    pub fn from_json(body: &str) -> AppResult<Self> {
        let request: Self = serde_json::from_str(body)?;
        request.validate()?;
        Ok(request)
    }

    pub fn to_report(&self) -> SymptomReport {
        SymptomReport {
            symptoms: self.symptoms.clone(),
            gestational_week: self.gestational_week,
            previous_complications: self.previous_complications,
            additional_notes: self.additional_symptoms.clone(),
        }
    }

    fn additional_info(&self) -> Option<AdditionalInfo> {
        if self.gestational_week.is_none()
            && self.previous_complications.is_none()
            && self.additional_symptoms.is_none()
        {
            return None;
        }
        Some(AdditionalInfo {
            gestational_week: self.gestational_week,
            previous_complications: self.previous_complications,
            additional_symptoms: self.additional_symptoms.clone(),
        })
    }
}

/// Context submitted alongside the symptoms, kept with the stored record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub gestational_week: Option<u32>,
    pub previous_complications: Option<bool>,
    pub additional_symptoms: Option<String>,
}

/// Everything the host needs to persist one scored assessment, minus the
/// store-assigned id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssessment {
    pub session_id: String,
    pub symptoms: Vec<String>,
    pub additional_info: Option<AdditionalInfo>,
    pub verdict: AssessmentVerdict,
}

impl NewAssessment {
    pub fn new(session_id: String, request: &AssessmentRequest, verdict: AssessmentVerdict) -> Self {
        Self {
            session_id,
            symptoms: request.symptoms.clone(),
            additional_info: request.additional_info(),
            verdict,
        }
    }
}

/// A persisted assessment. Immutable once created.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: u64,
    pub session_id: String,
    pub symptoms: Vec<String>,
    pub additional_info: Option<AdditionalInfo>,
    pub verdict: AssessmentVerdict,
    pub created_at: DateTime<Utc>,
}

/// Transport shape returned to a host after scoring. Output only.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    /// Absent only if the record could not be persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<u64>,
    pub session_id: String,
    pub risk_level: RiskLevel,
    pub urgency: Urgency,
    pub confidence: f32,
    pub recommendations: Vec<String>,
    pub ai_analysis: String,
    pub created_at: DateTime<Utc>,
}

impl AssessmentResponse {
    pub fn from_verdict(
        assessment_id: Option<u64>,
        session_id: String,
        verdict: &AssessmentVerdict,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            assessment_id,
            session_id,
            risk_level: verdict.risk_level(),
            urgency: verdict.urgency(),
            confidence: verdict.confidence(),
            recommendations: verdict.recommendations().to_vec(),
            ai_analysis: verdict.reasoning().to_string(),
            created_at,
        }
    }
}

impl From<&AssessmentRecord> for AssessmentResponse {
    fn from(record: &AssessmentRecord) -> Self {
        Self::from_verdict(
            Some(record.id),
            record.session_id.clone(),
            &record.verdict,
            record.created_at,
        )
    }
}

/// Catalog entry used to populate a symptom picker. The engine never sees these ids.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub severity_weight: u8,
}
