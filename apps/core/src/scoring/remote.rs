//! Remote scoring delegates.
//!
//! Both delegates fail closed: transport errors, non-2xx statuses and payloads
//! that are not a JSON object or carry no recognised risk level come back as
//! errors so the caller can fall back to the local rules. The secondary fields
//! of an otherwise valid payload are coerced into range rather than rejected.

use crate::config::ChatModelConfig;
use crate::engine::patterns::{EMERGENCY_PATTERNS, MODERATE_PATTERNS};
use crate::engine::{AssessmentVerdict, RiskLevel, SymptomReport, Urgency, VerdictBuilder};
use crate::error::{AppError, AppResult};
use crate::scoring::traits::RiskScorer;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

const DEFAULT_REMOTE_CONFIDENCE: f32 = 0.7;
const CHAT_TEMPERATURE: f64 = 0.3;

const DEFAULT_REMOTE_RECOMMENDATIONS: &[&str] = &[
    "Contact your healthcare provider to discuss your symptoms",
    "Monitor symptoms closely",
    "Seek immediate care if symptoms worsen",
];

// NOTE: expect() is acceptable here, the pattern is a literal.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid regex: JSON object pattern"));

/// Builds a verdict from a remote JSON payload.
///
/// Accepts camelCase or snake_case keys. A missing or unknown risk level is an
/// error. Unknown urgency becomes `within_week`, confidence is clamped to [0, 1].
pub fn verdict_from_payload(payload: &Value, default_reasoning: &str) -> AppResult<AssessmentVerdict> {
    let object = payload
        .as_object()
        .ok_or_else(|| AppError::Remote("Response payload is not a JSON object".to_string()))?;
    let field = |camel: &str, snake: &str| object.get(camel).or_else(|| object.get(snake));

    let risk_level = field("riskLevel", "risk_level")
        .and_then(Value::as_str)
        .and_then(RiskLevel::from_label)
        .ok_or_else(|| AppError::Remote("Response payload has no recognised risk level".to_string()))?;

    let urgency = field("urgency", "urgency")
        .and_then(Value::as_str)
        .and_then(Urgency::from_label)
        .unwrap_or(Urgency::WithinWeek);

    let confidence = field("confidence", "confidence")
        .and_then(Value::as_f64)
        .map(|c| c as f32)
        .filter(|c| *c != 0.0)
        .unwrap_or(DEFAULT_REMOTE_CONFIDENCE);

    let recommendations: Vec<String> = match field("recommendations", "recommendations") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    let recommendations = if recommendations.is_empty() {
        DEFAULT_REMOTE_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
    } else {
        recommendations
    };

    let reasoning = field("reasoning", "reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_reasoning);

    Ok(VerdictBuilder::new(risk_level, urgency, confidence)
        .recommendations(recommendations)
        .reasoning(reasoning)
        .build())
}

fn request_body(report: &SymptomReport) -> Value {
    json!({
        "symptoms": report.symptoms,
        "gestationalWeek": report.gestational_week,
        "previousComplications": report.previous_complications,
        "additionalSymptoms": report.additional_notes,
    })
}

fn endpoint(base: &Url, path: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), path)
}

async fn ensure_success(res: reqwest::Response, backend: &str) -> AppResult<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(AppError::Remote(format!(
        "{} request failed with status {}: {}",
        backend, status, body
    )))
}

/// External assessment service exposing `POST /assess` with the host request shape.
#[derive(Debug, Clone)]
pub struct RemoteServiceScorer {
    client: Client,
    base_url: Url,
}

impl RemoteServiceScorer {
    pub fn new(base_url: Url, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl RiskScorer for RemoteServiceScorer {
    fn name(&self) -> &'static str {
        "assessment-service"
    }

    #[instrument(skip(self, report), fields(url = %self.base_url))]
    async fn score(&self, report: &SymptomReport) -> Result<AssessmentVerdict, AppError> {
        let res = self
            .client
            .post(endpoint(&self.base_url, "assess"))
            .json(&request_body(report))
            .send()
            .await?;
        let res = ensure_success(res, "Assessment service").await?;

        let payload: Value = res
            .json()
            .await
            .map_err(|e| AppError::Remote(format!("Malformed assessment service response: {}", e)))?;

        let verdict = verdict_from_payload(&payload, "Assessment completed using medical knowledge base")?;
        info!(risk = %verdict.risk_level(), "assessment service responded");
        Ok(verdict)
    }
}

/// OpenAI-compatible chat completion backend asked for a JSON verdict.
#[derive(Debug, Clone)]
pub struct ChatModelScorer {
    client: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

impl ChatModelScorer {
    pub fn new(config: &ChatModelConfig, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn headers(&self) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| AppError::Config(format!("Invalid API key header: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

/// Renders the pattern tables as prompt context, so the chat model and the
/// local rules share one knowledge base.
fn knowledge_context() -> String {
    let mut context = String::from("HIGH RISK PATTERNS:\n");
    for pattern in EMERGENCY_PATTERNS {
        context.push_str(&format!("- {} = {}\n", pattern.triggers.join(" / "), pattern.condition));
    }
    context.push_str("\nMODERATE RISK PATTERNS:\n");
    for pattern in MODERATE_PATTERNS {
        context.push_str(&format!("- {} = {}\n", pattern.triggers.join(" / "), pattern.condition));
    }
    context
}

pub(crate) fn build_prompt(report: &SymptomReport) -> String {
    let week = report
        .gestational_week
        .map(|w| w.to_string())
        .unwrap_or_else(|| "Not specified".to_string());
    let history = if report.has_previous_complications() { "Yes" } else { "No" };
    let notes = report
        .additional_notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("None provided");

    format!(
        "{context}\n\
         Analyze the following pregnancy symptoms using the knowledge above.\n\n\
         Patient Information:\n\
         - Symptoms: {symptoms}\n\
         - Gestational Week: {week}\n\
         - Previous Complications: {history}\n\
         - Additional Information: {notes}\n\n\
         Respond with a JSON object:\n\
         {{\"riskLevel\": \"low\" | \"moderate\" | \"high\", \"confidence\": 0.0-1.0, \
         \"recommendations\": [\"...\"], \"reasoning\": \"...\", \
         \"urgency\": \"routine\" | \"within_week\" | \"within_24_hours\" | \"immediate\"}}\n\
         Be conservative and err on the side of caution.",
        context = knowledge_context(),
        symptoms = report.symptoms.join(", "),
    )
}

/// Extracts the first-to-last brace span from free text and parses it.
pub(crate) fn extract_json_object(text: &str) -> AppResult<Value> {
    let span = JSON_OBJECT
        .find(text)
        .ok_or_else(|| AppError::Remote("No JSON object found in model output".to_string()))?;
    serde_json::from_str(span.as_str())
        .map_err(|e| AppError::Remote(format!("Model output is not valid JSON: {}", e)))
}

#[async_trait]
impl RiskScorer for ChatModelScorer {
    fn name(&self) -> &'static str {
        "chat-model"
    }

    #[instrument(skip(self, report), fields(model = %self.model))]
    async fn score(&self, report: &SymptomReport) -> Result<AssessmentVerdict, AppError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a medical AI assistant specializing in pregnancy health risk \
                                assessment. Always err on the side of caution and recommend medical \
                                consultation when in doubt."
                },
                { "role": "user", "content": build_prompt(report) }
            ],
            "response_format": { "type": "json_object" },
            "temperature": CHAT_TEMPERATURE,
        });

        let res = self
            .client
            .post(endpoint(&self.base_url, "chat/completions"))
            .headers(self.headers()?)
            .json(&payload)
            .send()
            .await?;
        let res = ensure_success(res, "Chat completion").await?;

        let json: Value = res
            .json()
            .await
            .map_err(|e| AppError::Remote(format!("Malformed chat completion response: {}", e)))?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::Remote("Chat completion has no message content".to_string()))?;

        let verdict = verdict_from_payload(
            &extract_json_object(content)?,
            "Assessment completed using medical guidelines",
        )?;
        info!(risk = %verdict.risk_level(), "chat model responded");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_coercion() {
        let verdict = verdict_from_payload(
            &json!({
                "riskLevel": "Moderate",
                "confidence": 4.2,
                "recommendations": "call someone",
                "urgency": "yesterday"
            }),
            "fallback reasoning",
        )
        .unwrap();
        assert_eq!(verdict.risk_level(), RiskLevel::Moderate);
        assert_eq!(verdict.urgency(), Urgency::WithinWeek);
        assert_eq!(verdict.confidence(), 1.0);
        assert_eq!(verdict.recommendations().len(), DEFAULT_REMOTE_RECOMMENDATIONS.len());
        assert_eq!(verdict.reasoning(), "fallback reasoning");
    }

    #[test]
    fn test_payload_snake_case_keys() {
        let verdict = verdict_from_payload(
            &json!({
                "risk_level": "high",
                "confidence": 0.92,
                "recommendations": ["Go to hospital"],
                "reasoning": "Concerning combination",
                "urgency": "immediate"
            }),
            "",
        )
        .unwrap();
        assert_eq!(verdict.risk_level(), RiskLevel::High);
        assert_eq!(verdict.urgency(), Urgency::Immediate);
        assert_eq!(verdict.recommendations(), ["Go to hospital".to_string()]);
    }

    #[test]
    fn test_payload_without_risk_level_is_rejected() {
        for payload in [
            json!({}),
            json!({ "error": "model overloaded" }),
            json!({ "riskLevel": "catastrophic", "urgency": "immediate" }),
            json!({ "riskLevel": 3 }),
        ] {
            assert!(
                matches!(verdict_from_payload(&payload, "x"), Err(AppError::Remote(_))),
                "{} should be rejected",
                payload
            );
        }
    }

    #[test]
    fn test_payload_must_be_object() {
        assert!(verdict_from_payload(&json!(["high"]), "").is_err());
        assert!(verdict_from_payload(&Value::Null, "").is_err());
    }

    #[test]
    fn test_extract_json_object_from_prose() {
        let value = extract_json_object("Sure! {\"riskLevel\": \"low\"} Hope this helps.").unwrap();
        assert_eq!(value["riskLevel"], "low");
        assert!(extract_json_object("no json here").is_err());
        assert!(extract_json_object("{not: json}").is_err());
    }

    #[test]
    fn test_prompt_contains_patient_context() {
        let report = SymptomReport::new(["fever", "chills"])
            .with_week(22)
            .with_previous_complications(true);
        let prompt = build_prompt(&report);
        assert!(prompt.contains("Symptoms: fever, chills"));
        assert!(prompt.contains("Gestational Week: 22"));
        assert!(prompt.contains("Previous Complications: Yes"));
        assert!(prompt.contains("Infection risk"));
    }

    #[test]
    fn test_endpoint_join() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(endpoint(&base, "assess"), "http://localhost:8000/assess");
        let base = Url::parse("https://api.openai.com/v1/").unwrap();
        assert_eq!(endpoint(&base, "chat/completions"), "https://api.openai.com/v1/chat/completions");
    }
}
