//! Scoring Tests
//!
//! Remote delegates are exercised against a local mock server. The fallback
//! chain is exercised with in-process mock scorers.

use crate::config::{AppConfig, ChatModelConfig};
use crate::engine::{AssessmentVerdict, RiskEngine, RiskLevel, SymptomReport, Urgency, VerdictBuilder};
use crate::error::AppError;
use crate::scoring::{
    build_scorer, ChatModelScorer, FallbackScorer, RemoteServiceScorer, RiskScorer, RuleBasedScorer,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Mock Components ---

/// Scorer with scripted latency and outcome.
struct MockScorer {
    delay_ms: u64,
    should_fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockScorer {
    fn new(delay_ms: u64, should_fail: bool) -> Self {
        Self {
            delay_ms,
            should_fail,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RiskScorer for MockScorer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn score(&self, _report: &SymptomReport) -> Result<AssessmentVerdict, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_millis(self.delay_ms)).await;
        if self.should_fail {
            return Err(AppError::Remote("Simulated backend failure".to_string()));
        }
        Ok(VerdictBuilder::new(RiskLevel::Moderate, Urgency::WithinWeek, 0.42)
            .recommendations(["Mock recommendation"])
            .reasoning("Mock reasoning")
            .build())
    }
}

fn chat_config(server: &MockServer) -> ChatModelConfig {
    ChatModelConfig {
        api_key: "test-key".to_string(),
        base_url: Url::parse(&server.uri()).unwrap(),
        model: "test-model".to_string(),
    }
}

fn chat_completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[cfg(test)]
mod remote_service_tests {
    use super::*;

    #[tokio::test]
    async fn test_remote_service_success() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assess"))
            .and(body_partial_json(json!({ "symptoms": ["headache"], "gestationalWeek": 24 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "riskLevel": "high",
                "confidence": 0.88,
                "recommendations": ["Check blood pressure now"],
                "reasoning": "Headache in the second half of pregnancy",
                "urgency": "within_24_hours"
            })))
            .mount(&mock_server)
            .await;

        let scorer = RemoteServiceScorer::new(
            Url::parse(&mock_server.uri()).unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();

        // 2. Act
        let verdict = scorer
            .score(&SymptomReport::new(["headache"]).with_week(24))
            .await
            .unwrap();

        // 3. Assert
        assert_eq!(verdict.risk_level(), RiskLevel::High);
        assert_eq!(verdict.urgency(), Urgency::Within24Hours);
        assert!((verdict.confidence() - 0.88).abs() < 1e-6);
        assert_eq!(verdict.recommendations(), ["Check blood pressure now".to_string()]);
    }

    #[tokio::test]
    async fn test_remote_service_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assess"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let scorer = RemoteServiceScorer::new(
            Url::parse(&mock_server.uri()).unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = scorer.score(&SymptomReport::new(["fever"])).await;
        match result {
            Err(AppError::Remote(msg)) => {
                assert!(msg.contains("status 500"));
                assert!(msg.contains("Internal Server Error"));
            }
            other => panic!("Expected AppError::Remote, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remote_service_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assess"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&mock_server)
            .await;

        let scorer = RemoteServiceScorer::new(
            Url::parse(&mock_server.uri()).unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();

        assert!(matches!(
            scorer.score(&SymptomReport::new(["fever"])).await,
            Err(AppError::Remote(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_service_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assess"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "riskLevel": "low" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let scorer = RemoteServiceScorer::new(
            Url::parse(&mock_server.uri()).unwrap(),
            Duration::from_millis(100),
        )
        .unwrap();

        assert!(matches!(
            scorer.score(&SymptomReport::new(["fever"])).await,
            Err(AppError::Timeout(_))
        ));
    }
}

#[cfg(test)]
mod chat_model_tests {
    use super::*;

    #[tokio::test]
    async fn test_chat_model_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "response_format": { "type": "json_object" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(
                r#"{"riskLevel": "low", "confidence": 0.8, "recommendations": ["Rest"], "reasoning": "Common discomfort", "urgency": "routine"}"#,
            )))
            .mount(&mock_server)
            .await;

        let scorer = ChatModelScorer::new(&chat_config(&mock_server), Duration::from_secs(2)).unwrap();
        let verdict = scorer.score(&SymptomReport::new(["mild back pain"])).await.unwrap();

        assert_eq!(verdict.risk_level(), RiskLevel::Low);
        assert_eq!(verdict.urgency(), Urgency::Routine);
        assert_eq!(verdict.reasoning(), "Common discomfort");
    }

    #[tokio::test]
    async fn test_chat_model_json_wrapped_in_prose() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(
                "Here is my assessment:\n{\"riskLevel\": \"high\", \"urgency\": \"immediate\"}\nStay safe.",
            )))
            .mount(&mock_server)
            .await;

        let scorer = ChatModelScorer::new(&chat_config(&mock_server), Duration::from_secs(2)).unwrap();
        let verdict = scorer.score(&SymptomReport::new(["chest pain"])).await.unwrap();

        assert_eq!(verdict.risk_level(), RiskLevel::High);
        assert_eq!(verdict.urgency(), Urgency::Immediate);
        // Missing fields fall back to remote defaults.
        assert!((verdict.confidence() - 0.7).abs() < 1e-6);
        assert!(!verdict.recommendations().is_empty());
        assert_eq!(verdict.reasoning(), "Assessment completed using medical guidelines");
    }

    #[tokio::test]
    async fn test_chat_model_without_json_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_completion("I cannot help with that.")),
            )
            .mount(&mock_server)
            .await;

        let scorer = ChatModelScorer::new(&chat_config(&mock_server), Duration::from_secs(2)).unwrap();
        assert!(matches!(
            scorer.score(&SymptomReport::new(["fever"])).await,
            Err(AppError::Remote(_))
        ));
    }

    #[tokio::test]
    async fn test_chat_model_unauthorized() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&mock_server)
            .await;

        let scorer = ChatModelScorer::new(&chat_config(&mock_server), Duration::from_secs(2)).unwrap();
        match scorer.score(&SymptomReport::new(["fever"])).await {
            Err(AppError::Remote(msg)) => assert!(msg.contains("401")),
            other => panic!("Expected AppError::Remote, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod fallback_tests {
    use super::*;

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = Arc::new(MockScorer::new(0, false));
        let fallback = Arc::new(MockScorer::new(0, true));
        let fallback_calls = fallback.calls.clone();

        let chain = FallbackScorer::new(primary, fallback, Duration::from_secs(1));
        let verdict = chain.score(&SymptomReport::new(["fever"])).await.unwrap();

        assert_eq!(verdict.reasoning(), "Mock reasoning");
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_primary_uses_local_rules() {
        let report = SymptomReport::new(["severe headache", "vision changes"]);
        let chain = FallbackScorer::new(
            Arc::new(MockScorer::new(0, true)),
            Arc::new(RuleBasedScorer::new()),
            Duration::from_secs(1),
        );

        let verdict = chain.score(&report).await.unwrap();
        assert_eq!(verdict, RiskEngine::new().assess(&report));
    }

    #[tokio::test]
    async fn test_slow_primary_times_out() {
        let report = SymptomReport::new(["mild nausea"]);
        let primary = Arc::new(MockScorer::new(5_000, false));
        let primary_calls = primary.calls.clone();
        let chain = FallbackScorer::new(primary, Arc::new(RuleBasedScorer::new()), Duration::from_millis(50));

        let started = std::time::Instant::now();
        let verdict = chain.score(&report).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(verdict, RiskEngine::new().assess(&report));
    }

    #[tokio::test]
    async fn test_both_failing_propagates_error() {
        let chain = FallbackScorer::new(
            Arc::new(MockScorer::new(0, true)),
            Arc::new(MockScorer::new(0, true)),
            Duration::from_secs(1),
        );
        assert!(chain.score(&SymptomReport::new(["fever"])).await.is_err());
    }

    #[tokio::test]
    async fn test_chain_falls_through_service_and_chat_model() {
        // Both remote backends answer 503, so the local rules decide.
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&mock_server)
            .await;

        let config = AppConfig {
            assessment_service_url: Some(Url::parse(&mock_server.uri()).unwrap()),
            chat_model: Some(chat_config(&mock_server)),
            remote_timeout: Duration::from_secs(1),
            ..AppConfig::default()
        };
        let chain = build_scorer(&config).unwrap();

        let report = SymptomReport::new(["contractions"]).with_week(30);
        let verdict = chain.score(&report).await.unwrap();
        assert_eq!(verdict, RiskEngine::new().assess(&report));
        assert_eq!(verdict.risk_level(), RiskLevel::High);
    }

    #[tokio::test]
    async fn test_degraded_service_payload_falls_back_to_local_rules() {
        // 2xx with no verdict in it: the local rules must decide.
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assess"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "degraded" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = AppConfig {
            assessment_service_url: Some(Url::parse(&mock_server.uri()).unwrap()),
            remote_timeout: Duration::from_secs(1),
            ..AppConfig::default()
        };
        let chain = build_scorer(&config).unwrap();

        let report = SymptomReport::new(["chest pain"]);
        let verdict = chain.score(&report).await.unwrap();
        assert_eq!(verdict.risk_level(), RiskLevel::High);
        assert_eq!(verdict.urgency(), Urgency::Immediate);
        assert_eq!(verdict, RiskEngine::new().assess(&report));
    }

    #[tokio::test]
    async fn test_chain_without_remote_is_local_only() {
        let chain = build_scorer(&AppConfig::default()).unwrap();
        assert_eq!(chain.name(), "rules");
    }
}
