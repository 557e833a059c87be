use crate::catalog::SymptomCatalog;
use crate::engine::{AssessmentVerdict, SymptomReport};
use crate::error::{AppError, AppResult};
use crate::models::{AssessmentRecord, AssessmentRequest, AssessmentResponse, NewAssessment, Symptom};
use crate::scoring::RiskScorer;
use crate::store::{AssessmentStore, SessionTokenGenerator, UuidSessionTokens};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

/// Host-facing entry point.
///
/// Orchestrates one assessment end to end:
/// 1. Validates the request (the only step allowed to fail).
/// 2. Scores it through the configured scorer chain.
/// 3. Substitutes the safe-default verdict if the chain fails.
/// 4. Persists the record under a fresh session token.
#[derive(Clone)]
pub struct AssessmentService {
    scorer: Arc<dyn RiskScorer>,
    store: Arc<dyn AssessmentStore>,
    tokens: Arc<dyn SessionTokenGenerator>,
    catalog: SymptomCatalog,
}

impl AssessmentService {
    pub fn new(scorer: Arc<dyn RiskScorer>, store: Arc<dyn AssessmentStore>) -> Self {
        Self {
            scorer,
            store,
            tokens: Arc::new(UuidSessionTokens),
            catalog: SymptomCatalog,
        }
    }

    pub fn with_session_tokens(mut self, tokens: Arc<dyn SessionTokenGenerator>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Parses, validates and submits a JSON request body.
    pub async fn submit_json(&self, body: &str) -> AppResult<AssessmentResponse> {
        let request = AssessmentRequest::from_json(body)?;
        self.submit(request).await
    }

    /// Scores and stores an assessment. Fails only on invalid input.
    #[instrument(skip(self, request), fields(symptoms = request.symptoms.len()))]
    pub async fn submit(&self, request: AssessmentRequest) -> AppResult<AssessmentResponse> {
        request.validate()?;

        let verdict = self.score_or_default(&request.to_report()).await;
        let session_id = self.tokens.next_token();
        let assessment = NewAssessment::new(session_id.clone(), &request, verdict.clone());

        match self.store.create(assessment).await {
            Ok(record) => {
                info!(
                    id = record.id,
                    risk = %record.verdict.risk_level(),
                    urgency = %record.verdict.urgency(),
                    "assessment completed"
                );
                Ok(AssessmentResponse::from(&record))
            }
            Err(e) => {
                error!("Failed to persist assessment, returning unsaved verdict: {}", e);
                Ok(AssessmentResponse::from_verdict(None, session_id, &verdict, Utc::now()))
            }
        }
    }

    /// Runs the scorer chain, replacing any failure with the safe default.
    pub async fn score_or_default(&self, report: &SymptomReport) -> AssessmentVerdict {
        match self.scorer.score(report).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(scorer = self.scorer.name(), "Scoring failed, using safe default: {}", e);
                AssessmentVerdict::safe_default()
            }
        }
    }

    pub async fn get(&self, id: u64) -> AppResult<AssessmentRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("assessment {}", id)))
    }

    pub async fn get_by_session(&self, session_id: &str) -> AppResult<AssessmentRecord> {
        self.store
            .get_by_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session {}", session_id)))
    }

    pub fn symptoms(&self) -> &'static [Symptom] {
        self.catalog.all()
    }

    pub fn symptoms_by_category(&self, category: &str) -> Vec<&'static Symptom> {
        self.catalog.by_category(category)
    }

    pub fn symptom(&self, id: u32) -> AppResult<&'static Symptom> {
        self.catalog
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("symptom {}", id)))
    }
}
