use crate::engine::{AssessmentVerdict, SymptomReport};
use crate::error::AppError;
use crate::scoring::traits::RiskScorer;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

/// Tries `primary` under a bounded timeout and hands the report to `fallback`
/// on any failure. Primary errors are logged, never returned.
#[derive(Clone)]
pub struct FallbackScorer {
    primary: Arc<dyn RiskScorer>,
    fallback: Arc<dyn RiskScorer>,
    timeout: Duration,
}

impl FallbackScorer {
    pub fn new(primary: Arc<dyn RiskScorer>, fallback: Arc<dyn RiskScorer>, timeout: Duration) -> Self {
        Self {
            primary,
            fallback,
            timeout,
        }
    }
}

#[async_trait]
impl RiskScorer for FallbackScorer {
    fn name(&self) -> &'static str {
        "fallback"
    }

    #[instrument(skip(self, report), fields(primary = self.primary.name(), fallback = self.fallback.name()))]
    async fn score(&self, report: &SymptomReport) -> Result<AssessmentVerdict, AppError> {
        let failure = match timeout(self.timeout, self.primary.score(report)).await {
            Ok(Ok(verdict)) => return Ok(verdict),
            Ok(Err(e)) => e,
            Err(elapsed) => AppError::from(elapsed),
        };

        warn!(
            "{} unavailable, using {}: {}",
            self.primary.name(),
            self.fallback.name(),
            failure
        );
        let verdict = self.fallback.score(report).await?;
        info!(scorer = self.fallback.name(), "fallback scorer produced verdict");
        Ok(verdict)
    }
}
