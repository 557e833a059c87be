use crate::engine::{AssessmentVerdict, SymptomReport};
use crate::error::AppError;
use async_trait::async_trait;

/// Defines the public interface for a risk scoring backend.
///
/// This trait abstracts the specific implementation of the scorer, allowing the
/// local rule engine, an external assessment service, or a chat model to be
/// used interchangeably and chained with fallbacks.
#[async_trait]
pub trait RiskScorer: Send + Sync + 'static {
    /// Short, stable name used in logs.
    fn name(&self) -> &'static str;

    /// Scores a pre-validated symptom report.
    async fn score(&self, report: &SymptomReport) -> Result<AssessmentVerdict, AppError>;
}
