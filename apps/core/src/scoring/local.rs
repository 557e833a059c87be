use crate::engine::{AssessmentVerdict, RiskEngine, SymptomReport};
use crate::error::AppError;
use crate::scoring::traits::RiskScorer;
use async_trait::async_trait;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

/// Local rule-based scorer backed by [`RiskEngine`].
///
/// The engine itself cannot fail, but a panic inside it is caught here and
/// reported as `AppError::Internal` so the caller can fall back to the safe
/// default instead of losing the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedScorer {
    engine: RiskEngine,
}

impl RuleBasedScorer {
    pub fn new() -> Self {
        Self {
            engine: RiskEngine::new(),
        }
    }
}

#[async_trait]
impl RiskScorer for RuleBasedScorer {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn score(&self, report: &SymptomReport) -> Result<AssessmentVerdict, AppError> {
        catch_unwind(AssertUnwindSafe(|| self.engine.assess(report))).map_err(|payload| {
            let message = panic_message(payload.as_ref());
            error!("Rule engine panicked: {}", message);
            AppError::Internal(format!("Rule engine panicked: {}", message))
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
