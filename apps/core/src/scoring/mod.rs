//! # Scoring backends
//!
//! Interchangeable [`RiskScorer`] implementations and the fallback chain that
//! ties them together:
//!
//! assessment service → chat model → local rules
//!
//! Only the backends present in [`AppConfig`] take part. The local rules are
//! always last. The safe-default verdict sits above this chain, in
//! [`crate::service::AssessmentService`].

pub mod fallback;
pub mod local;
pub mod remote;
pub mod traits;

pub use fallback::FallbackScorer;
pub use local::RuleBasedScorer;
pub use remote::{ChatModelScorer, RemoteServiceScorer};
pub use traits::RiskScorer;

use crate::config::AppConfig;
use crate::error::AppResult;
use std::sync::Arc;
use tracing::info;

/// Assembles the scorer chain described by `config`.
pub fn build_scorer(config: &AppConfig) -> AppResult<Arc<dyn RiskScorer>> {
    let mut chain: Arc<dyn RiskScorer> = Arc::new(RuleBasedScorer::new());

    if let Some(chat) = &config.chat_model {
        let scorer = ChatModelScorer::new(chat, config.remote_timeout)?;
        chain = Arc::new(FallbackScorer::new(Arc::new(scorer), chain, config.remote_timeout));
    }

    if let Some(url) = &config.assessment_service_url {
        let scorer = RemoteServiceScorer::new(url.clone(), config.remote_timeout)?;
        chain = Arc::new(FallbackScorer::new(Arc::new(scorer), chain, config.remote_timeout));
    }

    info!(
        remote = config.has_remote_backend(),
        entry = chain.name(),
        "scorer chain assembled"
    );
    Ok(chain)
}
