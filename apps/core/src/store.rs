//! Assessment storage and identifier generation.
//!
//! The store is an injected dependency owned by the host process. The engine
//! never touches it.

use crate::error::AppResult;
use crate::models::{AssessmentRecord, NewAssessment};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Produces primary keys for stored assessments.
pub trait IdGenerator: Send + Sync + 'static {
    fn next_id(&self) -> u64;
}

/// Monotonic counter starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// Produces the opaque session token handed back to the client.
pub trait SessionTokenGenerator: Send + Sync + 'static {
    fn next_token(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSessionTokens;

impl SessionTokenGenerator for UuidSessionTokens {
    fn next_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Append-only repository of scored assessments.
#[async_trait]
pub trait AssessmentStore: Send + Sync + 'static {
    /// Persists a new assessment, assigning its id and creation timestamp.
    async fn create(&self, assessment: NewAssessment) -> AppResult<AssessmentRecord>;

    async fn get(&self, id: u64) -> AppResult<Option<AssessmentRecord>>;

    /// The first assessment recorded under a session token.
    async fn get_by_session(&self, session_id: &str) -> AppResult<Option<AssessmentRecord>>;
}

/// Ephemeral in-memory store. Contents live as long as the process.
pub struct InMemoryAssessmentStore {
    records: RwLock<HashMap<u64, AssessmentRecord>>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(SequentialIdGenerator::new()))
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            ids,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryAssessmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn create(&self, assessment: NewAssessment) -> AppResult<AssessmentRecord> {
        let record = AssessmentRecord {
            id: self.ids.next_id(),
            session_id: assessment.session_id,
            symptoms: assessment.symptoms,
            additional_info: assessment.additional_info,
            verdict: assessment.verdict,
            created_at: Utc::now(),
        };

        self.records.write().await.insert(record.id, record.clone());
        info!(id = record.id, "assessment stored");
        Ok(record)
    }

    async fn get(&self, id: u64) -> AppResult<Option<AssessmentRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn get_by_session(&self, session_id: &str) -> AppResult<Option<AssessmentRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.session_id == session_id)
            .min_by_key(|r| r.id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AssessmentVerdict;

    fn new_assessment(session: &str) -> NewAssessment {
        NewAssessment {
            session_id: session.to_string(),
            symptoms: vec!["fever".to_string()],
            additional_info: None,
            verdict: AssessmentVerdict::safe_default(),
        }
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::starting_at(41);
        assert_eq!(ids.next_id(), 41);
        assert_eq!(ids.next_id(), 42);
    }

    #[test]
    fn test_uuid_tokens_are_unique() {
        let tokens = UuidSessionTokens;
        assert_ne!(tokens.next_token(), tokens.next_token());
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryAssessmentStore::new();
        let record = store.create(new_assessment("s-1")).await.unwrap();
        assert_eq!(record.id, 1);

        let fetched = store.get(1).await.unwrap().unwrap();
        assert_eq!(fetched, record);
        assert!(store.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_session_returns_first() {
        let store = InMemoryAssessmentStore::new();
        store.create(new_assessment("a")).await.unwrap();
        store.create(new_assessment("b")).await.unwrap();
        store.create(new_assessment("b")).await.unwrap();

        let found = store.get_by_session("b").await.unwrap().unwrap();
        assert_eq!(found.id, 2);
        assert!(store.get_by_session("missing").await.unwrap().is_none());
        assert_eq!(store.len().await, 3);
    }
}
