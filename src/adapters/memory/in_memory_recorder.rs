//! In-Memory Response Recorder
//!
//! Keeps sessions and answers in memory. Used by `--dry-run` and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp};
use crate::domain::session::{AnsweredQuestion, SessionSummary, StoredResponse};
use crate::domain::survey::QuestionRecord;
use crate::ports::ResponseRecorder;

#[derive(Debug, Default)]
struct Store {
    sessions: HashMap<SessionId, SessionSummary>,
    responses: HashMap<SessionId, Vec<StoredResponse>>,
}

/// In-memory storage for survey sessions.
///
/// Both maps sit behind one lock so an answer and its counter update are
/// observed together.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResponseRecorder {
    store: Arc<RwLock<Store>>,
}

impl InMemoryResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        let mut store = self.store.write().await;
        store.sessions.clear();
        store.responses.clear();
    }

    /// Number of known sessions.
    pub async fn session_count(&self) -> usize {
        self.store.read().await.sessions.len()
    }

    /// Number of stored answers across all sessions.
    pub async fn response_count(&self) -> usize {
        self.store.read().await.responses.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ResponseRecorder for InMemoryResponseRecorder {
    async fn ensure_schema(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn begin_session(
        &self,
        session_id: &SessionId,
        total_questions: u32,
    ) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        store
            .sessions
            .entry(session_id.clone())
            .and_modify(|summary| summary.restart(total_questions))
            .or_insert_with(|| SessionSummary::begin(session_id.clone(), total_questions));
        Ok(())
    }

    async fn record_response(
        &self,
        session_id: &SessionId,
        question: &QuestionRecord,
        answer: &str,
    ) -> Result<(), DomainError> {
        let answered = AnsweredQuestion::new(question.clone(), answer);
        let mut store = self.store.write().await;

        store
            .responses
            .entry(session_id.clone())
            .or_default()
            .push(StoredResponse::from_answered(&answered, Timestamp::now()));
        store
            .sessions
            .entry(session_id.clone())
            .and_modify(SessionSummary::record_answer)
            .or_insert_with(|| SessionSummary::from_first_response(session_id.clone()));
        Ok(())
    }

    async fn record_responses(
        &self,
        session_id: &SessionId,
        responses: &[AnsweredQuestion],
    ) -> Result<(), DomainError> {
        let count = u32::try_from(responses.len()).map_err(|_| {
            DomainError::database(format!("Count {} out of range", responses.len()))
        })?;
        let now = Timestamp::now();
        let mut store = self.store.write().await;

        store
            .responses
            .entry(session_id.clone())
            .or_default()
            .extend(responses.iter().map(|answered| StoredResponse::from_answered(answered, now)));
        store
            .sessions
            .entry(session_id.clone())
            .and_modify(|summary| summary.complete_batch(count))
            .or_insert_with(|| SessionSummary::from_batch(session_id.clone(), count));
        Ok(())
    }

    async fn complete_session(&self, session_id: &SessionId) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let summary = store.sessions.get_mut(session_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session_id),
            )
        })?;
        summary.complete();
        Ok(())
    }

    async fn session_responses(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<StoredResponse>, DomainError> {
        let store = self.store.read().await;
        Ok(store.responses.get(session_id).cloned().unwrap_or_default())
    }

    async fn session_summary(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionSummary>, DomainError> {
        Ok(self.store.read().await.sessions.get(session_id).cloned())
    }
}
