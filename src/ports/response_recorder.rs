//! Response Recorder Port - Interface for persisting survey answers.
//!
//! Stores question/answer pairs keyed by `(session_id, question key)` and
//! keeps per-session progress counters.
//!
//! # Counter semantics
//!
//! - `begin_session` sets the expected total and reopens the session
//! - `record_response` adds one answer; an unknown session starts at 1 of 1
//! - `record_responses` writes a whole run and marks the session completed
//! - `complete_session` marks a session completed after incremental writes
//!
//! Every write is atomic: answers and the counter update land together.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{AnsweredQuestion, SessionSummary, StoredResponse};
use crate::domain::survey::QuestionRecord;

/// Port for persisting survey sessions and their answers.
#[async_trait]
pub trait ResponseRecorder: Send + Sync {
    /// Creates the backing storage if it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), DomainError>;

    /// Starts (or restarts) a session expecting `total_questions` answers.
    async fn begin_session(
        &self,
        session_id: &SessionId,
        total_questions: u32,
    ) -> Result<(), DomainError>;

    /// Stores a single answer and bumps the session's completed count.
    async fn record_response(
        &self,
        session_id: &SessionId,
        question: &QuestionRecord,
        answer: &str,
    ) -> Result<(), DomainError>;

    /// Stores a whole run's answers and marks the session completed.
    async fn record_responses(
        &self,
        session_id: &SessionId,
        responses: &[AnsweredQuestion],
    ) -> Result<(), DomainError>;

    /// Marks a session completed.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the session was never started.
    async fn complete_session(&self, session_id: &SessionId) -> Result<(), DomainError>;

    /// All answers of a session, in insertion order.
    async fn session_responses(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<StoredResponse>, DomainError>;

    /// Progress counters of a session, if it exists.
    async fn session_summary(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionSummary>, DomainError>;
}
