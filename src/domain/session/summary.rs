//! SessionSummary - per-session progress counters.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, SessionStatus, Timestamp};

/// Progress of one survey session.
///
/// Tracks how many questions the run expects and how many answers have been
/// recorded so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub total_questions: u32,
    pub completed_questions: u32,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl SessionSummary {
    /// A session expecting `total_questions` answers, none recorded yet.
    pub fn begin(session_id: SessionId, total_questions: u32) -> Self {
        let now = Timestamp::now();
        Self {
            session_id,
            total_questions,
            completed_questions: 0,
            status: SessionStatus::InProgress,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// A session first seen through a single recorded answer.
    pub fn from_first_response(session_id: SessionId) -> Self {
        Self {
            total_questions: 1,
            completed_questions: 1,
            ..Self::begin(session_id, 1)
        }
    }

    /// A session written in one batch of `count` answers.
    pub fn from_batch(session_id: SessionId, count: u32) -> Self {
        let mut summary = Self::begin(session_id, count);
        summary.complete_batch(count);
        summary
    }

    /// Restarts the session with a new expected total.
    pub fn restart(&mut self, total_questions: u32) {
        self.total_questions = total_questions;
        self.status = SessionStatus::InProgress;
        self.completed_at = None;
        self.updated_at = Timestamp::now();
    }

    /// Counts one more recorded answer.
    ///
    /// The total grows with the count, so `completed <= total` always holds.
    pub fn record_answer(&mut self) {
        self.completed_questions += 1;
        self.total_questions = self.total_questions.max(self.completed_questions);
        self.updated_at = Timestamp::now();
    }

    /// Marks the session completed after a batch of `count` answers.
    pub fn complete_batch(&mut self, count: u32) {
        self.total_questions = count;
        self.completed_questions = count;
        self.complete();
    }

    /// Marks the session completed.
    pub fn complete(&mut self) {
        let now = Timestamp::now();
        self.status = SessionStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    /// Questions still unanswered.
    pub fn remaining(&self) -> u32 {
        self.total_questions.saturating_sub(self.completed_questions)
    }
}
