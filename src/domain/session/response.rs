//! Recorded question/answer pairs.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::survey::QuestionRecord;

/// A question paired with the answer given to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: QuestionRecord,
    pub answer: String,
}

impl AnsweredQuestion {
    pub fn new(question: QuestionRecord, answer: impl Into<String>) -> Self {
        Self {
            question,
            answer: answer.into(),
        }
    }
}

/// A question/answer pair as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub question_key: String,
    pub question_label: Option<String>,
    pub question_type: Option<String>,
    pub answer: String,
    /// Stored options; empty when the question had none.
    pub options: Vec<String>,
    pub created_at: Timestamp,
}

impl StoredResponse {
    /// Snapshot of an answered question at the given time.
    pub fn from_answered(answered: &AnsweredQuestion, created_at: Timestamp) -> Self {
        let question = &answered.question;
        Self {
            question_key: question.key().to_string(),
            question_label: question.label().map(str::to_string),
            question_type: question.question_type().map(str::to_string),
            answer: answered.answer.clone(),
            options: question.options().map(<[String]>::to_vec).unwrap_or_default(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_response_flattens_absent_options_to_empty() {
        let answered = AnsweredQuestion::new(
            QuestionRecord::new("why", Some("text".to_string()), Some("Why?".to_string()), None),
            "Because",
        );
        let stored = StoredResponse::from_answered(&answered, Timestamp::now());
        assert_eq!(stored.question_key, "why");
        assert_eq!(stored.question_label.as_deref(), Some("Why?"));
        assert!(stored.options.is_empty());
        assert_eq!(stored.answer, "Because");
    }

    #[test]
    fn stored_response_keeps_option_order() {
        let answered = AnsweredQuestion::new(
            QuestionRecord::new(
                "q1",
                Some("mc".to_string()),
                Some("Color?".to_string()),
                Some(vec!["Red".to_string(), "Blue".to_string()]),
            ),
            "Blue",
        );
        let stored = StoredResponse::from_answered(&answered, Timestamp::now());
        assert_eq!(stored.options, vec!["Red", "Blue"]);
    }
}
