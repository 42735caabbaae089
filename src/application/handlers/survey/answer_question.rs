//! AnswerQuestionHandler - asks the AI provider to answer one question.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::survey::{fallback_answer, reconcile_answer, QuestionRecord, RespondentPrompt};
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Sampling temperature used unless configured otherwise.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The answer given to a question, and whether it had to be substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAnswer {
    pub answer: String,
    pub substituted: bool,
}

/// Handler answering survey questions as a synthetic respondent.
pub struct AnswerQuestionHandler {
    provider: Arc<dyn AIProvider>,
    temperature: f32,
}

impl AnswerQuestionHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Answers `record`, substituting a default answer if the provider fails.
    pub async fn handle(&self, session_id: &SessionId, record: &QuestionRecord) -> QuestionAnswer {
        match self.try_answer(session_id, record).await {
            Ok(answer) => QuestionAnswer {
                answer,
                substituted: false,
            },
            Err(err) => {
                let answer = fallback_answer(record);
                tracing::warn!(
                    session_id = %session_id,
                    question_key = record.key(),
                    error = %err,
                    fallback = %answer,
                    "Provider failed to answer, substituting default"
                );
                QuestionAnswer {
                    answer,
                    substituted: true,
                }
            }
        }
    }

    /// Answers `record`, surfacing provider errors.
    ///
    /// Replies to questions with choices are coerced onto the option set.
    pub async fn try_answer(
        &self,
        session_id: &SessionId,
        record: &QuestionRecord,
    ) -> Result<String, AIError> {
        let prompt = RespondentPrompt::for_question(record);
        let request = CompletionRequest::new(RequestMetadata::new(session_id.clone(), record.key()))
            .with_system_prompt(prompt.system)
            .with_message(MessageRole::User, prompt.user)
            .with_max_tokens(prompt.max_tokens)
            .with_temperature(self.temperature);

        let response = self.provider.complete(request).await?;
        let answer = reconcile_answer(record, &response.content);

        tracing::debug!(
            question_key = record.key(),
            answer = %answer,
            tokens = response.usage.total_tokens,
            "Answered question"
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::survey::{CHOICE_MAX_TOKENS, FREE_TEXT_FALLBACK, FREE_TEXT_MAX_TOKENS};

    fn session() -> SessionId {
        SessionId::new("session-1").unwrap()
    }

    fn color_question() -> QuestionRecord {
        QuestionRecord::new(
            "q1",
            Some("mc".to_string()),
            Some("Favorite color?".to_string()),
            Some(vec!["Red".to_string(), "Blue".to_string()]),
        )
    }

    fn free_text() -> QuestionRecord {
        QuestionRecord::new("why", Some("text".to_string()), Some("Why?".to_string()), None)
    }

    fn handler(provider: &MockAIProvider) -> AnswerQuestionHandler {
        AnswerQuestionHandler::new(Arc::new(provider.clone()))
    }

    #[tokio::test]
    async fn exact_option_is_returned() {
        let provider = MockAIProvider::new().with_response("Blue");

        let result = handler(&provider).handle(&session(), &color_question()).await;

        assert_eq!(result.answer, "Blue");
        assert!(!result.substituted);
    }

    #[tokio::test]
    async fn case_insensitive_match_returns_canonical_option() {
        let provider = MockAIProvider::new().with_response("  blue \n");

        let result = handler(&provider).handle(&session(), &color_question()).await;

        assert_eq!(result.answer, "Blue");
    }

    #[tokio::test]
    async fn unmatched_reply_falls_back_to_first_option() {
        let provider = MockAIProvider::new().with_response("Green, definitely");

        let result = handler(&provider).handle(&session(), &color_question()).await;

        assert_eq!(result.answer, "Red");
        assert!(!result.substituted);
    }

    #[tokio::test]
    async fn free_text_reply_is_trimmed() {
        let provider = MockAIProvider::new().with_response("  Because it works.  ");

        let result = handler(&provider).handle(&session(), &free_text()).await;

        assert_eq!(result.answer, "Because it works.");
    }

    #[tokio::test]
    async fn provider_failure_substitutes_first_option() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });

        let result = handler(&provider).handle(&session(), &color_question()).await;

        assert_eq!(result.answer, "Red");
        assert!(result.substituted);
    }

    #[tokio::test]
    async fn provider_failure_on_free_text_uses_error_answer() {
        let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);

        let result = handler(&provider).handle(&session(), &free_text()).await;

        assert_eq!(result.answer, FREE_TEXT_FALLBACK);
        assert!(result.substituted);
    }

    #[tokio::test]
    async fn try_answer_surfaces_errors() {
        let provider = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 60 });

        let err = handler(&provider)
            .try_answer(&session(), &color_question())
            .await
            .unwrap_err();

        assert!(matches!(err, AIError::Timeout { timeout_secs: 60 }));
    }

    #[tokio::test]
    async fn request_carries_prompt_and_sampling_settings() {
        let provider = MockAIProvider::new().with_response("Red").with_response("ok");
        let handler = handler(&provider).with_temperature(0.2);

        handler.handle(&session(), &color_question()).await;
        handler.handle(&session(), &free_text()).await;

        let calls = provider.get_calls();
        assert_eq!(calls[0].max_tokens, Some(CHOICE_MAX_TOKENS));
        assert_eq!(calls[0].temperature, Some(0.2));
        assert_eq!(calls[0].metadata.question_key, "q1");
        assert!(calls[0].messages[0].content.contains("Available options: Red, Blue"));
        assert!(calls[0].system_prompt.is_some());
        assert_eq!(calls[1].max_tokens, Some(FREE_TEXT_MAX_TOKENS));
        assert!(!calls[1].messages[0].content.contains("Available options"));
    }

    #[tokio::test]
    async fn choice_type_without_options_is_free_text() {
        let provider = MockAIProvider::new().with_response("Something");
        let record = QuestionRecord::new("q2", Some("mc".to_string()), Some("Pick".to_string()), Some(vec![]));

        let result = handler(&provider).handle(&session(), &record).await;

        assert_eq!(result.answer, "Something");
        assert_eq!(provider.get_calls()[0].max_tokens, Some(FREE_TEXT_MAX_TOKENS));
    }
}
