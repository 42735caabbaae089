//! RunSurveyHandler - answers every question of a schema and records the run.

use std::sync::Arc;

use super::answer_question::AnswerQuestionHandler;
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::AnsweredQuestion;
use crate::domain::survey::{SchemaDocument, SchemaNormalizer};
use crate::ports::ResponseRecorder;

/// Command to run a survey once.
#[derive(Debug, Clone)]
pub struct RunSurveyCommand {
    /// Session to record under; a fresh one is generated when absent.
    pub session_id: Option<SessionId>,
    pub document: SchemaDocument,
    /// Record each answer as soon as it is produced instead of in one batch.
    pub incremental: bool,
}

impl RunSurveyCommand {
    pub fn new(document: SchemaDocument) -> Self {
        Self {
            session_id: None,
            document,
            incremental: false,
        }
    }

    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn incremental(mut self) -> Self {
        self.incremental = true;
        self
    }
}

/// Result of a completed survey run.
#[derive(Debug, Clone)]
pub struct RunSurveyResult {
    pub session_id: SessionId,
    /// Answers in question order.
    pub answers: Vec<AnsweredQuestion>,
    /// How many answers were substituted after a provider failure.
    pub substituted: usize,
}

/// Handler running a whole survey.
///
/// Questions are answered one at a time, in document order.
pub struct RunSurveyHandler {
    answerer: AnswerQuestionHandler,
    recorder: Arc<dyn ResponseRecorder>,
    normalizer: SchemaNormalizer,
}

impl RunSurveyHandler {
    pub fn new(answerer: AnswerQuestionHandler, recorder: Arc<dyn ResponseRecorder>) -> Self {
        Self {
            answerer,
            recorder,
            normalizer: SchemaNormalizer::new(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: SchemaNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub async fn handle(&self, cmd: RunSurveyCommand) -> Result<RunSurveyResult, DomainError> {
        let session_id = cmd.session_id.unwrap_or_else(SessionId::generate);
        let records = self.normalizer.normalize(&cmd.document);
        let total = u32::try_from(records.len()).unwrap_or(u32::MAX);

        tracing::info!(
            session_id = %session_id,
            questions = total,
            incremental = cmd.incremental,
            "Starting survey run"
        );
        self.recorder.begin_session(&session_id, total).await?;

        let mut answers = Vec::with_capacity(records.len());
        let mut substituted = 0;
        for record in records {
            let answered = self.answerer.handle(&session_id, &record).await;
            if answered.substituted {
                substituted += 1;
            }
            if cmd.incremental {
                self.recorder
                    .record_response(&session_id, &record, &answered.answer)
                    .await
                    .map_err(|e| log_recorder_error(&session_id, e))?;
            }
            answers.push(AnsweredQuestion::new(record, answered.answer));
        }

        let recorded = if cmd.incremental {
            self.recorder.complete_session(&session_id).await
        } else {
            self.recorder.record_responses(&session_id, &answers).await
        };
        recorded.map_err(|e| log_recorder_error(&session_id, e))?;

        tracing::info!(
            session_id = %session_id,
            answered = answers.len(),
            substituted,
            "Survey run completed"
        );
        Ok(RunSurveyResult {
            session_id,
            answers,
            substituted,
        })
    }
}

fn log_recorder_error(session_id: &SessionId, err: DomainError) -> DomainError {
    tracing::error!(session_id = %session_id, error = %err, "Failed to record survey answers");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::memory::InMemoryResponseRecorder;
    use crate::domain::foundation::{ErrorCode, SessionStatus};
    use crate::domain::session::{SessionSummary, StoredResponse};
    use crate::domain::survey::QuestionRecord;
    use async_trait::async_trait;

    const SCHEMA: &str = r#"
q1:
  type: mc
  label: Favorite color?
  options: [Red, Blue]
why:
  type: text
  label: Why?
"#;

    fn document() -> SchemaDocument {
        SchemaDocument::from_yaml_str(SCHEMA).unwrap()
    }

    fn handler(provider: MockAIProvider, recorder: Arc<dyn ResponseRecorder>) -> RunSurveyHandler {
        RunSurveyHandler::new(AnswerQuestionHandler::new(Arc::new(provider)), recorder)
    }

    struct FailingRecorder;

    #[async_trait]
    impl ResponseRecorder for FailingRecorder {
        async fn ensure_schema(&self) -> Result<(), DomainError> {
            Ok(())
        }

        async fn begin_session(&self, _: &SessionId, _: u32) -> Result<(), DomainError> {
            Ok(())
        }

        async fn record_response(
            &self,
            _: &SessionId,
            _: &QuestionRecord,
            _: &str,
        ) -> Result<(), DomainError> {
            Err(DomainError::database("Simulated insert failure"))
        }

        async fn record_responses(
            &self,
            _: &SessionId,
            _: &[AnsweredQuestion],
        ) -> Result<(), DomainError> {
            Err(DomainError::database("Simulated insert failure"))
        }

        async fn complete_session(&self, _: &SessionId) -> Result<(), DomainError> {
            Ok(())
        }

        async fn session_responses(&self, _: &SessionId) -> Result<Vec<StoredResponse>, DomainError> {
            Ok(vec![])
        }

        async fn session_summary(
            &self,
            _: &SessionId,
        ) -> Result<Option<SessionSummary>, DomainError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn batch_run_answers_and_records_everything() {
        let recorder = Arc::new(InMemoryResponseRecorder::new());
        let provider = MockAIProvider::new().with_response("blue").with_response("It is calm.");
        let session_id = SessionId::new("run-1").unwrap();

        let result = handler(provider, recorder.clone())
            .handle(RunSurveyCommand::new(document()).with_session_id(session_id.clone()))
            .await
            .unwrap();

        assert_eq!(result.session_id, session_id);
        assert_eq!(result.answers.len(), 2);
        assert_eq!(result.answers[0].answer, "Blue");
        assert_eq!(result.answers[1].answer, "It is calm.");
        assert_eq!(result.substituted, 0);

        let summary = recorder.session_summary(&session_id).await.unwrap().unwrap();
        assert_eq!(summary.total_questions, 2);
        assert_eq!(summary.completed_questions, 2);
        assert_eq!(summary.status, SessionStatus::Completed);
        assert_eq!(recorder.session_responses(&session_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn generates_session_id_when_absent() {
        let recorder = Arc::new(InMemoryResponseRecorder::new());

        let result = handler(MockAIProvider::new(), recorder.clone())
            .handle(RunSurveyCommand::new(document()))
            .await
            .unwrap();

        assert!(!result.session_id.as_str().is_empty());
        assert!(recorder.session_summary(&result.session_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn provider_failures_are_substituted_not_fatal() {
        let recorder = Arc::new(InMemoryResponseRecorder::new());
        let provider = MockAIProvider::new()
            .with_error(MockError::Unavailable { message: "down".to_string() })
            .with_error(MockError::Network { message: "reset".to_string() });

        let result = handler(provider, recorder)
            .handle(RunSurveyCommand::new(document()))
            .await
            .unwrap();

        assert_eq!(result.answers[0].answer, "Red");
        assert_eq!(result.answers[1].answer, "Error occurred while processing the question");
        assert_eq!(result.substituted, 2);
    }

    #[tokio::test]
    async fn incremental_run_records_as_it_goes() {
        let recorder = Arc::new(InMemoryResponseRecorder::new());
        let provider = MockAIProvider::new().with_response("Red").with_response("Fine.");
        let session_id = SessionId::new("run-2").unwrap();

        handler(provider, recorder.clone())
            .handle(
                RunSurveyCommand::new(document())
                    .with_session_id(session_id.clone())
                    .incremental(),
            )
            .await
            .unwrap();

        let summary = recorder.session_summary(&session_id).await.unwrap().unwrap();
        assert_eq!(summary.total_questions, 2);
        assert_eq!(summary.completed_questions, 2);
        assert!(summary.status.is_completed());

        let stored = recorder.session_responses(&session_id).await.unwrap();
        let keys: Vec<_> = stored.iter().map(|r| r.question_key.as_str()).collect();
        assert_eq!(keys, vec!["q1", "why"]);
    }

    #[tokio::test]
    async fn recorder_failure_propagates() {
        let err = handler(MockAIProvider::new(), Arc::new(FailingRecorder))
            .handle(RunSurveyCommand::new(document()))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[tokio::test]
    async fn incremental_recorder_failure_stops_the_run() {
        let provider = MockAIProvider::new();

        let err = handler(provider.clone(), Arc::new(FailingRecorder))
            .handle(RunSurveyCommand::new(document()).incremental())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_schema_completes_with_no_answers() {
        let recorder = Arc::new(InMemoryResponseRecorder::new());

        let result = handler(MockAIProvider::new(), recorder.clone())
            .handle(RunSurveyCommand::new(SchemaDocument::new()))
            .await
            .unwrap();

        assert!(result.answers.is_empty());
        let summary = recorder.session_summary(&result.session_id).await.unwrap().unwrap();
        assert_eq!(summary.total_questions, 0);
        assert!(summary.status.is_completed());
    }
}
