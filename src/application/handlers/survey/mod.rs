//! Survey handlers - answering questions and running whole surveys.

mod answer_question;
mod run_survey;

pub use answer_question::{AnswerQuestionHandler, QuestionAnswer, DEFAULT_TEMPERATURE};
pub use run_survey::{RunSurveyCommand, RunSurveyHandler, RunSurveyResult};
