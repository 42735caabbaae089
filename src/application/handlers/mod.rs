//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod survey;

pub use survey::{
    AnswerQuestionHandler, QuestionAnswer, RunSurveyCommand, RunSurveyHandler, RunSurveyResult,
};
