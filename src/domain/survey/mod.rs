//! Survey domain module.
//!
//! Turns a survey schema document into flat question records and holds the
//! pure rules for answering them.
//!
//! - [`SchemaDocument`] - parsed schema, with `options`/`label` shapes classified
//! - [`SchemaNormalizer`] - flattens documents into [`QuestionRecord`]s
//! - [`RespondentPrompt`], [`reconcile_answer`] - prompt and answer rules

mod answer;
mod errors;
mod normalizer;
mod question;
mod schema;

pub use answer::{
    fallback_answer, reconcile_answer, RespondentPrompt, CHOICE_MAX_TOKENS, FREE_TEXT_FALLBACK,
    FREE_TEXT_MAX_TOKENS, RESPONDENT_SYSTEM_PROMPT,
};
pub use errors::SchemaError;
pub use normalizer::{normalize, MatrixKeys, SchemaNormalizer, DEFAULT_MATRIX_KEY};
pub use question::{QuestionRecord, MATRIX, MULTIPLE_CHOICE};
pub use schema::{
    LabelValue, MatrixRow, OptionsValue, QuestionDefinition, SchemaDocument, SchemaEntry,
};
