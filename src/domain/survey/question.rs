//! QuestionRecord - the flat unit the normalizer emits per answerable question.

use serde::{Deserialize, Serialize};

/// Question type tag of a multiple-choice question.
pub const MULTIPLE_CHOICE: &str = "mc";

/// Question type tag of a matrix (grid) question.
pub const MATRIX: &str = "matrix";

/// A single answerable question.
///
/// Records are immutable values; `options`, when present, is always a flat
/// ordered list of strings and is omitted from the serialized form when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    key: String,
    #[serde(rename = "type")]
    question_type: Option<String>,
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
}

impl QuestionRecord {
    pub fn new(
        key: impl Into<String>,
        question_type: Option<String>,
        label: Option<String>,
        options: Option<Vec<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            question_type,
            label,
            options,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn question_type(&self) -> Option<&str> {
        self.question_type.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    /// Returns true if answers must be one of the record's options.
    ///
    /// Only non-empty option lists on `mc` or `matrix` questions constrain
    /// the answer; other types take free text even when options are listed.
    pub fn offers_choices(&self) -> bool {
        let constrained_type = matches!(self.question_type(), Some(MULTIPLE_CHOICE | MATRIX));
        constrained_type && self.options().is_some_and(|o| !o.is_empty())
    }
}
