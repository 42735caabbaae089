//! Survey schema error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised while reading or normalizing a survey schema document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The top-level document is not a mapping of question keys.
    #[error("schema document must be a mapping of question keys, found {found}")]
    NotAMapping { found: &'static str },

    /// A question key is not a scalar.
    #[error("question keys must be scalars, found {found}")]
    InvalidKey { found: &'static str },

    /// A question definition is not a mapping.
    #[error("question '{key}' must be a mapping, found {found}")]
    EntryNotMapping { key: String, found: &'static str },

    /// A `row` field is present but not a mapping.
    #[error("'row' of question '{key}' must be a mapping, found {found}")]
    RowNotMapping { key: String, found: &'static str },

    /// The document text is not valid YAML (or JSON).
    #[error("failed to parse schema: {0}")]
    Parse(String),

    /// The schema file could not be read.
    #[error("failed to read schema '{path}': {message}")]
    Io { path: String, message: String },
}

impl SchemaError {
    pub fn parse(message: impl Into<String>) -> Self {
        SchemaError::Parse(message.into())
    }

    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Io {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<SchemaError> for DomainError {
    fn from(err: SchemaError) -> Self {
        DomainError::new(ErrorCode::InvalidSchema, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_mapping_names_the_found_kind() {
        let err = SchemaError::NotAMapping { found: "sequence" };
        assert_eq!(
            err.to_string(),
            "schema document must be a mapping of question keys, found sequence"
        );
    }

    #[test]
    fn row_not_mapping_names_the_question() {
        let err = SchemaError::RowNotMapping {
            key: "rankings".to_string(),
            found: "string",
        };
        assert!(err.to_string().contains("'rankings'"));
    }

    #[test]
    fn converts_to_invalid_schema_domain_error() {
        let err: DomainError = SchemaError::parse("bad indent").into();
        assert_eq!(err.code, ErrorCode::InvalidSchema);
        assert!(err.message.contains("bad indent"));
    }
}
