//! Survey schema configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::survey::{SchemaNormalizer, DEFAULT_MATRIX_KEY};

/// How survey schemas are read and flattened
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    /// Prefix of generated matrix row keys
    #[serde(default = "default_matrix_key")]
    pub matrix_key: String,

    /// Schema file used when none is given on the command line
    pub schema_path: Option<PathBuf>,
}

impl SurveyConfig {
    /// Normalizer honoring the configured matrix key.
    pub fn normalizer(&self) -> SchemaNormalizer {
        SchemaNormalizer::with_matrix_key(self.matrix_key.clone())
    }

    /// Validate survey configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.matrix_key.trim().is_empty() {
            return Err(ValidationError::EmptyMatrixKey);
        }
        Ok(())
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            matrix_key: default_matrix_key(),
            schema_path: None,
        }
    }
}

fn default_matrix_key() -> String {
    DEFAULT_MATRIX_KEY.to_string()
}
