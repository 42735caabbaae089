//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SURVEY_SYNTH` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use survey_synth::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.ai.validate()?;
//!
//! println!("Answering with {}", config.ai.model);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod ai;
mod database;
mod error;
mod survey;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use survey::SurveyConfig;

use serde::Deserialize;

/// Plain `OPENAI_API_KEY`, honored when the prefixed key is unset.
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Plain `DATABASE_URL`, honored when the prefixed URL is unset.
const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Root application configuration
///
/// Every section has defaults so commands that need only part of it (say,
/// `convert`) load without a database or API key. Validate the sections a
/// command uses before using them.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// AI provider configuration (OpenAI-compatible)
    #[serde(default)]
    pub ai: AiConfig,

    /// Survey schema handling
    #[serde(default)]
    pub survey: SurveyConfig,

    /// Tracing filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SURVEY_SYNTH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SURVEY_SYNTH__DATABASE__URL=...` -> `database.url = ...`
    /// - `SURVEY_SYNTH__AI__MODEL=gpt-4o` -> `ai.model = "gpt-4o"`
    /// - `SURVEY_SYNTH__SURVEY__MATRIX_KEY=grid` -> `survey.matrix_key = "grid"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Ok(key) = std::env::var(OPENAI_API_KEY_ENV) {
            builder = builder.set_default("ai.openai_api_key", key)?;
        }
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            builder = builder.set_default("database.url", url)?;
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("SURVEY_SYNTH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.ai.validate()?;
        self.survey.validate()?;
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
