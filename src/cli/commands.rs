//! Subcommands and their arguments.

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use survey_synth::config::SurveyConfig;
use survey_synth::domain::survey::SchemaNormalizer;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten a schema into question records and print them as JSON
    Convert(ConvertArgs),

    /// Answer every question of a schema and record the run
    Run(RunArgs),

    /// Create the survey tables
    InitDb,

    /// Print a recorded session's summary and answers as JSON
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Schema file (YAML or JSON); defaults to the configured schema path
    pub schema: Option<PathBuf>,

    #[command(flatten)]
    pub matrix_keys: MatrixKeyArgs,
}

/// Matrix row key options shared by `convert` and `run`, so both produce the same keys.
#[derive(Args, Debug, Default)]
pub struct MatrixKeyArgs {
    /// Prefix for generated matrix row keys
    #[arg(long, conflicts_with = "derive_matrix_keys", value_parser = NonEmptyStringValueParser::new())]
    pub matrix_key: Option<String>,

    /// Prefix matrix row keys with their parent question's key
    #[arg(long)]
    pub derive_matrix_keys: bool,
}

impl MatrixKeyArgs {
    /// Normalizer for these flags, falling back to the configured matrix key.
    pub fn normalizer(&self, config: &SurveyConfig) -> SchemaNormalizer {
        if self.derive_matrix_keys {
            return SchemaNormalizer::deriving_matrix_keys();
        }
        match &self.matrix_key {
            Some(prefix) => SchemaNormalizer::with_matrix_key(prefix.clone()),
            None => config.normalizer(),
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Schema file (YAML or JSON); defaults to the configured schema path
    pub schema: Option<PathBuf>,

    /// Session to record under; a random one is generated if omitted
    #[arg(long)]
    pub session_id: Option<String>,

    /// Keep answers in memory and print them instead of writing to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Record each answer as soon as it is produced
    #[arg(long)]
    pub incremental: bool,

    #[command(flatten)]
    pub matrix_keys: MatrixKeyArgs,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Session to display
    pub session_id: String,
}
