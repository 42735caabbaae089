//! Command-line interface.
//!
//! Parses arguments with `clap` and routes each subcommand to the library.
//! Nothing here decides survey semantics.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use commands::{Commands, ConvertArgs, RunArgs, ShowArgs};
use survey_synth::adapters::ai::{OpenAIConfig, OpenAIProvider};
use survey_synth::adapters::memory::InMemoryResponseRecorder;
use survey_synth::adapters::postgres::{connect_pool, PostgresResponseRecorder};
use survey_synth::adapters::schema::load_schema;
use survey_synth::application::{AnswerQuestionHandler, RunSurveyCommand, RunSurveyHandler};
use survey_synth::config::{AppConfig, ConfigError};
use survey_synth::domain::foundation::SessionId;
use survey_synth::ports::ResponseRecorder;

#[derive(Parser, Debug)]
#[command(
    name = "survey-synth",
    version,
    about = "Flatten survey schemas and answer them with an LLM respondent."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(self, config: AppConfig) -> Result<()> {
        match self.command {
            Commands::Convert(args) => run_convert(args, &config).await,
            Commands::Run(args) => run_survey(args, &config).await,
            Commands::InitDb => run_init_db(&config).await,
            Commands::Show(args) => run_show(args, &config).await,
        }
    }
}

async fn run_convert(args: ConvertArgs, config: &AppConfig) -> Result<()> {
    let path = schema_path(args.schema, config)?;
    let document = load_schema(&path).await?;

    let records = args.matrix_keys.normalizer(&config.survey).normalize(&document);
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

async fn run_survey(args: RunArgs, config: &AppConfig) -> Result<()> {
    config.ai.validate().map_err(ConfigError::from)?;
    config.survey.validate().map_err(ConfigError::from)?;

    let path = schema_path(args.schema, config)?;
    let document = load_schema(&path).await?;

    let recorder: Arc<dyn ResponseRecorder> = if args.dry_run {
        Arc::new(InMemoryResponseRecorder::new())
    } else {
        Arc::new(postgres_recorder(config).await?)
    };

    let api_key = config
        .ai
        .openai_api_key
        .clone()
        .context("OpenAI API key is not configured")?;
    let provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout()),
    )?;

    let answerer =
        AnswerQuestionHandler::new(Arc::new(provider)).with_temperature(config.ai.temperature);
    let handler = RunSurveyHandler::new(answerer, recorder)
        .with_normalizer(args.matrix_keys.normalizer(&config.survey));

    let mut cmd = RunSurveyCommand::new(document);
    if let Some(id) = args.session_id {
        cmd = cmd.with_session_id(SessionId::new(id)?);
    }
    if args.incremental {
        cmd = cmd.incremental();
    }

    let result = handler.handle(cmd).await?;

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&result.answers)?);
    }
    eprintln!(
        "Session {}: {} answers recorded ({} substituted)",
        result.session_id,
        result.answers.len(),
        result.substituted
    );
    Ok(())
}

async fn run_init_db(config: &AppConfig) -> Result<()> {
    let recorder = postgres_recorder(config).await?;
    recorder.ensure_schema().await?;
    eprintln!("Survey tables are ready");
    Ok(())
}

async fn run_show(args: ShowArgs, config: &AppConfig) -> Result<()> {
    let session_id = SessionId::new(args.session_id)?;
    let recorder = postgres_recorder(config).await?;

    let summary = recorder
        .session_summary(&session_id)
        .await?
        .with_context(|| format!("Session not found: {}", session_id))?;
    let responses = recorder.session_responses(&session_id).await?;

    let report = serde_json::json!({
        "summary": summary,
        "responses": responses,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn postgres_recorder(config: &AppConfig) -> Result<PostgresResponseRecorder> {
    config.database.validate().map_err(ConfigError::from)?;
    let pool = connect_pool(&config.database).await?;
    let recorder = PostgresResponseRecorder::new(pool);
    if config.database.create_tables {
        recorder.ensure_schema().await?;
    }
    Ok(recorder)
}

fn schema_path(arg: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    arg.or_else(|| config.survey.schema_path.clone())
        .context("No schema given; pass a path or set SURVEY_SYNTH__SURVEY__SCHEMA_PATH")
}
