//! PostgreSQL implementation of ResponseRecorder.
//!
//! Persists survey answers to `survey_responses` and per-session progress to
//! `survey_sessions`. Every write runs in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Postgres, Row};

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, SessionStatus, Timestamp};
use crate::domain::session::{AnsweredQuestion, SessionSummary, StoredResponse};
use crate::domain::survey::QuestionRecord;
use crate::ports::ResponseRecorder;

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS survey_responses (
        id SERIAL PRIMARY KEY,
        session_id VARCHAR(255) NOT NULL,
        question_key VARCHAR(255) NOT NULL,
        question_label TEXT,
        question_type VARCHAR(50),
        answer TEXT NOT NULL,
        options JSONB,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_survey_responses_session_id
        ON survey_responses (session_id)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS survey_sessions (
        id SERIAL PRIMARY KEY,
        session_id VARCHAR(255) UNIQUE NOT NULL,
        total_questions INTEGER NOT NULL DEFAULT 0,
        completed_questions INTEGER NOT NULL DEFAULT 0,
        status VARCHAR(50) NOT NULL DEFAULT 'in_progress',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        completed_at TIMESTAMPTZ
    )
    "#,
];

/// PostgreSQL implementation of ResponseRecorder.
#[derive(Clone)]
pub struct PostgresResponseRecorder {
    pool: PgPool,
}

impl PostgresResponseRecorder {
    /// Creates a new PostgresResponseRecorder.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<sqlx::Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to start transaction: {}", e)))
    }
}

#[async_trait]
impl ResponseRecorder for PostgresResponseRecorder {
    async fn ensure_schema(&self) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::database(format!("Failed to create tables: {}", e)))?;
        }

        commit(tx).await?;
        tracing::info!("Survey tables created or verified");
        Ok(())
    }

    async fn begin_session(
        &self,
        session_id: &SessionId,
        total_questions: u32,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO survey_sessions (
                session_id, total_questions, completed_questions, status, created_at, updated_at
            ) VALUES ($1, $2, 0, 'in_progress', $3, $3)
            ON CONFLICT (session_id) DO UPDATE SET
                total_questions = EXCLUDED.total_questions,
                status = 'in_progress',
                completed_at = NULL,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session_id.as_str())
        .bind(to_count(total_questions)?)
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to begin session: {}", e)))?;

        Ok(())
    }

    async fn record_response(
        &self,
        session_id: &SessionId,
        question: &QuestionRecord,
        answer: &str,
    ) -> Result<(), DomainError> {
        let now = Timestamp::now();
        let answered = AnsweredQuestion::new(question.clone(), answer);
        let mut tx = self.begin().await?;

        insert_response(&mut tx, session_id, &StoredResponse::from_answered(&answered, now))
            .await?;

        sqlx::query(
            r#"
            INSERT INTO survey_sessions (
                session_id, total_questions, completed_questions, status, created_at, updated_at
            ) VALUES ($1, 1, 1, 'in_progress', $2, $2)
            ON CONFLICT (session_id) DO UPDATE SET
                completed_questions = survey_sessions.completed_questions + 1,
                total_questions = GREATEST(
                    survey_sessions.total_questions,
                    survey_sessions.completed_questions + 1
                ),
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session_id.as_str())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update session: {}", e)))?;

        commit(tx).await?;
        tracing::debug!(session_id = %session_id, question_key = question.key(), "Recorded response");
        Ok(())
    }

    async fn record_responses(
        &self,
        session_id: &SessionId,
        responses: &[AnsweredQuestion],
    ) -> Result<(), DomainError> {
        let now = Timestamp::now();
        let count = to_count(responses.len())?;
        let mut tx = self.begin().await?;

        for answered in responses {
            insert_response(&mut tx, session_id, &StoredResponse::from_answered(answered, now))
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO survey_sessions (
                session_id, total_questions, completed_questions, status,
                created_at, updated_at, completed_at
            ) VALUES ($1, $2, $2, 'completed', $3, $3, $3)
            ON CONFLICT (session_id) DO UPDATE SET
                total_questions = EXCLUDED.total_questions,
                completed_questions = EXCLUDED.completed_questions,
                status = 'completed',
                completed_at = EXCLUDED.completed_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session_id.as_str())
        .bind(count)
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update session: {}", e)))?;

        commit(tx).await?;
        tracing::info!(session_id = %session_id, count, "Recorded survey responses");
        Ok(())
    }

    async fn complete_session(&self, session_id: &SessionId) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE survey_sessions SET
                status = 'completed',
                completed_at = $2,
                updated_at = $2
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_str())
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to complete session: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session_id),
            )
            .with_detail("session_id", session_id.as_str()));
        }

        Ok(())
    }

    async fn session_responses(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<StoredResponse>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT question_key, question_label, question_type, answer, options, created_at
            FROM survey_responses
            WHERE session_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(session_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch responses: {}", e)))?;

        rows.iter().map(row_to_response).collect()
    }

    async fn session_summary(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionSummary>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT total_questions, completed_questions, status,
                   created_at, updated_at, completed_at
            FROM survey_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch session: {}", e)))?;

        row.map(|row| row_to_summary(session_id, &row)).transpose()
    }
}

async fn insert_response(
    conn: &mut PgConnection,
    session_id: &SessionId,
    response: &StoredResponse,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO survey_responses (
            session_id, question_key, question_label, question_type,
            answer, options, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        "#,
    )
    .bind(session_id.as_str())
    .bind(&response.question_key)
    .bind(response.question_label.as_deref())
    .bind(response.question_type.as_deref())
    .bind(&response.answer)
    .bind(serde_json::Value::from(response.options.clone()))
    .bind(response.created_at.as_datetime())
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        DomainError::database(format!("Failed to insert response: {}", e))
            .with_detail("session_id", session_id.as_str())
            .with_detail("question_key", response.question_key.as_str())
    })?;

    Ok(())
}

async fn commit(tx: sqlx::Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::database(format!("Failed to commit transaction: {}", e)))
}

fn row_to_response(row: &PgRow) -> Result<StoredResponse, DomainError> {
    let options: Option<serde_json::Value> = column(row, "options")?;
    let options = match options {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| DomainError::database(format!("Invalid stored options: {}", e)))?,
        None => Vec::new(),
    };
    let created_at: DateTime<Utc> = column(row, "created_at")?;

    Ok(StoredResponse {
        question_key: column(row, "question_key")?,
        question_label: column(row, "question_label")?,
        question_type: column(row, "question_type")?,
        answer: column(row, "answer")?,
        options,
        created_at: Timestamp::from_datetime(created_at),
    })
}

fn row_to_summary(session_id: &SessionId, row: &PgRow) -> Result<SessionSummary, DomainError> {
    let status: String = column(row, "status")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;
    let updated_at: DateTime<Utc> = column(row, "updated_at")?;
    let completed_at: Option<DateTime<Utc>> = column(row, "completed_at")?;

    Ok(SessionSummary {
        session_id: session_id.clone(),
        total_questions: from_count(column(row, "total_questions")?)?,
        completed_questions: from_count(column(row, "completed_questions")?)?,
        status: status.parse::<SessionStatus>()?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
        completed_at: completed_at.map(Timestamp::from_datetime),
    })
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}

fn to_count<T>(value: T) -> Result<i32, DomainError>
where
    T: TryInto<i32> + Copy + std::fmt::Display,
{
    value
        .try_into()
        .map_err(|_| DomainError::database(format!("Count {} out of range", value)))
}

fn from_count(value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| DomainError::database(format!("Negative count {}", value)))
}
