//! PostgreSQL adapters - Database implementations for the recorder port.
//!
//! - `PostgresResponseRecorder` - survey answers and session progress
//! - `connect_pool` - builds a `PgPool` from `DatabaseConfig`

mod response_recorder;

pub use response_recorder::PostgresResponseRecorder;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Connection options from either the URL or the individual parts.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DomainError> {
    if let Some(url) = config.url() {
        return url
            .parse::<PgConnectOptions>()
            .map_err(|e| DomainError::database(format!("Invalid database URL: {}", e)));
    }

    let mut options = PgConnectOptions::new()
        .port(config.port)
        .database(&config.name);
    if let Some(host) = &config.host {
        options = options.host(host);
    }
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    Ok(options)
}

/// Opens a connection pool sized by the configuration.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let options = connect_options(config)?;

    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(options)
        .await
        .map_err(|e| DomainError::database(format!("Failed to connect to database: {}", e)))?;

    tracing::info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_parts() {
        let config = DatabaseConfig {
            host: Some("db.example.com".to_string()),
            user: Some("surveyor".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };

        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "surveyor");
        assert_eq!(options.get_database(), Some("postgres"));
    }

    #[test]
    fn url_takes_precedence_over_parts() {
        let config = DatabaseConfig {
            url: Some("postgres://alice:pw@localhost:5432/surveys".to_string()),
            host: Some("ignored.example.com".to_string()),
            ..Default::default()
        };

        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("surveys"));
    }

    #[test]
    fn malformed_url_is_database_error() {
        let config = DatabaseConfig {
            url: Some("postgres://alice@localhost:notaport/db".to_string()),
            ..Default::default()
        };

        assert!(connect_options(&config).is_err());
    }
}
