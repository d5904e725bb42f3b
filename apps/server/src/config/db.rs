use std::env;

use crate::error::AppError;

/// Which database backs the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbProfile {
    /// Postgres, connection details from `POSTGRES_*`
    Postgres,
    /// SQLite file at the given path
    SqliteFile { file: String },
    /// Private in-memory SQLite, gone when the process exits
    InMemory,
}

impl DbProfile {
    /// Reads `DB_KIND` (default `sqlite-memory`).
    pub fn from_env() -> Result<Self, AppError> {
        let kind = env::var("DB_KIND").unwrap_or_else(|_| "sqlite-memory".to_string());
        match kind.trim() {
            "postgres" => Ok(DbProfile::Postgres),
            "sqlite-file" => Ok(DbProfile::SqliteFile {
                file: must_var("SQLITE_FILE")?,
            }),
            "sqlite-memory" => Ok(DbProfile::InMemory),
            other => Err(AppError::config(format!(
                "DB_KIND must be one of postgres, sqlite-file, sqlite-memory; got '{other}'"
            ))),
        }
    }
}

/// Builds a database URL for the profile, reading credentials from the environment.
pub fn db_url(profile: &DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Postgres => {
            let host = host();
            let port = port();
            let db_name = must_var("POSTGRES_DB")?;
            let username = must_var("POSTGRES_USER")?;
            let password = must_var("POSTGRES_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbProfile::SqliteFile { file } => Ok(format!("sqlite://{file}?mode=rwc")),
        DbProfile::InMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Get database host from environment (defaults to localhost)
fn host() -> String {
    env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string())
}

/// Get database port from environment (defaults to 5432)
fn port() -> String {
    env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string())
}

/// Get required environment variable or return error
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
