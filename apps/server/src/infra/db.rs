use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

const PG_CONNECT_ATTEMPTS: u32 = 5;
const PG_RETRY_INTERVAL_MS: u64 = 500;

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

/// Open a pool for the profile. This function does NOT run any migrations.
pub async fn connect_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile)?;

    let mut opt = ConnectOptions::new(&url);
    opt.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    match profile {
        // every connection would see its own empty database
        DbProfile::InMemory => {
            opt.min_connections(1).max_connections(1);
        }
        DbProfile::SqliteFile { .. } => {
            opt.max_connections(4);
        }
        DbProfile::Postgres => {
            opt.max_connections(16);
        }
    }

    if matches!(profile, DbProfile::Postgres) {
        retry_connection(
            || {
                let opt = opt.clone();
                async move { Database::connect(opt).await.map_err(AppError::from) }
            },
            PG_CONNECT_ATTEMPTS,
            PG_RETRY_INTERVAL_MS,
        )
        .await
    } else {
        Database::connect(opt).await.map_err(AppError::from)
    }
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    info!(profile = ?profile, "bootstrap=start");
    let conn = connect_db(profile).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    info!("bootstrap=ready");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use migration::count_applied_migrations;

    use super::*;

    #[tokio::test]
    async fn in_memory_bootstrap_migrates() {
        let conn = bootstrap_db(&DbProfile::InMemory).await.unwrap();
        assert_eq!(count_applied_migrations(&conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn retry_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), AppError> = retry_connection(
            || {
                calls += 1;
                async { Err(AppError::config("down")) }
            },
            3,
            1,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }
}
