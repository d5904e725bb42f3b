//! SeaORM -> DomainError translation helpers.
//!
//! Store adapters convert `sea_orm::DbErr` into `DomainError` here; higher
//! layers then map `DomainError` to `AppError` or a WebSocket error code.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column" messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let marker = "UNIQUE constraint failed: ";
    let start = error_msg.find(marker)? + marker.len();
    error_msg[start..]
        .split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

fn map_unique_violation(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    let sqlite = extract_sqlite_table_column(error_msg);
    if sqlite == Some("players.name") || error_msg.contains("players_name_key") {
        return Some((ConflictKind::UsernameTaken, "Player name already taken"));
    }
    if sqlite == Some("players.token") || error_msg.contains("players_token_key") {
        return Some((
            ConflictKind::Other("UniqueToken".into()),
            "Player token collision",
        ));
    }
    if sqlite == Some("games.guid") || error_msg.contains("games_guid_key") {
        return Some((ConflictKind::Other("UniqueGuid".into()), "Game guid collision"));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with a sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();

    match &e {
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        sea_orm::DbErr::RecordNotFound(_) | sea_orm::DbErr::RecordNotUpdated => {
            warn!(raw_error = %error_msg, "Record missing");
            return DomainError::infra(
                InfraErrorKind::Other("RecordNotFound".into()),
                "Record not found",
            );
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(raw_error = %error_msg, "Unique constraint violation");
        if let Some((kind, detail)) = map_unique_violation(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation("Foreign key constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("pool") {
        warn!(raw_error = %error_msg, "Database timeout or pool issue");
        return DomainError::infra(InfraErrorKind::DbUnavailable, "Database timeout");
    }

    error!(raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}
