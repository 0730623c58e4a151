//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos convert it into
//! `crate::errors::domain::DomainError` here.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column" error messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let marker = "UNIQUE constraint failed: ";
    let start = error_msg.find(marker)? + marker.len();
    error_msg[start..]
        .split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

fn map_sqlite_table_column_to_conflict(table_column: &str) -> Option<(ConflictKind, &'static str)> {
    match table_column {
        "users.username" => Some((ConflictKind::UniqueUsername, "Username already taken")),
        "items.slug" => Some((ConflictKind::UniqueSlug, "Item slug already exists")),
        _ => None,
    }
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if error_msg.contains("UNIQUE constraint failed") {
        warn!(raw_error = %error_msg, "Unique constraint violation");

        if let Some((kind, detail)) =
            extract_sqlite_table_column(&error_msg).and_then(map_sqlite_table_column_to_conflict)
        {
            return DomainError::conflict(kind, detail);
        }

        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if error_msg.contains("FOREIGN KEY constraint failed") {
        warn!(raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation("Foreign key constraint violation");
    }

    if error_msg.contains("database is locked") || error_msg.contains("timeout") {
        warn!(raw_error = %error_msg, "Database timeout or lock contention");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}
