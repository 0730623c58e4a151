use db_infra::DbInfraError;
use thiserror::Error;

use crate::errors::domain::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Credential error: {detail}")]
    Credential { detail: String },
    #[error("Seed fixture error: {detail}")]
    Fixture { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Stable code for log lines and exit diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::Db { .. } => "DB_ERROR",
            AppError::Credential { .. } => "CREDENTIAL_ERROR",
            AppError::Fixture { .. } => "FIXTURE_ERROR",
            AppError::Internal { .. } => "INTERNAL",
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn credential(detail: impl Into<String>) -> Self {
        Self::Credential {
            detail: detail.into(),
        }
    }

    pub fn fixture(detail: impl Into<String>) -> Self {
        Self::Fixture {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl From<DbInfraError> for AppError {
    fn from(e: DbInfraError) -> Self {
        match e {
            DbInfraError::Config { .. } | DbInfraError::UnsupportedKind { .. } => {
                AppError::config(e.to_string())
            }
            DbInfraError::Connect { .. } | DbInfraError::Migration { .. } => {
                AppError::db(e.to_string())
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => AppError::fixture(detail),
            other => AppError::db(other.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::ConflictKind;

    #[test]
    fn unsupported_kind_is_a_config_error() {
        let err: AppError = DbInfraError::UnsupportedKind {
            value: "postgres".into(),
        }
        .into();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("Only SQLite is currently supported"));
    }

    #[test]
    fn migration_failures_are_db_errors() {
        let err: AppError = DbInfraError::migration("boom").into();
        assert_eq!(err.code(), "DB_ERROR");
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn domain_errors_keep_their_detail() {
        let err: AppError = DomainError::conflict(ConflictKind::UniqueSlug, "dup").into();
        assert!(matches!(err, AppError::Db { .. }));
        assert!(err.to_string().contains("dup"));

        let err: AppError = DomainError::validation("bad price").into();
        assert_eq!(err.code(), "FIXTURE_ERROR");
    }
}
