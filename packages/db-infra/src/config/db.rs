use std::env;
use std::path::{Path, PathBuf};

use crate::error::DbInfraError;

/// Environment variable selecting the storage kind.
pub const DB_TYPE_VAR: &str = "DB_TYPE";
/// Environment variable overriding the SQLite busy timeout.
pub const BUSY_TIMEOUT_VAR: &str = "SQLITE_BUSY_TIMEOUT_MS";
/// The storefront always talks to this file in the working directory.
pub const DEFAULT_DB_FILE: &str = "artisancraft.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Supported storage kinds. Only a local SQLite file today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Sqlite,
}

impl DbKind {
    /// Parse the `DB_TYPE` value. Unset or blank selects SQLite.
    pub fn parse(raw: Option<&str>) -> Result<Self, DbInfraError> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() || value.eq_ignore_ascii_case("sqlite") {
            return Ok(DbKind::Sqlite);
        }
        Err(DbInfraError::UnsupportedKind {
            value: value.to_string(),
        })
    }

    pub fn engine(self) -> &'static str {
        match self {
            DbKind::Sqlite => "sqlite",
        }
    }
}

impl From<DbKind> for sea_orm::DatabaseBackend {
    fn from(kind: DbKind) -> Self {
        match kind {
            DbKind::Sqlite => sea_orm::DatabaseBackend::Sqlite,
        }
    }
}

/// What a pool is built for. Migration pools run with foreign keys disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolPurpose {
    Migration,
    Runtime,
}

/// Per-connection session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbSettings {
    Sqlite {
        busy_timeout_ms: u64,
        foreign_keys: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub kind: DbKind,
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl DbConfig {
    /// Config pointing at an explicit SQLite file.
    pub fn sqlite_file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: DbKind::Sqlite,
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    /// Read `DB_TYPE` and `SQLITE_BUSY_TIMEOUT_MS` from the process environment.
    pub fn from_env() -> Result<Self, DbInfraError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`DbConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbInfraError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = DbKind::parse(lookup(DB_TYPE_VAR).as_deref())?;

        let busy_timeout_ms = match lookup(BUSY_TIMEOUT_VAR) {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim().parse::<u64>().map_err(|_| {
                    DbInfraError::config(format!(
                        "{BUSY_TIMEOUT_VAR} must be a non-negative integer, got '{raw}'"
                    ))
                })?
            }
            _ => DEFAULT_BUSY_TIMEOUT_MS,
        };

        Ok(Self {
            kind,
            path: PathBuf::from(DEFAULT_DB_FILE),
            busy_timeout_ms,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reject configurations that cannot be opened.
pub fn validate_db_config(cfg: &DbConfig) -> Result<(), DbInfraError> {
    match cfg.kind {
        DbKind::Sqlite => {
            if cfg.path.as_os_str().is_empty() {
                return Err(DbInfraError::config("SQLite database path is empty"));
            }
            if cfg.path.is_dir() {
                return Err(DbInfraError::config(format!(
                    "SQLite database path '{}' is a directory",
                    cfg.path.display()
                )));
            }
        }
    }
    Ok(())
}

/// Connection spec used for logging; pools are built from typed options.
pub fn make_conn_spec(cfg: &DbConfig) -> String {
    match cfg.kind {
        DbKind::Sqlite => format!("sqlite://{}?mode=rwc", cfg.path.display()),
    }
}

pub fn build_db_settings(cfg: &DbConfig, purpose: PoolPurpose) -> DbSettings {
    match cfg.kind {
        DbKind::Sqlite => DbSettings::Sqlite {
            busy_timeout_ms: cfg.busy_timeout_ms,
            foreign_keys: matches!(purpose, PoolPurpose::Runtime),
        },
    }
}

/// Build ordered session-level SQL statements for the given settings.
/// SQLite file prerequisites (journal_mode, synchronous) are handled separately.
pub fn build_session_statements(settings: &DbSettings) -> Vec<String> {
    match settings {
        DbSettings::Sqlite {
            busy_timeout_ms,
            foreign_keys,
        } => vec![
            format!(
                "PRAGMA foreign_keys = {};",
                if *foreign_keys { "ON" } else { "OFF" }
            ),
            format!("PRAGMA busy_timeout = {};", busy_timeout_ms),
        ],
    }
}
