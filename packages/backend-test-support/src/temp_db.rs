//! A throwaway SQLite file per test.

use std::path::{Path, PathBuf};

use db_infra::db::{DbConfig, DEFAULT_DB_FILE};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement};
use tempfile::TempDir;
use tracing::debug;

/// Owns a temporary directory; the database file lives inside it and is
/// removed together with the directory on drop.
pub struct TempDb {
    dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(DEFAULT_DB_FILE);
        debug!(path = %path.display(), "temp db allocated");
        Ok(Self { dir, path })
    }

    /// Path of the database file. It does not exist until something opens it.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::sqlite_file(&self.path)
    }
}

/// `SELECT COUNT(*)` on `table`.
pub async fn count_rows(conn: &DatabaseConnection, table: &str) -> Result<i64, DbErr> {
    let row = conn
        .query_one(Statement::from_string(
            conn.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("no count row for {table}")))?;
    row.try_get::<i64>("", "n")
}
