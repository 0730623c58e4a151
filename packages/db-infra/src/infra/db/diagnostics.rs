/// SQLite PRAGMA inspection for logging and post-bootstrap checks
pub mod sqlite_diagnostics {
    use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, Statement};
    use tracing::info;

    const SNAPSHOT_PRAGMAS: [&str; 4] = ["journal_mode", "synchronous", "busy_timeout", "foreign_keys"];

    /// Read a single PRAGMA value as text (integers are stringified).
    pub async fn pragma_value<C: ConnectionTrait>(
        conn: &C,
        pragma: &str,
    ) -> Result<Option<String>, DbErr> {
        let row = conn
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!("PRAGMA {pragma};"),
            ))
            .await?;

        // column names differ from the pragma name (busy_timeout reports "timeout")
        Ok(row.and_then(|row| {
            row.try_get_by_index::<String>(0)
                .ok()
                .or_else(|| row.try_get_by_index::<i64>(0).ok().map(|v| v.to_string()))
        }))
    }

    /// Whether foreign key enforcement is active on the connection that serves the query.
    pub async fn foreign_keys_enabled<C: ConnectionTrait>(conn: &C) -> Result<bool, DbErr> {
        Ok(pragma_value(conn, "foreign_keys").await?.as_deref() == Some("1"))
    }

    pub async fn log_pragma_snapshot<C: ConnectionTrait>(
        conn: &C,
        pool_type: &str,
    ) -> Result<(), DbErr> {
        for pragma in SNAPSHOT_PRAGMAS {
            if let Some(value) = pragma_value(conn, pragma).await? {
                info!(pool = pool_type, pragma = pragma, value = %value, "sqlite pragma");
            }
        }
        Ok(())
    }
}
