pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;
pub use sea_orm::{ConnectionTrait, DatabaseConnection};

mod m20251014_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251014_000001_init::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl MigrationCommand {
    /// Whether the command changes the schema (everything except `Status`).
    pub fn is_mutating(self) -> bool {
        !matches!(self, MigrationCommand::Status)
    }
}

impl std::str::FromStr for MigrationCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(MigrationCommand::Up),
            "down" => Ok(MigrationCommand::Down),
            "fresh" => Ok(MigrationCommand::Fresh),
            "reset" => Ok(MigrationCommand::Reset),
            "refresh" => Ok(MigrationCommand::Refresh),
            "status" => Ok(MigrationCommand::Status),
            other => Err(format!(
                "Unknown command: {other}. Use: up | down | fresh | reset | refresh | status"
            )),
        }
    }
}

/// Migration function that bypasses environment parsing
/// Used by both CLI and bootstrap
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let db_info_before = get_db_diagnostics(db).await?;

    tracing::info!("▶ cmd={command:?}  backend={}", db_info_before.backend);
    tracing::info!("▶ connected to DB: {}", db_info_before.name);
    tracing::info!(
        "▶ BEFORE: runner has {} migration(s) defined, {} applied",
        db_info_before.defined_migrations_count,
        db_info_before.mig_count
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            if command.is_mutating() {
                let db_info_after = get_db_diagnostics(db).await?;
                tracing::info!(
                    "▶ AFTER: runner has {} migration(s) defined, {} applied",
                    db_info_after.defined_migrations_count,
                    db_info_after.mig_count
                );
            }
            tracing::info!("✅ {command:?} OK for {}", db_info_before.name);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ {command:?} failed for {}: {e}", db_info_before.name);
            Err(e)
        }
    }
}

#[derive(Debug)]
struct DbDiagnostics {
    backend: String,
    name: String,
    mig_count: usize,
    defined_migrations_count: usize,
}

async fn get_db_diagnostics(db: &DatabaseConnection) -> Result<DbDiagnostics, DbErr> {
    let backend = format!("{:?}", db.get_database_backend());

    let name = match db.get_database_backend() {
        sea_orm::DatabaseBackend::Sqlite => {
            let stmt = Statement::from_string(
                db.get_database_backend(),
                String::from("SELECT file FROM pragma_database_list WHERE name = 'main'"),
            );
            match db.query_one(stmt).await? {
                Some(row) => match row.try_get::<String>("", "file") {
                    Ok(file) if file.is_empty() => ":memory:".to_string(),
                    Ok(file) => file,
                    Err(_) => "<unknown>".to_string(),
                },
                None => "<unknown>".to_string(),
            }
        }
        _ => "<unsupported>".to_string(),
    };

    let applied_migrations_count = count_applied_migrations(db).await.unwrap_or(0);
    let defined_migrations_count = Migrator::migrations().len();

    Ok(DbDiagnostics {
        backend,
        name,
        mig_count: applied_migrations_count,
        defined_migrations_count,
    })
}

/// Count the number of migrations that have been applied to the database.
/// Returns 0 if the migration table doesn't exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0), // Migration table doesn't exist yet
        Err(e) => Err(e),
    }
}

/// Get the version string of the latest applied migration.
/// Returns None if no migrations have been applied or the migration table doesn't exist.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::sea_orm::{ConnectOptions, Database, DatabaseBackend};

    use super::*;

    async fn memory_db() -> DatabaseConnection {
        // one connection, otherwise every pooled connection is its own database
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.min_connections(1).max_connections(1);
        Database::connect(opt).await.unwrap()
    }

    async fn table_names(db: &DatabaseConnection) -> Vec<String> {
        let rows = db
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
            ))
            .await
            .unwrap();
        rows.iter()
            .map(|r| r.try_get::<String>("", "name").unwrap())
            .collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!("up".parse::<MigrationCommand>(), Ok(MigrationCommand::Up));
        assert_eq!(
            "status".parse::<MigrationCommand>(),
            Ok(MigrationCommand::Status)
        );
        assert!("sideways".parse::<MigrationCommand>().is_err());
        assert!(!MigrationCommand::Status.is_mutating());
        assert!(MigrationCommand::Fresh.is_mutating());
    }

    #[tokio::test]
    async fn up_creates_all_tables_and_reset_removes_them() {
        let db = memory_db().await;

        migrate(&db, MigrationCommand::Up).await.unwrap();
        let tables = table_names(&db).await;
        for expected in ["cart_items", "carts", "items", "orders", "users"] {
            assert!(
                tables.iter().any(|t| t == expected),
                "missing table {expected}: {tables:?}"
            );
        }
        assert_eq!(
            count_applied_migrations(&db).await.unwrap(),
            Migrator::migrations().len()
        );
        assert_eq!(
            get_latest_migration_version(&db).await.unwrap().as_deref(),
            Some("m20251014_000001_init")
        );

        // second up is a no-op
        migrate(&db, MigrationCommand::Up).await.unwrap();
        assert_eq!(count_applied_migrations(&db).await.unwrap(), 1);

        migrate(&db, MigrationCommand::Reset).await.unwrap();
        assert_eq!(count_applied_migrations(&db).await.unwrap(), 0);
        let tables = table_names(&db).await;
        assert!(!tables.iter().any(|t| t == "items"));
    }

    #[tokio::test]
    async fn counts_zero_before_first_migration() {
        let db = memory_db().await;
        assert_eq!(count_applied_migrations(&db).await.unwrap(), 0);
        assert_eq!(get_latest_migration_version(&db).await.unwrap(), None);
    }
}
