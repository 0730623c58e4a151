use std::time::{Duration, Instant};

use migration::{count_applied_migrations, migrate, MigrationCommand, Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, SqlxSqliteConnector, Statement};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{error, info, trace};

use crate::config::db::{
    build_db_settings, build_session_statements, make_conn_spec, validate_db_config, DbConfig,
    DbKind, DbSettings, PoolPurpose,
};
use crate::error::DbInfraError;
use crate::infra::db::diagnostics::sqlite_diagnostics;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);
const RUNTIME_POOL_MIN: u32 = 1;
const RUNTIME_POOL_MAX: u32 = 5;

/// Apply per-connection settings (foreign_keys + busy_timeout)
async fn apply_sqlite_config(
    conn: &mut sqlx::SqliteConnection,
    settings: &DbSettings,
) -> Result<(), sqlx::Error> {
    for stmt in build_session_statements(settings) {
        sqlx::query(&stmt).execute(&mut *conn).await?;
    }
    Ok(())
}

async fn build_sqlite_pool(
    cfg: &DbConfig,
    purpose: PoolPurpose,
    min: u32,
    max: u32,
) -> Result<DatabaseConnection, DbInfraError> {
    let connect_opts = SqliteConnectOptions::new()
        .filename(&cfg.path)
        .create_if_missing(true);

    let db_settings = build_db_settings(cfg, purpose);
    let pool: SqlitePool = SqlitePoolOptions::new()
        .min_connections(min)
        .max_connections(max)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .after_connect(move |conn, _meta| {
            let settings = db_settings.clone();
            Box::pin(async move {
                apply_sqlite_config(conn, &settings).await?;
                trace!("db=sqlite hook=after_connect ok");
                Ok::<_, sqlx::Error>(())
            })
        })
        .connect_with(connect_opts)
        .await
        .map_err(|e| {
            DbInfraError::connect(format!(
                "failed to open SQLite database '{}' ({purpose:?} pool): {e}",
                cfg.path.display()
            ))
        })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Build the migration pool: exactly one connection, foreign keys disabled.
pub async fn build_admin_pool(cfg: &DbConfig) -> Result<DatabaseConnection, DbInfraError> {
    match cfg.kind {
        DbKind::Sqlite => build_sqlite_pool(cfg, PoolPurpose::Migration, 1, 1).await,
    }
}

/// Build the runtime pool handed to the application once bootstrap is done.
pub async fn build_pool(cfg: &DbConfig) -> Result<DatabaseConnection, DbInfraError> {
    validate_db_config(cfg)?;

    let db = match cfg.kind {
        DbKind::Sqlite => {
            build_sqlite_pool(cfg, PoolPurpose::Runtime, RUNTIME_POOL_MIN, RUNTIME_POOL_MAX)
                .await?
        }
    };

    sqlite_diagnostics::log_pragma_snapshot(&db, "runtime")
        .await
        .map_err(|e| DbInfraError::connect(format!("failed to inspect runtime pool: {e}")))?;

    info!(
        "pool=create engine={} path={} min={} max={}",
        cfg.kind.engine(),
        cfg.path.display(),
        RUNTIME_POOL_MIN,
        RUNTIME_POOL_MAX
    );
    Ok(db)
}

/// Returns true when every defined migration is already applied, in order.
async fn fast_path_schema_check(conn: &DatabaseConnection) -> Result<bool, DbInfraError> {
    let expected_count = Migrator::migrations().len();
    let expected_last = Migrator::migrations()
        .last()
        .map(|m| m.name().to_string())
        .unwrap_or_default();

    let (current_count, current_last) = match Migrator::get_applied_migrations(conn).await {
        Ok(migrations) => {
            let last = migrations.last().map(|m| m.name().to_string());
            (migrations.len(), last)
        }
        Err(DbErr::Exec(_)) => {
            trace!(fastpath = "miss", reason = "migration_table_missing");
            return Ok(false);
        }
        Err(e) => {
            return Err(DbInfraError::migration(format!(
                "failed to get applied migrations: {e}"
            )));
        }
    };

    let is_up_to_date = current_count == expected_count
        && !expected_last.is_empty()
        && current_last.as_deref() == Some(expected_last.as_str());

    trace!(
        fastpath = if is_up_to_date { "hit" } else { "miss" },
        current_count = current_count,
        expected_count = expected_count,
        current_last = %current_last.as_deref().unwrap_or(""),
        expected_last = %expected_last
    );

    Ok(is_up_to_date)
}

/// Open an admin pool, run `command`, close the pool.
pub async fn orchestrate_migration(
    cfg: &DbConfig,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    validate_db_config(cfg)?;

    let admin_pool = build_admin_pool(cfg).await?;
    let result = orchestrate_migration_internal(&admin_pool, cfg, command).await;

    if let Err(e) = admin_pool.close().await {
        trace!(error = %e, "admin pool close failed");
    }
    result
}

/// Run a migration command on an existing (admin) pool and verify the outcome.
pub async fn orchestrate_migration_internal(
    pool: &DatabaseConnection,
    cfg: &DbConfig,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    info!(
        "migrate=start db_kind={:?} engine={} path={} cmd={:?}",
        cfg.kind,
        cfg.kind.engine(),
        make_conn_spec(cfg),
        command
    );

    if !command.is_mutating() {
        migrate(pool, command)
            .await
            .map_err(|e| DbInfraError::migration(format!("migration execution failed: {e}")))?;
        info!("migrate=done");
        return Ok(());
    }

    if matches!(command, MigrationCommand::Up) && fast_path_schema_check(pool).await? {
        info!("migrate=skipped up_to_date=true");
        return Ok(());
    }

    let result = run_and_verify(pool, cfg, command).await;

    if let Err(ref e) = result {
        let msg = e.to_string();
        if msg.contains("database is locked") || msg.contains("SQLITE_BUSY") {
            error!("sqlite_busy op=migrate err={:?}", e);
        }
    }

    info!("migrate=done");
    result
}

async fn run_and_verify(
    pool: &DatabaseConnection,
    cfg: &DbConfig,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    let start = Instant::now();

    match cfg.kind {
        DbKind::Sqlite => setup_sqlite_file_prerequisites(pool).await?,
    }

    migrate(pool, command)
        .await
        .map_err(|e| DbInfraError::migration(format!("migration execution failed: {e}")))?;

    info!(
        migrator = "ran",
        db_kind = ?cfg.kind,
        elapsed_ms = start.elapsed().as_millis()
    );

    let expected_count = Migrator::migrations().len();
    let applied_count = count_applied_migrations(pool)
        .await
        .map_err(|e| DbInfraError::migration(format!("failed to count migrations: {e}")))?;
    info!(
        migrate = "counts",
        expected_count = expected_count,
        applied_count = applied_count
    );

    match command {
        MigrationCommand::Reset if applied_count != 0 => Err(DbInfraError::migration(format!(
            "Migration verification failed: reset should leave 0 migrations applied, but {applied_count} were found"
        ))),
        MigrationCommand::Up | MigrationCommand::Fresh | MigrationCommand::Refresh
            if applied_count != expected_count =>
        {
            Err(DbInfraError::migration(format!(
                "Migration verification failed: expected {expected_count} migrations, but {applied_count} were applied"
            )))
        }
        _ => Ok(()),
    }
}

async fn setup_sqlite_file_prerequisites(pool: &DatabaseConnection) -> Result<(), DbInfraError> {
    for (pragma, stmt) in [
        ("journal_mode", "PRAGMA journal_mode = WAL;"),
        ("synchronous", "PRAGMA synchronous = NORMAL;"),
    ] {
        pool.execute(Statement::from_string(sea_orm::DatabaseBackend::Sqlite, stmt))
            .await
            .map_err(|e| DbInfraError::migration(format!("failed to set {pragma}: {e}")))?;
    }
    Ok(())
}
