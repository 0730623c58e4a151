use std::process;
use std::time::Instant;

use db_infra::db::validate_db_config;
use migration::MigrationCommand;
use tracing::info;

use crate::auth::password::CredentialHasher;
use crate::config::bootstrap::BootstrapConfig;
use crate::error::AppError;
use crate::services::seed::{seed_all, DemoUserOutcome};
use crate::state::app_state::AppState;

/// Converge the schema, seed the store and hand back the runtime pool.
///
/// Config and fixture are validated before the database file is touched.
/// Migrations run on the single-connection admin pool with foreign keys
/// off; seeding runs on the runtime pool with foreign keys on.
pub async fn bootstrap_db(
    cfg: &BootstrapConfig,
    hasher: &dyn CredentialHasher,
) -> Result<AppState, AppError> {
    validate_db_config(&cfg.db)?;
    let fixture = cfg.seed.load()?;

    let started = Instant::now();
    info!(
        "bootstrap=start db_kind={:?} engine={} path={} pid={} items={} catalog_mode={:?}",
        cfg.db.kind,
        cfg.db.kind.engine(),
        cfg.db.path.display(),
        process::id(),
        fixture.items.len(),
        cfg.catalog_mode
    );

    db_infra::orchestrate_migration(&cfg.db, MigrationCommand::Up).await?;

    let db = db_infra::build_pool(&cfg.db).await?;
    let report = seed_all(&db, &fixture, cfg.catalog_mode, hasher).await?;

    let user_created = matches!(report.demo_user, DemoUserOutcome::Created(_));
    info!(
        user_created,
        items = report.catalog.seeded(),
        removed = report.catalog.removed,
        "storefront database seeded successfully"
    );
    info!(
        "bootstrap=ready elapsed_ms={}",
        started.elapsed().as_millis()
    );

    Ok(AppState::new(db, report))
}
