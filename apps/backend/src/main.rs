use storefront::config::bootstrap::BootstrapConfig;
use storefront::infra::state::build_state;
use storefront::telemetry;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    // DB_TYPE, SQLITE_BUSY_TIMEOUT_MS, STOREFRONT_SEED_FILE and
    // STOREFRONT_CATALOG_MODE are read once, here.
    let cfg = match BootstrapConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let db_path = cfg.db.path.display().to_string();

    let state = match build_state().with_bootstrap(cfg).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to bootstrap storefront database [{}]: {e}", e.code());
            std::process::exit(1);
        }
    };

    println!(
        "✅ Storefront database ready at {db_path} ({} catalog items)",
        state.seed.catalog.seeded()
    );

    if let Err(e) = state.db.close().await {
        eprintln!("❌ Failed to close database pool: {e}");
        std::process::exit(1);
    }
}
