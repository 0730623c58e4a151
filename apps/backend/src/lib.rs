#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod infra;
pub mod repos;
pub mod services;
pub mod state;
pub mod telemetry;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::password::{hash_password, verify_password, Argon2Hasher, CredentialHasher};
pub use config::bootstrap::{BootstrapConfig, CatalogSeedMode, SeedSource};
pub use config::seed::SeedFixture;
pub use error::AppError;
pub use infra::db::bootstrap_db;
pub use infra::state::{build_state, StateBuilder};
pub use services::seed::{CatalogReport, DemoUserOutcome, SeedReport};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
