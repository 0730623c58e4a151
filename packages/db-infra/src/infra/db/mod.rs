pub mod core;
pub mod diagnostics;

pub use core::{build_admin_pool, build_pool, orchestrate_migration, orchestrate_migration_internal};
pub use diagnostics::sqlite_diagnostics;
