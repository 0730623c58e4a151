//! Database bootstrap: schema convergence, runtime pool, startup seeding.

pub mod core;

pub use core::bootstrap_db;
pub use db_infra::db::{DbConfig, DbKind};
