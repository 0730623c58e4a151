//! Backend test support utilities
//!
//! Isolated SQLite files, unique test data, and unified logging for tests.

pub mod logging;
pub mod temp_db;
pub mod unique_helpers;

pub use temp_db::TempDb;
