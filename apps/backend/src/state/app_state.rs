use sea_orm::DatabaseConnection;

use crate::services::seed::SeedReport;

/// Application state handed back by bootstrap and owned by the caller
#[derive(Debug, Clone)]
pub struct AppState {
    /// Runtime pool (foreign keys on)
    pub db: DatabaseConnection,
    /// What startup seeding did
    pub seed: SeedReport,
}

impl AppState {
    pub fn new(db: DatabaseConnection, seed: SeedReport) -> Self {
        Self { db, seed }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
