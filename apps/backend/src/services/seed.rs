//! Startup seeding: the demo account and the catalog.

use std::collections::{HashMap, HashSet};

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::{debug, info};

use crate::adapters::items_sea::ItemUpsert;
use crate::auth::password::CredentialHasher;
use crate::config::bootstrap::CatalogSeedMode;
use crate::config::seed::{DemoUserSeed, ItemSeed, SeedFixture};
use crate::error::AppError;
use crate::infra::db_errors::map_db_err;
use crate::repos::items::{self, Item};
use crate::repos::users::{self, User};

#[derive(Debug, Clone, PartialEq)]
pub enum DemoUserOutcome {
    Created(User),
    /// Users already existed; nothing was written.
    Skipped { existing: u64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: u64,
}

impl CatalogReport {
    /// Number of fixture entries now present in the table.
    pub fn seeded(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    pub demo_user: DemoUserOutcome,
    pub catalog: CatalogReport,
}

/// Create the demo account, but only on an empty users table.
pub async fn seed_demo_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    seed: &DemoUserSeed,
    hasher: &dyn CredentialHasher,
) -> Result<DemoUserOutcome, AppError> {
    let existing = users::count_users(conn).await?;
    if existing > 0 {
        debug!(existing, "demo user skipped: users table not empty");
        return Ok(DemoUserOutcome::Skipped { existing });
    }

    let password_hash = hasher.hash(&seed.password).await?;
    let user = users::create_user(conn, &seed.username, &password_hash).await?;

    info!(username = %user.username, user_id = user.id, "demo user created");
    Ok(DemoUserOutcome::Created(user))
}

/// Converge the items table onto `fixture_items`, keyed by slug, in one transaction.
///
/// Rows with identical content are not rewritten, so ids and `created_at`
/// survive restarts. In `Replace` mode rows absent from the fixture are
/// deleted; in `Merge` mode they are kept.
pub async fn seed_catalog(
    conn: &DatabaseConnection,
    fixture_items: &[ItemSeed],
    mode: CatalogSeedMode,
) -> Result<CatalogReport, AppError> {
    let txn = conn.begin().await.map_err(map_db_err)?;

    let existing: HashMap<String, Item> = items::list_all(&txn)
        .await?
        .into_iter()
        .map(|item| (item.slug.clone(), item))
        .collect();

    let mut report = CatalogReport::default();

    if mode == CatalogSeedMode::Replace {
        let wanted: HashSet<&str> = fixture_items.iter().map(|i| i.slug.as_str()).collect();
        let stale: Vec<i64> = existing
            .values()
            .filter(|item| !wanted.contains(item.slug.as_str()))
            .map(|item| item.id)
            .collect();
        report.removed = items::delete_items(&txn, stale).await?;
    }

    for seed in fixture_items {
        let draft = ItemUpsert::from(seed);
        match existing.get(&seed.slug) {
            Some(current) if current.matches(&draft) => report.unchanged += 1,
            Some(current) => {
                items::update_item(&txn, current.id, draft).await?;
                report.updated += 1;
            }
            None => {
                items::create_item(&txn, draft).await?;
                report.inserted += 1;
            }
        }
    }

    txn.commit().await.map_err(map_db_err)?;

    info!(
        inserted = report.inserted,
        updated = report.updated,
        unchanged = report.unchanged,
        removed = report.removed,
        mode = ?mode,
        "catalog seeded"
    );
    Ok(report)
}

/// Demo user first, then the catalog.
pub async fn seed_all(
    conn: &DatabaseConnection,
    fixture: &SeedFixture,
    mode: CatalogSeedMode,
    hasher: &dyn CredentialHasher,
) -> Result<SeedReport, AppError> {
    let demo_user = seed_demo_user(conn, &fixture.demo_user, hasher).await?;
    let catalog = seed_catalog(conn, &fixture.items, mode).await?;
    Ok(SeedReport { demo_user, catalog })
}
