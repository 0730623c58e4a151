mod common;

use std::env;
use std::fs;
use std::path::Path;

use backend_test_support::temp_db::count_rows;
use backend_test_support::unique_helpers::{unique_str, unique_username};
use db_infra::db::{DB_TYPE_VAR, DEFAULT_DB_FILE};
use db_infra::infra::db::sqlite_diagnostics;
use storefront::adapters::items_sea::ItemUpsert;
use storefront::auth::password::{verify_password, Argon2Hasher};
use storefront::config::bootstrap::{BootstrapConfig, CatalogSeedMode, SeedSource};
use storefront::config::seed::{ItemSeed, SeedFixture};
use storefront::error::AppError;
use serial_test::serial;
use storefront::infra::db::bootstrap_db;
use storefront::infra::state::build_state;
use storefront::repos::{items, users};
use storefront::services::seed::DemoUserOutcome;

fn extra_item(slug: &str) -> ItemSeed {
    ItemSeed {
        slug: slug.to_string(),
        name: "Hand-thrown Tea Bowl".to_string(),
        description: "Stoneware, wood-fired.".to_string(),
        price: 42.0,
        category: "Home & Garden".to_string(),
        rating: 4.5,
        reviews: 3,
        image: String::new(),
        in_stock: true,
    }
}

#[tokio::test]
async fn empty_database_gets_demo_user_and_full_catalog() {
    let db = common::temp_db();
    let state = bootstrap_db(&common::bootstrap_config(&db), &Argon2Hasher)
        .await
        .expect("bootstrap");
    let conn = state.db();

    assert_eq!(users::count_users(conn).await.unwrap(), 1);
    let admin = users::find_user_by_username(conn, "admin")
        .await
        .unwrap()
        .expect("admin user");
    assert_ne!(admin.password_hash, "artisan123");
    assert!(admin.password_hash.starts_with("$argon2id$"));
    assert!(verify_password("artisan123", &admin.password_hash)
        .await
        .unwrap());
    assert!(!verify_password("wrong", &admin.password_hash).await.unwrap());

    let catalog = items::list_all(conn).await.unwrap();
    assert_eq!(catalog.len(), 8);
    let backpack = catalog
        .iter()
        .find(|i| i.name == "Vintage Leather Backpack")
        .expect("backpack");
    assert_eq!(backpack.price, 189.99);

    let fixture = SeedFixture::builtin().unwrap();
    for seed in &fixture.items {
        let row = items::find_by_slug(conn, &seed.slug).await.unwrap().unwrap();
        assert!(row.matches(&ItemUpsert::from(seed)), "{} differs", seed.slug);
    }
}

#[tokio::test]
async fn existing_user_suppresses_demo_account() {
    let db = common::temp_db();
    let cfg = common::bootstrap_config(&db);

    db_infra::orchestrate_migration(&cfg.db, migration::MigrationCommand::Up)
        .await
        .unwrap();
    let pool = db_infra::build_pool(&cfg.db).await.unwrap();
    let owner = unique_username("owner");
    users::create_user(&pool, &owner, "$argon2id$v=19$preexisting")
        .await
        .unwrap();
    pool.close().await.unwrap();

    let state = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap();
    assert_eq!(state.seed.demo_user, DemoUserOutcome::Skipped { existing: 1 });
    assert_eq!(users::count_users(state.db()).await.unwrap(), 1);
    assert!(users::find_user_by_username(state.db(), "admin")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn second_bootstrap_is_idempotent() {
    let db = common::temp_db();
    let cfg = common::bootstrap_config(&db);

    let first = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap();
    let before = items::list_all(first.db()).await.unwrap();
    first.db.close().await.unwrap();

    let second = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap();
    assert!(matches!(second.seed.demo_user, DemoUserOutcome::Skipped { .. }));
    assert_eq!(second.seed.catalog.unchanged, 8);
    assert_eq!(second.seed.catalog.inserted, 0);

    let after = items::list_all(second.db()).await.unwrap();
    assert_eq!(before, after, "rows keep ids and timestamps");
    assert_eq!(users::count_users(second.db()).await.unwrap(), 1);
}

#[tokio::test]
async fn replace_mode_removes_stale_rows_and_their_cart_lines() {
    let db = common::temp_db();
    let cfg = common::bootstrap_config(&db);

    let state = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap();
    let conn = state.db();
    let stale = items::create_item(conn, ItemUpsert::from(&extra_item(&unique_str("bowl"))))
        .await
        .unwrap();
    let admin = users::find_user_by_username(conn, "admin")
        .await
        .unwrap()
        .unwrap();
    common::add_to_new_cart(conn, admin.id, stale.id).await;
    assert_eq!(count_rows(conn, "cart_items").await.unwrap(), 1);
    state.db.close().await.unwrap();

    let state = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap();
    assert_eq!(state.seed.catalog.removed, 1);
    assert_eq!(items::list_all(state.db()).await.unwrap().len(), 8);
    assert!(items::find_by_slug(state.db(), &stale.slug)
        .await
        .unwrap()
        .is_none());
    assert_eq!(count_rows(state.db(), "cart_items").await.unwrap(), 0);
}

#[tokio::test]
async fn merge_mode_keeps_unrelated_rows() {
    let db = common::temp_db();
    let cfg = common::bootstrap_config(&db).with_catalog_mode(CatalogSeedMode::Merge);

    let state = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap();
    let slug = unique_str("bowl");
    items::create_item(state.db(), ItemUpsert::from(&extra_item(&slug)))
        .await
        .unwrap();
    state.db.close().await.unwrap();

    let state = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap();
    assert_eq!(state.seed.catalog.removed, 0);
    assert_eq!(items::list_all(state.db()).await.unwrap().len(), 9);
    assert!(items::find_by_slug(state.db(), &slug).await.unwrap().is_some());
}

#[tokio::test]
async fn fixture_edits_update_rows_in_place() {
    let db = common::temp_db();
    let first = bootstrap_db(&common::bootstrap_config(&db), &Argon2Hasher)
        .await
        .unwrap();
    let mut fixture = SeedFixture::builtin().unwrap();
    let slug = fixture.items[0].slug.clone();
    let original = items::find_by_slug(first.db(), &slug).await.unwrap().unwrap();
    first.db.close().await.unwrap();

    fixture.items[0].price = 99.5;
    fixture.items[0].in_stock = false;
    let path = db.dir().join("seed.json");
    fs::write(&path, serde_json::to_string_pretty(&fixture).unwrap()).unwrap();

    let cfg = common::bootstrap_config(&db).with_seed(SeedSource::File(path));
    let state = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap();
    assert_eq!(state.seed.catalog.updated, 1);
    assert_eq!(state.seed.catalog.unchanged, 7);

    let edited = items::find_by_slug(state.db(), &slug).await.unwrap().unwrap();
    assert_eq!(edited.id, original.id);
    assert_eq!(edited.created_at, original.created_at);
    assert_eq!(edited.price, 99.5);
    assert!(!edited.in_stock);
}

#[tokio::test]
async fn runtime_pool_enforces_foreign_keys() {
    let db = common::temp_db();
    let state = bootstrap_db(&common::bootstrap_config(&db), &Argon2Hasher)
        .await
        .unwrap();
    assert!(sqlite_diagnostics::foreign_keys_enabled(state.db())
        .await
        .unwrap());
}

#[test]
fn unsupported_storage_kind_touches_nothing() {
    let db = common::temp_db();
    let cfg = BootstrapConfig::from_lookup(|name| {
        (name == DB_TYPE_VAR).then(|| "postgres".to_string())
    });
    let err = cfg.unwrap_err();
    assert!(matches!(err, AppError::Config { .. }));
    assert!(err.to_string().contains("Only SQLite is currently supported"));
    assert!(!db.path().exists());
}

#[tokio::test]
async fn missing_fixture_file_fails_before_the_store_is_created() {
    let db = common::temp_db();
    let cfg = common::bootstrap_config(&db)
        .with_seed(SeedSource::File(db.dir().join("does-not-exist.json")));

    let err = bootstrap_db(&cfg, &Argon2Hasher).await.unwrap_err();
    assert_eq!(err.code(), "FIXTURE_ERROR");
    assert!(!db.path().exists());
}

#[tokio::test]
#[serial]
async fn unsupported_db_type_from_env_fails_before_default_file_exists() {
    let default_file = Path::new(DEFAULT_DB_FILE);
    assert!(!default_file.exists(), "stale {DEFAULT_DB_FILE} in the test working dir");

    env::set_var(DB_TYPE_VAR, "postgres");
    let result = build_state().build().await;
    env::remove_var(DB_TYPE_VAR);

    let err = result.unwrap_err();
    assert_eq!(err.code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("postgres"));
    assert!(!default_file.exists());
}

#[tokio::test]
async fn unreadable_database_file_is_a_fatal_db_error() {
    let db = common::temp_db();
    fs::write(db.path(), b"plain text, not a sqlite header\n".repeat(64)).unwrap();

    let err = bootstrap_db(&common::bootstrap_config(&db), &Argon2Hasher)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Db { .. }), "got {err}");
    assert!(err.to_string().contains("not a database"), "got {err}");
}
