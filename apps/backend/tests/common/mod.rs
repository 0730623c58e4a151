#![allow(dead_code)]

use backend_test_support::TempDb;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use storefront::config::bootstrap::BootstrapConfig;
use storefront::entities::{cart_items, carts};

// Logging is auto-installed for every test binary that declares `mod common;`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub fn temp_db() -> TempDb {
    TempDb::new().expect("allocate temp db dir")
}

pub fn bootstrap_config(db: &TempDb) -> BootstrapConfig {
    BootstrapConfig::new(db.db_config())
}

/// Put one unit of `item_id` into a fresh cart owned by `user_id`.
pub async fn add_to_new_cart(conn: &DatabaseConnection, user_id: i64, item_id: i64) -> i64 {
    let now = time::OffsetDateTime::now_utc();
    let cart = carts::ActiveModel {
        user_id: Set(user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .expect("insert cart");

    cart_items::ActiveModel {
        cart_id: Set(cart.id),
        item_id: Set(item_id),
        quantity: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .expect("insert cart item");

    cart.id
}
