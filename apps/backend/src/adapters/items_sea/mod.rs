//! SeaORM adapter for catalog items.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::items;

pub mod dto;

pub use dto::ItemUpsert;

pub async fn list_items<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<items::Model>, sea_orm::DbErr> {
    items::Entity::find()
        .order_by_asc(items::Column::Id)
        .all(conn)
        .await
}

pub async fn find_item_by_slug<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug: &str,
) -> Result<Option<items::Model>, sea_orm::DbErr> {
    items::Entity::find()
        .filter(items::Column::Slug.eq(slug))
        .one(conn)
        .await
}

pub async fn create_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ItemUpsert,
) -> Result<items::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let item_active = items::ActiveModel {
        id: NotSet,
        slug: Set(dto.slug),
        name: Set(dto.name),
        description: Set(dto.description),
        price: Set(dto.price),
        category: Set(dto.category),
        rating: Set(dto.rating),
        reviews: Set(dto.reviews),
        image: Set(dto.image),
        in_stock: Set(dto.in_stock),
        created_at: Set(now),
        updated_at: Set(now),
    };

    item_active.insert(conn).await
}

/// Overwrite every writable column of row `id`; `created_at` is left as is.
pub async fn update_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: ItemUpsert,
) -> Result<items::Model, sea_orm::DbErr> {
    let item_active = items::ActiveModel {
        id: Set(id),
        slug: Set(dto.slug),
        name: Set(dto.name),
        description: Set(dto.description),
        price: Set(dto.price),
        category: Set(dto.category),
        rating: Set(dto.rating),
        reviews: Set(dto.reviews),
        image: Set(dto.image),
        in_stock: Set(dto.in_stock),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };

    item_active.update(conn).await
}

pub async fn delete_items_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<u64, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }
    let res = items::Entity::delete_many()
        .filter(items::Column::Id.is_in(ids))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
