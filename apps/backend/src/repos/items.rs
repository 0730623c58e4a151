//! Catalog item repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::items_sea as items_adapter;
use crate::adapters::items_sea::ItemUpsert;
use crate::entities::items;
use crate::errors::domain::DomainError;

/// Catalog item domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub rating: f64,
    pub reviews: i32,
    pub image: String,
    pub in_stock: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl Item {
    /// True when every content column equals `draft` (ids and timestamps ignored).
    pub fn matches(&self, draft: &ItemUpsert) -> bool {
        self.slug == draft.slug
            && self.name == draft.name
            && self.description == draft.description
            && self.price == draft.price
            && self.category == draft.category
            && self.rating == draft.rating
            && self.reviews == draft.reviews
            && self.image == draft.image
            && self.in_stock == draft.in_stock
    }
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<Item>, DomainError> {
    let rows = items_adapter::list_items(conn).await?;
    Ok(rows.into_iter().map(Item::from).collect())
}

pub async fn find_by_slug<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug: &str,
) -> Result<Option<Item>, DomainError> {
    let row = items_adapter::find_item_by_slug(conn, slug).await?;
    Ok(row.map(Item::from))
}

pub async fn create_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    draft: ItemUpsert,
) -> Result<Item, DomainError> {
    let row = items_adapter::create_item(conn, draft).await?;
    Ok(Item::from(row))
}

pub async fn update_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    draft: ItemUpsert,
) -> Result<Item, DomainError> {
    let row = items_adapter::update_item(conn, id, draft).await?;
    Ok(Item::from(row))
}

pub async fn delete_items<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<u64, DomainError> {
    Ok(items_adapter::delete_items_by_ids(conn, ids).await?)
}

impl From<items::Model> for Item {
    fn from(model: items::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            name: model.name,
            description: model.description,
            price: model.price,
            category: model.category,
            rating: model.rating,
            reviews: model.reviews,
            image: model.image,
            in_stock: model.in_stock,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
