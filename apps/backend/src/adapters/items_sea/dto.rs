//! DTOs for items_sea adapter.

use crate::config::seed::ItemSeed;

/// Full set of writable catalog columns, keyed by `slug`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpsert {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub rating: f64,
    pub reviews: i32,
    pub image: String,
    pub in_stock: bool,
}

impl From<&ItemSeed> for ItemUpsert {
    fn from(seed: &ItemSeed) -> Self {
        Self {
            slug: seed.slug.clone(),
            name: seed.name.clone(),
            description: seed.description.clone(),
            price: seed.price,
            category: seed.category.clone(),
            rating: seed.rating,
            reviews: seed.reviews,
            image: seed.image.clone(),
            in_stock: seed.in_stock,
        }
    }
}
