//! Declarative seed data: the demo account and the storefront catalog.
//!
//! The default fixture ships inside the binary (`seed/storefront.json`);
//! operators can point `STOREFRONT_SEED_FILE` at their own copy.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const BUILTIN_FIXTURE: &str = include_str!("../../seed/storefront.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoUserSeed {
    pub username: String,
    pub password: String,
}

/// One catalog entry. `slug` is the stable key used for upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSeed {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: i32,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedFixture {
    pub demo_user: DemoUserSeed,
    pub items: Vec<ItemSeed>,
}

impl SeedFixture {
    /// The fixture compiled into the binary.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_FIXTURE)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let fixture: SeedFixture = serde_json::from_str(raw)
            .map_err(|e| AppError::fixture(format!("invalid seed fixture JSON: {e}")))?;
        fixture.validate()?;
        Ok(fixture)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::fixture(format!(
                "failed to read seed fixture '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    /// Reject fixtures that would leave the catalog in a nonsensical state.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.demo_user.username.trim().is_empty() {
            return Err(AppError::fixture("demo_user.username must not be empty"));
        }
        if self.demo_user.password.is_empty() {
            return Err(AppError::fixture("demo_user.password must not be empty"));
        }
        if self.items.is_empty() {
            return Err(AppError::fixture("seed fixture contains no items"));
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            item.validate()?;
            if !seen.insert(item.slug.as_str()) {
                return Err(AppError::fixture(format!(
                    "duplicate item slug '{}'",
                    item.slug
                )));
            }
        }
        Ok(())
    }
}

impl ItemSeed {
    fn validate(&self) -> Result<(), AppError> {
        if self.slug.trim().is_empty() {
            return Err(AppError::fixture(format!(
                "item '{}' has an empty slug",
                self.name
            )));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::fixture(format!(
                "item '{}' has an empty name",
                self.slug
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::fixture(format!(
                "item '{}' has invalid price {}",
                self.slug, self.price
            )));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(AppError::fixture(format!(
                "item '{}' rating {} is outside 0..=5",
                self.slug, self.rating
            )));
        }
        if self.reviews < 0 {
            return Err(AppError::fixture(format!(
                "item '{}' has a negative review count",
                self.slug
            )));
        }
        Ok(())
    }
}
