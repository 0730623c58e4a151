//! Repository layer: domain models over the SeaORM adapters.

pub mod items;
pub mod users;
