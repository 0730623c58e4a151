pub mod bootstrap;
pub mod seed;

pub use bootstrap::{BootstrapConfig, CatalogSeedMode, SeedSource};
pub use seed::{DemoUserSeed, ItemSeed, SeedFixture};
