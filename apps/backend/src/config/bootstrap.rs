use std::env;
use std::path::PathBuf;

use db_infra::db::DbConfig;

use crate::config::seed::SeedFixture;
use crate::error::AppError;

pub const SEED_FILE_VAR: &str = "STOREFRONT_SEED_FILE";
pub const CATALOG_MODE_VAR: &str = "STOREFRONT_CATALOG_MODE";

/// How catalog seeding treats rows that are not part of the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSeedMode {
    /// Delete every row whose slug is not in the fixture.
    #[default]
    Replace,
    /// Upsert fixture rows and leave everything else alone.
    Merge,
}

impl CatalogSeedMode {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim).unwrap_or_default().to_ascii_lowercase().as_str() {
            "" | "replace" => Ok(CatalogSeedMode::Replace),
            "merge" => Ok(CatalogSeedMode::Merge),
            other => Err(AppError::config(format!(
                "{CATALOG_MODE_VAR} must be 'replace' or 'merge', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeedSource {
    Builtin,
    File(PathBuf),
    Inline(SeedFixture),
}

impl SeedSource {
    pub fn load(&self) -> Result<SeedFixture, AppError> {
        match self {
            SeedSource::Builtin => SeedFixture::builtin(),
            SeedSource::File(path) => SeedFixture::from_path(path),
            SeedSource::Inline(fixture) => {
                fixture.validate()?;
                Ok(fixture.clone())
            }
        }
    }
}

/// Everything the bootstrapper needs, gathered up front.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    pub db: DbConfig,
    pub seed: SeedSource,
    pub catalog_mode: CatalogSeedMode,
}

impl BootstrapConfig {
    pub fn new(db: DbConfig) -> Self {
        Self {
            db,
            seed: SeedSource::Builtin,
            catalog_mode: CatalogSeedMode::default(),
        }
    }

    pub fn with_seed(mut self, seed: SeedSource) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_catalog_mode(mut self, mode: CatalogSeedMode) -> Self {
        self.catalog_mode = mode;
        self
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = DbConfig::from_lookup(&lookup)?;

        let seed = match lookup(SEED_FILE_VAR) {
            Some(path) if !path.trim().is_empty() => SeedSource::File(PathBuf::from(path.trim())),
            _ => SeedSource::Builtin,
        };

        let catalog_mode = CatalogSeedMode::parse(lookup(CATALOG_MODE_VAR).as_deref())?;

        Ok(Self {
            db,
            seed,
            catalog_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use db_infra::db::{DbKind, DB_TYPE_VAR, DEFAULT_DB_FILE};
    use serial_test::serial;

    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = BootstrapConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.db.kind, DbKind::Sqlite);
        assert_eq!(cfg.db.path, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(cfg.seed, SeedSource::Builtin);
        assert_eq!(cfg.catalog_mode, CatalogSeedMode::Replace);
    }

    #[test]
    fn reads_seed_file_and_mode() {
        let cfg = BootstrapConfig::from_lookup(lookup(&[
            (SEED_FILE_VAR, " /etc/storefront/seed.json "),
            (CATALOG_MODE_VAR, "Merge"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.seed,
            SeedSource::File(PathBuf::from("/etc/storefront/seed.json"))
        );
        assert_eq!(cfg.catalog_mode, CatalogSeedMode::Merge);
    }

    #[test]
    fn unsupported_db_type_is_a_config_error() {
        let err = BootstrapConfig::from_lookup(lookup(&[(DB_TYPE_VAR, "postgres")])).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn unknown_catalog_mode_is_rejected() {
        let err =
            BootstrapConfig::from_lookup(lookup(&[(CATALOG_MODE_VAR, "append")])).unwrap_err();
        assert!(err.to_string().contains("'append'"));
    }

    #[test]
    #[serial]
    fn from_env_honours_db_type() {
        env::set_var(DB_TYPE_VAR, "mysql");
        let result = BootstrapConfig::from_env();
        env::remove_var(DB_TYPE_VAR);
        assert!(result.is_err());
    }

    #[test]
    fn inline_source_is_validated() {
        let mut fixture = SeedFixture::builtin().unwrap();
        fixture.items.clear();
        assert!(SeedSource::Inline(fixture).load().is_err());
    }
}
