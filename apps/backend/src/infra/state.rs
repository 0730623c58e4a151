use std::sync::Arc;

use crate::auth::password::{Argon2Hasher, CredentialHasher};
use crate::config::bootstrap::BootstrapConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    bootstrap: Option<BootstrapConfig>,
    hasher: Arc<dyn CredentialHasher>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            bootstrap: None,
            hasher: Arc::new(Argon2Hasher),
        }
    }

    pub fn with_bootstrap(mut self, cfg: BootstrapConfig) -> Self {
        self.bootstrap = Some(cfg);
        self
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let cfg = match self.bootstrap {
            Some(cfg) => cfg,
            None => BootstrapConfig::from_env()?,
        };
        bootstrap_db(&cfg, self.hasher.as_ref()).await
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use db_infra::db::DbConfig;

    use super::*;
    use crate::repos::users;

    struct Refusing;

    #[async_trait]
    impl CredentialHasher for Refusing {
        async fn hash(&self, _plaintext: &str) -> Result<String, AppError> {
            Err(AppError::credential("refused"))
        }
    }

    #[tokio::test]
    async fn custom_hasher_error_aborts_build() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BootstrapConfig::new(DbConfig::sqlite_file(dir.path().join("state.db")));

        let err = build_state()
            .with_bootstrap(cfg)
            .with_hasher(Arc::new(Refusing))
            .build()
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CREDENTIAL_ERROR");
    }

    #[tokio::test]
    async fn builds_state_with_seeded_user() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BootstrapConfig::new(DbConfig::sqlite_file(dir.path().join("state.db")));

        let state = build_state().with_bootstrap(cfg).build().await.unwrap();
        assert_eq!(users::count_users(state.db()).await.unwrap(), 1);
    }
}
