use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use tokio::task;

use crate::error::AppError;

/// One-way credential transform used when seeding or registering accounts.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError>;
}

/// Argon2id with the crate defaults and a fresh `OsRng` salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        hash_password(plaintext).await
    }
}

/// Hash a password into a PHC string.
///
/// CPU-bound, so it runs on a blocking thread.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::credential(format!("failed to hash password: {e}")))
    })
    .await
    .map_err(|e| AppError::internal(format!("password hashing task failed: {e}")))?
}

/// Verify a password against a stored PHC string.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash)
            .map_err(|e| AppError::credential(format!("invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::credential(format!(
                "password verification failed: {e}"
            ))),
        }
    })
    .await
    .map_err(|e| AppError::internal(format!("password verification task failed: {e}")))?
}
