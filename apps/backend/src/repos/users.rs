//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::entities::users;
use crate::errors::domain::DomainError;

/// User domain model. The hash is kept; the plaintext never reaches this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub async fn count_users<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(users_adapter::count_users(conn).await?)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
    password_hash: &str,
) -> Result<User, DomainError> {
    let dto = users_adapter::UserCreate::new(username, password_hash);
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

pub async fn find_user_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_username(conn, username).await?;
    Ok(user.map(User::from))
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
