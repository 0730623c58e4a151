//! DTOs for users_sea adapter.

/// DTO for creating a new user. `password_hash` is already a PHC string.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    pub password_hash: String,
}

impl UserCreate {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}
