use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Only SQLite is currently supported (DB_TYPE={value:?})")]
    UnsupportedKind { value: String },
    #[error("Failed to connect to database: {message}")]
    Connect { message: String },
    #[error("Failed to migrate database: {message}")]
    Migration { message: String },
}

impl DbInfraError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }
}
