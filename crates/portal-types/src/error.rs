//! Error types for the safety portal

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Persistent table errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table file corrupted ({path}): {reason}")]
    Corrupted { path: String, reason: String },

    #[error("Store lock poisoned: {0}")]
    Poisoned(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("The portal is locked for editing")]
    Locked,

    #[error("Spreadsheet import error: {0}")]
    Import(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("Upload rejected: {0}")]
    Upload(String),

    #[error("Chat backend error: {0}")]
    Chat(String),
}

impl Error {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        Error::NotFound { kind, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
