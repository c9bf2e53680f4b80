//! Error types for sqlarray

use std::path::PathBuf;

use thiserror::Error;

use crate::value::{SqlValue, TypeTag};

#[derive(Debug, Error)]
pub enum Error {
    #[error("database file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("key {key} not found in table {table}")]
    KeyNotFound { table: String, key: SqlValue },

    #[error("invalid key: {0}")]
    InvalidKey(SqlValue),

    #[error("invalid table name: {0:?}")]
    InvalidName(String),

    #[error("invalid type: {0}")]
    InvalidType(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl Error {
    /// True for both a missing database file and a missing key
    pub fn is_not_found(&self) -> bool { matches!(self, Error::FileNotFound(_) | Error::KeyNotFound { .. }) }
}

/// Failures converting between application values and stored values
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("expected a stored {expected} value, found {found}")]
    UnexpectedType { expected: TypeTag, found: TypeTag },

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, Error>;
