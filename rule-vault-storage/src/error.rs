//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Cursor error: {0}")]
    Cursor(String),

    #[error("Insert error: {0}")]
    Insert(String),

    #[error("Storage session is closed")]
    Closed,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors returned through the policy engine contract
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Not implemented: {0}")]
    Unsupported(&'static str),
}

impl AdapterError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, AdapterError::Unsupported(_))
    }
}
