//! Error types for phonelog-rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhoneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A line of the persisted carrier cache could not be read back
    #[error("Corrupt carrier cache {} at line {line}: {reason}", path.display())]
    CorruptCache {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A line of a persisted record file could not be read back
    #[error("Corrupt record file {} at line {line}: {reason}", path.display())]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Corrupt contacts snapshot: {0}")]
    CorruptContacts(String),

    #[error("Device query failed: {0}")]
    Query(String),

    #[error("Carrier lookup failed: {0}")]
    Lookup(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PhoneError>;
