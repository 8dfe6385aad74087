//! State storage error types

use thiserror::Error;

/// Errors raised while loading, validating or persisting environment state
#[derive(Error, Debug)]
pub enum StateError {
    #[error("state file error: {0}")]
    Invalid(String),

    #[error("state file version {found} is newer than supported version {supported}")]
    VersionTooNew { found: u32, supported: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StateError>;
