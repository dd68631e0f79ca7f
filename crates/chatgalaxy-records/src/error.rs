//! Error taxonomy shared by every chatgalaxy crate

use thiserror::Error;

/// Errors raised while loading, decoding or processing a dataset
#[derive(Debug, Error)]
pub enum GalaxyError {
    /// The message store could not be opened or queried
    #[error("message store unavailable: {reason}")]
    StorageUnavailable { reason: String },

    #[error("dataset '{0}' not found")]
    DatasetNotFound(String),

    /// A single record failed validation at the ingestion boundary
    #[error("malformed record at position {position}: {reason}")]
    MalformedRecord { position: usize, reason: String },

    /// The tagging worker failed or hung up
    #[error("tagger worker failed: {0}")]
    Worker(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GalaxyError {
    pub fn storage(reason: impl Into<String>) -> Self {
        GalaxyError::StorageUnavailable {
            reason: reason.into(),
        }
    }

    pub fn malformed(position: usize, reason: impl Into<String>) -> Self {
        GalaxyError::MalformedRecord {
            position,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalaxyError>;
