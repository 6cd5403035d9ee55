use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Player not found in the pool: {0}")]
    PlayerNotFound(String),

    #[error("Pick {0} is already recorded in the draft history")]
    DuplicatePick(i32),

    #[error("Failed to persist {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bad source data in {path}: {reason}")]
    SourceData { path: PathBuf, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported checkpoint version {0}")]
    CheckpointVersion(u32),

    #[error("Input closed before the draft finished")]
    InputClosed,
}

impl DraftError {
    pub fn source_data(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DraftError::SourceData {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DraftError>;
