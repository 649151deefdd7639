//! Error types for the mirror engine and its collaborators.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Source root does not exist: {}", .0.display())]
    SourceRootMissing(PathBuf),

    #[error("Cannot create destination root {}: {source}", .path.display())]
    DestinationRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid asset name: {0}")]
    InvalidAsset(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Notification rejected: {0}")]
    Notification(String),
}

impl MirrorError {
    /// Run-level failures stop the whole run before any asset is touched.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MirrorError::SourceRootMissing(_) | MirrorError::DestinationRoot { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
