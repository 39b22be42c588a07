//! Error types for the dataset module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors producing, persisting or loading the dataset artifact.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No elements were extracted; the source page layout has likely changed.
    #[error("no elements found; the wiki page structure may have changed")]
    Empty,

    /// Two elements share an identifier.
    #[error("duplicate element id '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// File system error reading or writing the artifact.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be encoded or decoded.
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatasetError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
