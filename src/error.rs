use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing the files kept in the data directory.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode data: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
