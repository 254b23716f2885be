use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading data files.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("not a directory: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
