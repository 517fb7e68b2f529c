//! Error types for bodygen.
//!
//! Only I/O and startup conditions are errors. Text that doesn't look like a
//! declaration is skipped silently by the extractor and never reaches here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    /// The root supplied by the user is missing or not a directory.
    #[error("invalid folder path: {path:?}")]
    InvalidRoot { path: PathBuf },

    #[error("failed to open {path:?}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path:?}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file {path:?}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl GenError {
    /// Startup errors stop the run; everything else is scoped to one file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidRoot { .. } | Self::Pool(_))
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
