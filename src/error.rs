//! Errors that end the write of an export artifact.
//!
//! Per-site problems never surface here; they are logged and the run moves
//! on to the next site.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// A directory sits where the artifact should be written.
    #[error("Artifact path is a directory: {}", .path.display())]
    ArtifactIsDirectory { path: PathBuf },

    /// The previous artifact could not be removed.
    #[error("Could not remove existing artifact '{}': {source}", .path.display())]
    ClearArtifact { path: PathBuf, source: io::Error },

    /// The artifact could not be created.
    #[error("Could not open artifact '{}': {source}", .path.display())]
    OpenArtifact { path: PathBuf, source: io::Error },

    /// Serialization or flushing failed part way through.
    #[error("Failed writing artifact '{}': {source}", .path.display())]
    WriteArtifact { path: PathBuf, source: csv::Error },
}

pub type ExportResult<T> = Result<T, ExportError>;
