//! Error types for the page designer

use pagesmith_gatekeeper::GatekeeperError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that reach the caller of a design run
///
/// Completion and parsing failures never appear here: they are absorbed by
/// the fallback path.
#[derive(Error, Debug)]
pub enum DesignerError {
    /// Required input key absent or blank
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Input file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Artifact could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Persistence {
        /// Destination file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Another job in the same batch already writes this path
    #[error("Output {} is already claimed by {}", .path.display(), .claimed_by.display())]
    DuplicateOutput {
        /// Contested artifact path
        path: PathBuf,
        /// Input of the job that keeps the path
        claimed_by: PathBuf,
    },

    /// Artifact could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Normalization rejected the input
    #[error("Validation error: {0}")]
    Validation(#[from] GatekeeperError),
}

impl From<serde_json::Error> for DesignerError {
    fn from(e: serde_json::Error) -> Self {
        DesignerError::Serialization(e.to_string())
    }
}
