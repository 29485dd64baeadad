//! Error types for lineage tracking.
//!
//! Incomplete provenance (a source whose hash could not be computed) is not
//! an error: it is logged and carried in the record's completeness flag.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while hashing sources or reading and writing sidecars.
#[derive(Debug, Error)]
pub enum LineageError {
    /// A referenced file, archive, directory, or sidecar does not exist.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A persisted lineage document could not be accepted.
    #[error("malformed lineage file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// Any other I/O failure.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The lineage document could not be encoded.
    #[error("failed to encode lineage document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Directory traversal failed while scanning for annotations.
    #[error("walk error: {0}")]
    Walk(String),
}

impl LineageError {
    /// Map an I/O error on `path`, folding `NotFound` into its own variant.
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn parse(path: &Path, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the referenced path is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
