//! Error types for Labelize sessions

use labelize_document::{CodecError, SchemaError};
use labelize_taxonomy::TaxonomyError;
use std::path::{Path, PathBuf};

/// Main session error type
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Operation needs a loaded document
    #[error("no document loaded")]
    NoDocument,

    /// Taxonomy rule violated
    #[error("taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// Mention codec failure
    #[error("mention error: {0}")]
    Codec(#[from] CodecError),

    /// Schema codec failure
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Reading or writing a document or configuration failed
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl SessionError {
    /// Create IO error for path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True when the call was rejected and the session is unchanged
    ///
    /// IO failures may leave a partially written output file behind.
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

/// Result alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
