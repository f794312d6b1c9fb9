//! Error types for nutriflow
//!
//! Every failure surfaced by the store, the engine or the analytics layer is an
//! [`Error`]. Callers that only care about the broad category use
//! [`Error::kind`]: a [`ErrorKind::Connection`] failure means the store could not
//! be reached or refused the caller, an [`ErrorKind::Operation`] failure means the
//! store was reached but rejected the request.
//!
//! An empty query result is never an error.

use std::io;
use thiserror::Error;

/// Result type alias for nutriflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Target store unreachable or authentication rejected
    Connection,
    /// The store rejected a query, aggregation or write
    Operation,
}

/// Error types for nutriflow
#[derive(Debug, Error)]
pub enum Error {
    // ==================== Connection ====================
    /// Target could not be reached (bad URI, unknown scheme, missing root, server down)
    #[error("unreachable store '{target}': {reason}")]
    Unreachable {
        /// The connection target as supplied by the caller
        target: String,
        /// Why the target could not be reached
        reason: String,
    },

    /// Credentials were rejected by the target
    #[error("authentication failed for '{target}'")]
    AuthenticationFailed {
        /// The connection target, with credentials stripped
        target: String,
    },

    // ==================== Operation ====================
    /// The connection is not allowed to perform the operation
    #[error("permission denied: {operation} on {namespace}")]
    PermissionDenied {
        /// Operation name (`insert`, `replace`, ...)
        operation: String,
        /// `database.collection`
        namespace: String,
    },

    /// Pipeline stages are malformed
    #[error("invalid pipeline: {reason}")]
    InvalidPipeline {
        /// What is wrong with the pipeline
        reason: String,
    },

    /// A field path could not be parsed
    #[error("invalid field path '{path}': {reason}")]
    InvalidPath {
        /// The offending path text
        path: String,
        /// Parser message
        reason: String,
    },

    /// A document is not usable (not an object, wrong shape for a typed view)
    #[error("invalid document: {reason}")]
    InvalidDocument {
        /// What is wrong with the document
        reason: String,
    },

    /// Backend storage failure
    #[error("storage error: {reason}")]
    Storage {
        /// Backend message
        reason: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {reason}")]
    Serialization {
        /// Codec message
        reason: String,
    },

    /// Configuration could not be loaded
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration
        reason: String,
    },

    /// I/O error on an already reachable target
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unreachable { .. } | Error::AuthenticationFailed { .. } => {
                ErrorKind::Connection
            }
            _ => ErrorKind::Operation,
        }
    }

    /// True if the store could not be reached or refused the caller
    pub fn is_connection(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }

    /// Build an [`Error::Unreachable`]
    pub fn unreachable(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Unreachable {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`Error::InvalidPipeline`]
    pub fn invalid_pipeline(reason: impl Into<String>) -> Self {
        Error::InvalidPipeline {
            reason: reason.into(),
        }
    }

    /// Build an [`Error::InvalidDocument`]
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Error::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Build an [`Error::Storage`]
    pub fn storage(reason: impl Into<String>) -> Self {
        Error::Storage {
            reason: reason.into(),
        }
    }

    /// Build an [`Error::InvalidConfig`]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            reason: e.to_string(),
        }
    }
}
