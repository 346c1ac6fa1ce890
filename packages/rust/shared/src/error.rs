//! Error types for WiseWays.
//!
//! Library crates use [`WiseWaysError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all WiseWays operations.
#[derive(Debug, thiserror::Error)]
pub enum WiseWaysError {
    /// Rejected input (empty question text, out-of-range tuning values).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// An operation referenced an unknown node, link or room.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A node record that cannot take part in regeneration.
    #[error("malformed node {id}: {message}")]
    MalformedNode { id: String, message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WiseWaysError>;

impl WiseWaysError {
    /// Create an invalid-input error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// Create a not-found error for an entity of the given kind.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create a malformed-node error.
    pub fn malformed_node(id: impl ToString, msg: impl Into<String>) -> Self {
        Self::MalformedNode {
            id: id.to_string(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
