//! Error types for the autoload workspace.
//!
//! Each concern gets its own error type, and [`LoaderError`] wraps them for
//! unified handling at the session boundary:
//!
//! ```text
//! LoaderError (top-level wrapper)
//! ├── ExpandError  - filesystem enumeration failures
//! ├── ResolveError - forced-resolution failures from the load hook
//! └── SessionFinalized - configuration after finalize
//! ```

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// Expansion Errors
// ============================================================================

/// Errors that occur while enumerating files for a glob pattern.
///
/// An expansion failure aborts only the current expand call; registrations
/// made by earlier declarations are unaffected and the caller may retry.
#[derive(Debug, Error)]
pub enum ExpandError {
    /// Directory traversal failed (unreadable directory, broken link, ...).
    #[error("failed to enumerate '{}': {source}", path.display())]
    Walk {
        /// The directory being enumerated.
        path: PathBuf,
        /// The underlying traversal error.
        #[source]
        source: walkdir::Error,
    },
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// A failure while forcing resolution of a registered file.
///
/// Produced by the host's load hook. Resolution failures are fatal and
/// unrecovered: during an eager flush the first failure halts processing of
/// the remaining queue with no retry and no rollback of files already
/// loaded.
#[derive(Debug, Error)]
#[error("failed to load '{}': {message}", path.display())]
pub struct ResolveError {
    /// The file that failed to load.
    pub path: PathBuf,
    /// A description of the failure.
    pub message: String,
    /// The underlying cause, when one exists.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ResolveError {
    /// Create a resolution error from a message.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a resolution error from an underlying cause.
    pub fn with_source(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for all loader operations.
///
/// Each variant uses `#[from]` to enable automatic conversion with the `?`
/// operator.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A filesystem enumeration error.
    #[error(transparent)]
    Expand(#[from] ExpandError),

    /// A forced-resolution error.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A declaration was attempted on an already-finalized session.
    #[error("session already finalized")]
    SessionFinalized,
}

impl LoaderError {
    /// Check if this is an expansion error.
    pub fn is_expand(&self) -> bool {
        matches!(self, LoaderError::Expand(_))
    }

    /// Check if this is a resolution error.
    pub fn is_resolve(&self) -> bool {
        matches!(self, LoaderError::Resolve(_))
    }

    /// Check if this error came from configuring a finalized session.
    pub fn is_finalized(&self) -> bool {
        matches!(self, LoaderError::SessionFinalized)
    }
}
