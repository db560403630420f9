//! Session configuration.

use std::path::PathBuf;

/// Configuration for one loading session.
///
/// `root_depth` is required and has no default: it is the number of leading
/// path segments ignored when deriving namespace names from a file's
/// directory. The remaining options default to the current working
/// directory and lazy (non-eager) loading.
///
/// The configuration is taken by value when a session is built and stays
/// immutable for the session's lifetime.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory that declared patterns are expanded relative to.
    pub root_path: PathBuf,

    /// Number of leading path segments ignored when deriving namespaces.
    pub root_depth: usize,

    /// When true, every registered file is force-resolved at finalize, in
    /// registration order.
    pub eager: bool,
}

impl SessionConfig {
    /// Create a configuration rooted at the current working directory.
    pub fn new(root_depth: usize) -> Self {
        Self {
            root_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            root_depth,
            eager: false,
        }
    }

    /// Set the directory patterns are expanded relative to.
    pub fn with_root_path(mut self, root_path: impl Into<PathBuf>) -> Self {
        self.root_path = root_path.into();
        self
    }

    /// Enable or disable eager loading.
    pub fn with_eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }
}
