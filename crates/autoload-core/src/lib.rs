//! Core types for the autoload loader.
//!
//! This crate holds the leaf pieces shared by the rest of the workspace:
//! name canonicalization, session configuration, and the error types used
//! across expansion, registration, and forced resolution.

pub mod canonical;
pub mod config;
pub mod error;

pub use canonical::{canonicalize, clean_path, module_names};
pub use config::SessionConfig;
pub use error::{ExpandError, LoaderError, ResolveError};
