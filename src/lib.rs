//! Deferred file-to-symbol loading over a directory-mirrored namespace tree.
//!
//! This crate builds a namespace hierarchy mirroring a source tree's
//! directory structure and registers each discovered file as a lazily
//! resolved symbol bound to that file, so large trees can be declared
//! without being loaded until first referenced - or, in eager mode, loaded
//! in one ordered pass at finalize.
//!
//! # Overview
//!
//! - [`expander`]: deterministic glob expansion (`**` and `*` segments).
//! - [`NamespaceTree`]: memoized tree of namespace nodes, built top-down
//!   from directory paths relative to a configurable root depth.
//! - [`BindingRegistry`]: per-file lazy bindings with dedup across
//!   overlapping declarations and an ordered eager-flush queue.
//! - [`LoaderSession`]: the facade; repeated declarations, one finalize.
//! - [`LoadHook`]: the seam to the host's deferred-resolution machinery.
//!
//! # Example
//!
//! ```ignore
//! use autoload::prelude::*;
//!
//! let config = SessionConfig::new(2)
//!     .with_root_path("/srv/app")
//!     .with_eager(false);
//!
//! let session = autoload(config, hook, |loader| {
//!     loader
//!         .require_now(&["app", "boot.rb"])?
//!         .declare(&["app", "**", "*.rb"])?;
//!     Ok(())
//! })?;
//! ```

pub mod expander;
pub mod session;

pub use autoload_core::{ExpandError, LoaderError, ResolveError, SessionConfig, canonical};
pub use autoload_registry::{
    BindingRegistry, LazyBinding, LoadHook, NamespaceData, NamespaceTree, NodeIndex,
};
pub use session::{LoaderSession, autoload};

// Re-export main types
pub mod prelude {
    pub use crate::expander::expand;
    pub use crate::session::{LoaderSession, autoload};
    pub use autoload_core::canonical::{canonicalize, clean_path, module_names};
    pub use autoload_core::{ExpandError, LoaderError, ResolveError, SessionConfig};
    pub use autoload_registry::{
        BindingRegistry, LazyBinding, LoadHook, NamespaceData, NamespaceTree, NodeIndex,
    };
}
