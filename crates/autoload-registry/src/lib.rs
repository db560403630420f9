//! Namespace tree and lazy-binding registry.
//!
//! This crate owns the two core structures of the loader: the memoized
//! [`NamespaceTree`] mirroring a source tree's directory structure, and the
//! [`BindingRegistry`] that records, deduplicates, and flushes lazy
//! file-to-symbol bindings. The [`LoadHook`] trait is the seam to the host
//! platform's deferred-resolution machinery.

pub mod hook;
pub mod namespace_tree;
pub mod registry;

pub use hook::LoadHook;
pub use namespace_tree::{LazyBinding, NamespaceData, NamespaceTree};
pub use registry::BindingRegistry;

// Node identity in the namespace graph. Re-exported so consumers don't need
// a direct petgraph dependency.
pub use petgraph::graph::NodeIndex;
