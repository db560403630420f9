//! The seam to the host platform's deferred-resolution machinery.

use std::path::Path;

use autoload_core::ResolveError;
use petgraph::graph::NodeIndex;

/// Host-side loading primitives consumed by the registry.
///
/// The registry produces the namespace/symbol/file mapping; the host owns
/// the symbol-lookup-miss mechanism that consults it and the act of
/// executing a file's defining code. Implementations are expected to load
/// each file at most once, like an interpreter's `require`: a second
/// [`force_resolve`](LoadHook::force_resolve) for the same path should be a
/// no-op.
pub trait LoadHook {
    /// Announce a lazy binding: `symbol` under `namespace` resolves by
    /// loading `path` on first reference.
    fn register_deferred(&mut self, namespace: NodeIndex, symbol: &str, path: &Path);

    /// Execute/load the file's defining code now.
    fn force_resolve(&mut self, path: &Path) -> Result<(), ResolveError>;
}
