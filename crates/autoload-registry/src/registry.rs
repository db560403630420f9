//! Binding registry - dedup and eager-flush bookkeeping.
//!
//! [`BindingRegistry`] records one lazy binding per discovered file,
//! deduplicates across overlapping declarations, and (in eager mode) keeps
//! the ordered queue that [`flush`](BindingRegistry::flush) drains at
//! finalize.
//!
//! # Thread Safety
//!
//! The registry is **not thread-safe** by design: a session's tree,
//! registry, and hook are owned by one caller, and configuration then
//! finalize run on that caller's thread. Cross-thread use requires the
//! caller to wrap the whole sequence in its own synchronization.

use std::path::{Path, PathBuf};

use autoload_core::ResolveError;
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashSet;

use crate::hook::LoadHook;
use crate::namespace_tree::NamespaceTree;

/// One entry of the eager resolution queue.
#[derive(Debug, Clone)]
struct QueuedLoad {
    namespace: NodeIndex,
    symbol: String,
    path: PathBuf,
}

/// Registers lazy bindings, deduplicates across declarations, and manages
/// the eager-flush queue.
///
/// The per-session bookkeeping (processed-path set and queue) is cleared by
/// [`flush`](Self::flush); namespaces and bindings already created survive,
/// so the same registry instance can serve a fresh session afterwards.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    /// Absolute paths already registered in the current session.
    processed: FxHashSet<PathBuf>,

    /// Files awaiting forced resolution, in registration order.
    queue: Vec<QueuedLoad>,

    /// Whether registrations are queued for resolution at flush.
    eager: bool,
}

impl BindingRegistry {
    /// Create a registry.
    pub fn new(eager: bool) -> Self {
        Self {
            processed: FxHashSet::default(),
            queue: Vec::new(),
            eager,
        }
    }

    /// Whether this registry queues registrations for an eager flush.
    pub fn is_eager(&self) -> bool {
        self.eager
    }

    /// Files queued for forced resolution, in registration order.
    pub fn pending(&self) -> impl Iterator<Item = &Path> {
        self.queue.iter().map(|load| load.path.as_path())
    }

    /// Number of distinct files registered since the last flush.
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Register a lazy binding for a discovered file.
    ///
    /// Precondition: `path` exists and is a regular file (the expander only
    /// yields such paths).
    ///
    /// A path already registered this session is a no-op, regardless of how
    /// many overlapping declarations matched it. Otherwise the binding is
    /// created under `namespace` (an existing binding for the same symbol
    /// is silently replaced, last registration wins), announced through the
    /// hook, and, in eager mode, appended to the resolution queue. The
    /// binding is created even in eager mode so lookups behave uniformly.
    pub fn register<H: LoadHook>(
        &mut self,
        tree: &mut NamespaceTree,
        hook: &mut H,
        namespace: NodeIndex,
        symbol: &str,
        path: &Path,
    ) {
        if !self.processed.insert(path.to_path_buf()) {
            return;
        }

        tree.insert_binding(namespace, symbol, path.to_path_buf());
        hook.register_deferred(namespace, symbol, path);

        if self.eager {
            self.queue.push(QueuedLoad {
                namespace,
                symbol: symbol.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    /// Drain the resolution queue and reset per-session bookkeeping.
    ///
    /// In eager mode every queued file is force-resolved strictly in
    /// registration order; the first failure propagates immediately and the
    /// remaining files stay unresolved (no retry, no rollback of files
    /// already loaded). The processed-path set and the queue are cleared in
    /// every case, so a second flush is a no-op and the registry can serve
    /// a fresh session without reconsidering already-loaded files "new".
    /// Namespaces and bindings are never removed.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn flush<H: LoadHook>(
        &mut self,
        tree: &mut NamespaceTree,
        hook: &mut H,
    ) -> Result<(), ResolveError> {
        let queue = std::mem::take(&mut self.queue);
        self.processed.clear();

        for load in queue {
            hook.force_resolve(&load.path)?;
            tree.mark_resolved(load.namespace, &load.symbol, &load.path);
        }
        Ok(())
    }
}
