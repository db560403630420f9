//! Loading session - the facade over expansion, tree, and registry.
//!
//! A [`LoaderSession`] runs through two states: configuring, in which
//! [`declare`](LoaderSession::declare) and
//! [`require_now`](LoaderSession::require_now) may be called any number of
//! times, and finalized, reached by a single
//! [`finalize`](LoaderSession::finalize) that flushes the registry. The
//! whole sequence is synchronous and single-threaded; callers wanting
//! cross-thread use wrap the configure-then-finalize sequence in their own
//! synchronization.

use std::path::Path;

use autoload_core::canonical::canonicalize;
use autoload_core::{LoaderError, SessionConfig};
use autoload_registry::{BindingRegistry, LoadHook, NamespaceTree, NodeIndex};

use crate::expander;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Configuring,
    Finalized,
}

/// Coordinates repeated declarations and a single finalize step.
///
/// The session owns its namespace tree, registry, and hook; after
/// finalize, [`into_parts`](Self::into_parts) recovers them so the tree
/// and registry can serve another session.
///
/// ```ignore
/// let config = SessionConfig::new(2).with_root_path("/srv/app");
/// let session = autoload(config, hook, |loader| {
///     loader
///         .require_now(&["app", "boot.rb"])?
///         .declare(&["app", "**", "*.rb"])?;
///     Ok(())
/// })?;
/// ```
#[derive(Debug)]
pub struct LoaderSession<H: LoadHook> {
    config: SessionConfig,
    tree: NamespaceTree,
    registry: BindingRegistry,
    hook: H,
    base: NodeIndex,
    state: SessionState,
}

impl<H: LoadHook> LoaderSession<H> {
    /// Create a session with a fresh tree and registry.
    pub fn new(config: SessionConfig, hook: H) -> Self {
        let tree = NamespaceTree::new();
        let registry = BindingRegistry::new(config.eager);
        Self::with_parts(config, tree, registry, hook)
    }

    /// Create a session over an existing tree and registry.
    ///
    /// Namespaces and bindings created by earlier sessions are kept; the
    /// registry's own eager flag governs queueing. The registry must have
    /// been flushed (its bookkeeping empty), or paths it still considers
    /// processed will not register again.
    pub fn with_parts(
        config: SessionConfig,
        tree: NamespaceTree,
        registry: BindingRegistry,
        hook: H,
    ) -> Self {
        let base = tree.root();
        Self {
            config,
            tree,
            registry,
            hook,
            base,
            state: SessionState::Configuring,
        }
    }

    /// Nest every declaration under an existing namespace node instead of
    /// the tree root.
    pub fn with_root_namespace(mut self, base: NodeIndex) -> Self {
        self.base = base;
        self
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The namespace tree built so far.
    pub fn tree(&self) -> &NamespaceTree {
        &self.tree
    }

    /// The binding registry.
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// The namespace node declarations are rooted at.
    pub fn root_namespace(&self) -> NodeIndex {
        self.base
    }

    /// Whether `finalize` has run.
    pub fn is_finalized(&self) -> bool {
        self.state == SessionState::Finalized
    }

    /// Recover the tree, registry, and hook for reuse.
    pub fn into_parts(self) -> (NamespaceTree, BindingRegistry, H) {
        (self.tree, self.registry, self.hook)
    }

    /// Declare a glob pattern at the configured default depth.
    ///
    /// See [`declare_with_depth`](Self::declare_with_depth).
    pub fn declare(&mut self, segments: &[&str]) -> Result<&mut Self, LoaderError> {
        let depth = self.config.root_depth;
        self.declare_with_depth(segments, depth)
    }

    /// Declare a glob pattern: expand it, resolve each file's namespace at
    /// the given depth, and register a lazy binding per file.
    ///
    /// Chainable. An expansion failure aborts only this call, leaving
    /// registrations from earlier declarations intact. Files matched by
    /// more than one overlapping declaration register once.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn declare_with_depth(
        &mut self,
        segments: &[&str],
        depth: usize,
    ) -> Result<&mut Self, LoaderError> {
        self.ensure_configuring()?;

        let files = expander::expand(&self.config.root_path, segments)?;
        for file in &files {
            let rel = file.strip_prefix(&self.config.root_path).unwrap_or(file);
            let Some(symbol) = file.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let namespace = self
                .tree
                .resolve_under(self.base, &dir_key(rel), depth);
            self.registry.register(
                &mut self.tree,
                &mut self.hook,
                namespace,
                &canonicalize(symbol),
                file,
            );
        }
        Ok(self)
    }

    /// Expand a pattern and force immediate, unconditional resolution of
    /// every match, bypassing the tree and registry entirely.
    ///
    /// Runs regardless of eager mode; intended for files that must load
    /// before any lazy machinery exists. The first failure propagates and
    /// aborts this call.
    pub fn require_now(&mut self, segments: &[&str]) -> Result<&mut Self, LoaderError> {
        self.ensure_configuring()?;

        let files = expander::expand(&self.config.root_path, segments)?;
        for file in &files {
            self.hook.force_resolve(file)?;
        }
        Ok(self)
    }

    /// Transition to finalized and flush the registry.
    ///
    /// In eager mode this force-resolves every registered file in
    /// registration order, failing fast. Idempotent: a second call flushes
    /// the already-cleared registry and is a safe no-op.
    pub fn finalize(&mut self) -> Result<&mut Self, LoaderError> {
        self.state = SessionState::Finalized;
        self.registry.flush(&mut self.tree, &mut self.hook)?;
        Ok(self)
    }

    fn ensure_configuring(&self) -> Result<(), LoaderError> {
        match self.state {
            SessionState::Configuring => Ok(()),
            SessionState::Finalized => Err(LoaderError::SessionFinalized),
        }
    }
}

/// Directory key for a file path relative to the expansion root: the
/// parent's components joined with `/`, or `"."` at the root itself.
fn dir_key(rel: &Path) -> String {
    let Some(parent) = rel.parent() else {
        return ".".to_string();
    };
    let joined = parent
        .iter()
        .filter_map(|c| c.to_str())
        .collect::<Vec<&str>>()
        .join("/");
    if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Build a session, run the configuration closure, and finalize.
///
/// The block-form entry point: declarations happen inside the closure and
/// the session is finalized on the way out.
///
/// ```ignore
/// let session = autoload(SessionConfig::new(2).with_eager(true), hook, |loader| {
///     loader.declare(&["app", "**", "*.rb"])?;
///     Ok(())
/// })?;
/// ```
pub fn autoload<H, F>(
    config: SessionConfig,
    hook: H,
    configure: F,
) -> Result<LoaderSession<H>, LoaderError>
where
    H: LoadHook,
    F: FnOnce(&mut LoaderSession<H>) -> Result<(), LoaderError>,
{
    let mut session = LoaderSession::new(config, hook);
    configure(&mut session)?;
    session.finalize()?;
    Ok(session)
}
