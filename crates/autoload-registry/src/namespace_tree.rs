//! Namespace tree - memoized hierarchy mirroring directory structure.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: [`NamespaceData`] (the lazy bindings registered at that level)
//! - Edges: the child's canonical name
//!
//! Nodes are created lazily, strictly top-down, and never destroyed. A
//! memo cache keyed by (base node, depth-stripped directory path) makes
//! resolution idempotent: identical inputs always return the identical
//! [`NodeIndex`].

use std::path::{Path, PathBuf};

use autoload_core::canonical::{canonicalize, clean_path};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

/// A symbol bound to a source file whose execution is deferred.
///
/// Created at registration and never deleted; `resolved` flips when the
/// file is force-loaded.
#[derive(Debug, Clone)]
pub struct LazyBinding {
    /// The namespace node owning this binding.
    pub namespace: NodeIndex,
    /// The canonical symbol name.
    pub symbol: String,
    /// The file whose code defines the symbol.
    pub path: PathBuf,
    /// Whether the file has been force-loaded.
    pub resolved: bool,
}

/// Data stored in each namespace node.
#[derive(Debug, Default)]
pub struct NamespaceData {
    /// Lazy bindings in this namespace by symbol name.
    pub bindings: FxHashMap<String, LazyBinding>,
}

impl NamespaceData {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The namespace graph - hierarchical storage for lazy bindings.
#[derive(Debug)]
pub struct NamespaceTree {
    /// The directed graph storing all namespaces.
    graph: DiGraph<NamespaceData, String>,

    /// The root namespace node.
    root: NodeIndex,

    /// Memo cache: (base node, depth-stripped normalized dir path) -> node.
    path_index: FxHashMap<(NodeIndex, String), NodeIndex>,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Create a new namespace tree with an empty root.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::new());
        Self {
            graph,
            root,
            path_index: FxHashMap::default(),
        }
    }

    /// Get the root namespace node index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Number of namespace nodes, the root included.
    pub fn namespace_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get a namespace node's data.
    pub fn namespace(&self, node: NodeIndex) -> Option<&NamespaceData> {
        self.graph.node_weight(node)
    }

    /// Get a mutable reference to a namespace node's data.
    pub fn namespace_mut(&mut self, node: NodeIndex) -> Option<&mut NamespaceData> {
        self.graph.node_weight_mut(node)
    }

    /// Find a child namespace by canonical name.
    pub fn find_child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        for edge in self.graph.edges(parent) {
            if edge.weight() == name {
                return Some(edge.target());
            }
        }
        None
    }

    /// Get or create a child namespace.
    ///
    /// Two spellings canonicalizing to the same name share the node that
    /// was created first.
    pub fn get_or_create_child(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        if let Some(child) = self.find_child(parent, name) {
            return child;
        }

        let child = self.graph.add_node(NamespaceData::new());
        self.graph.add_edge(parent, child, name.to_string());
        child
    }

    /// Find the parent namespace of a node.
    pub fn find_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge| edge.source())
    }

    /// Get the canonical name of a namespace node.
    pub fn namespace_name(&self, node: NodeIndex) -> Option<&str> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge| edge.weight().as_str())
    }

    /// Get the full canonical path for a node, root excluded.
    pub fn namespace_path(&self, node: NodeIndex) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = node;

        while current != self.root {
            if let Some(name) = self.namespace_name(current) {
                path.push(name.to_string());
            }
            match self.find_parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        path.reverse();
        path
    }

    /// Get the qualified name string for a symbol in a namespace.
    pub fn qualified_name(&self, node: NodeIndex, symbol: &str) -> String {
        let path = self.namespace_path(node);
        if path.is_empty() {
            symbol.to_string()
        } else {
            format!("{}::{}", path.join("::"), symbol)
        }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve the namespace node for a directory path, from the tree root.
    ///
    /// See [`resolve_under`](Self::resolve_under).
    pub fn resolve(&mut self, dir_path: &str, depth: usize) -> NodeIndex {
        self.resolve_under(self.root, dir_path, depth)
    }

    /// Resolve the namespace node for a directory path, creating missing
    /// nodes top-down under `base`.
    ///
    /// The path is normalized and split on `/`; the first `depth` segments
    /// are ignored. When `depth` covers every segment (or the path is
    /// `"."`), `base` is returned unchanged and nothing is created.
    ///
    /// Repeated calls with identical arguments return the identical node.
    /// Performs no I/O.
    pub fn resolve_under(&mut self, base: NodeIndex, dir_path: &str, depth: usize) -> NodeIndex {
        let cleaned = clean_path(dir_path);
        if cleaned.is_empty() || cleaned == "." {
            return base;
        }
        let segments: Vec<&str> = cleaned.split('/').collect();
        if depth >= segments.len() {
            return base;
        }

        let mut current = base;
        let mut prefix = String::new();
        for segment in &segments[depth..] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            current = match self.path_index.get(&(base, prefix.clone())) {
                Some(&node) => node,
                None => {
                    let node = self.get_or_create_child(current, &canonicalize(segment));
                    self.path_index.insert((base, prefix.clone()), node);
                    node
                }
            };
        }
        current
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    /// Insert a lazy binding under a namespace.
    ///
    /// A binding already present for the same symbol is silently replaced:
    /// last registration wins.
    pub fn insert_binding(&mut self, namespace: NodeIndex, symbol: &str, path: PathBuf) {
        if let Some(data) = self.graph.node_weight_mut(namespace) {
            data.bindings.insert(
                symbol.to_string(),
                LazyBinding {
                    namespace,
                    symbol: symbol.to_string(),
                    path,
                    resolved: false,
                },
            );
        }
    }

    /// Get a binding by namespace and symbol.
    pub fn binding(&self, namespace: NodeIndex, symbol: &str) -> Option<&LazyBinding> {
        self.graph.node_weight(namespace)?.bindings.get(symbol)
    }

    /// Mark a binding resolved, provided `symbol` still maps to `path`.
    ///
    /// The path check keeps an overwritten binding (same symbol, different
    /// file) from being flagged by a stale queue entry.
    pub fn mark_resolved(&mut self, namespace: NodeIndex, symbol: &str, path: &Path) {
        if let Some(data) = self.graph.node_weight_mut(namespace) {
            if let Some(binding) = data.bindings.get_mut(symbol) {
                if binding.path == path {
                    binding.resolved = true;
                }
            }
        }
    }
}
