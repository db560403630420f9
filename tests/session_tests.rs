//! Integration tests driving a full session against on-disk app trees.
//!
//! These tests validate the whole pipeline (expansion + namespace
//! construction + registration + flush) using temporary directories and a
//! recording hook standing in for the host's deferred-resolution
//! machinery.

use std::fs;
use std::path::{Path, PathBuf};

use autoload::prelude::*;
use tempfile::TempDir;

/// Hook that records every call and can be told to fail on one path.
#[derive(Debug, Default)]
struct RecordingHook {
    deferred: Vec<(NodeIndex, String, PathBuf)>,
    resolved: Vec<PathBuf>,
    fail_on: Option<PathBuf>,
}

impl LoadHook for RecordingHook {
    fn register_deferred(&mut self, namespace: NodeIndex, symbol: &str, path: &Path) {
        self.deferred
            .push((namespace, symbol.to_string(), path.to_path_buf()));
    }

    fn force_resolve(&mut self, path: &Path) -> Result<(), ResolveError> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(ResolveError::new(path, "injected failure"));
        }
        self.resolved.push(path.to_path_buf());
        Ok(())
    }
}

/// Create an application tree in a temporary dir.
fn tmp_app(files: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for rel in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, "").expect("write file");
    }
    dir
}

fn app_files() -> Vec<&'static str> {
    vec![
        "app/models/widget.rb",
        "app/models/billing/line_item.rb",
        "app/features/billing/recurring/monthly/run.rb",
    ]
}

fn config_for(root: &TempDir, depth: usize) -> SessionConfig {
    SessionConfig::new(depth).with_root_path(root.path())
}

// =============================================================================
// Namespace construction
// =============================================================================

#[test]
fn declare_creates_only_namespaces_below_depth() {
    let app = tmp_app(&app_files());
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session.declare(&["app", "**", "*.rb"]).expect("declare");

    let tree = session.tree();
    let root = tree.root();
    // The first two path segments never become namespaces.
    assert!(tree.find_child(root, "App").is_none());
    assert!(tree.find_child(root, "Models").is_none());
    assert!(tree.find_child(root, "Features").is_none());

    let billing = tree.find_child(root, "Billing").expect("Billing");
    let recurring = tree.find_child(billing, "Recurring").expect("Recurring");
    let monthly = tree.find_child(recurring, "Monthly").expect("Monthly");
    assert_eq!(tree.namespace_path(monthly), vec!["Billing", "Recurring", "Monthly"]);
}

#[test]
fn declare_registers_canonical_symbols() {
    let app = tmp_app(&app_files());
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session.declare(&["app", "**", "*.rb"]).expect("declare");

    let tree = session.tree();
    let root = tree.root();
    let billing = tree.find_child(root, "Billing").expect("Billing");

    // depth=2: app/models/billing/line_item.rb => Billing::LineItem
    let line_item = tree.binding(billing, "LineItem").expect("LineItem binding");
    assert_eq!(line_item.path, app.path().join("app/models/billing/line_item.rb"));
    assert!(!line_item.resolved);
    assert_eq!(tree.qualified_name(billing, "LineItem"), "Billing::LineItem");

    // depth=2: app/models/widget.rb has no segments left => root namespace
    assert!(tree.binding(root, "Widget").is_some());
}

#[test]
fn depth_override_per_declaration() {
    let app = tmp_app(&["app/models/billing/line_item.rb"]);
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session
        .declare_with_depth(&["app", "**", "*.rb"], 3)
        .expect("declare");

    // depth=3 swallows app/models/billing entirely.
    let tree = session.tree();
    assert!(tree.binding(tree.root(), "LineItem").is_some());
    assert_eq!(tree.namespace_count(), 1);
}

#[test]
fn declarations_nest_under_configured_root_namespace() {
    let app = tmp_app(&["app/models/billing/line_item.rb"]);
    let mut tree = NamespaceTree::new();
    let vendor = tree.get_or_create_child(tree.root(), "Vendor");
    let registry = BindingRegistry::new(false);

    let mut session =
        LoaderSession::with_parts(config_for(&app, 2), tree, registry, RecordingHook::default())
            .with_root_namespace(vendor);
    session.declare(&["app", "**", "*.rb"]).expect("declare");

    let tree = session.tree();
    let billing = tree.find_child(vendor, "Billing").expect("Billing under Vendor");
    assert_eq!(tree.namespace_path(billing), vec!["Vendor", "Billing"]);
}

// =============================================================================
// Dedup and collisions
// =============================================================================

#[test]
fn overlapping_declarations_register_once() {
    let app = tmp_app(&app_files());
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session
        .declare(&["app", "**", "*.rb"])
        .expect("declare")
        .declare(&["app", "models", "**", "*.rb"])
        .expect("declare again");

    let (_, _, hook) = session.into_parts();
    let mut paths: Vec<&PathBuf> = hook.deferred.iter().map(|(_, _, p)| p).collect();
    let before = paths.len();
    paths.dedup();
    assert_eq!(before, 3, "each file announced exactly once");
    assert_eq!(paths.len(), before);
}

#[test]
fn symbol_collision_last_registration_wins() {
    // Both dirs strip to "billing" at depth 2, so both files land in
    // Billing under the symbol Report; the later (sorted) one wins.
    let app = tmp_app(&["app/models/billing/report.rb", "app/widgets/billing/report.rb"]);
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session.declare(&["app", "**", "*.rb"]).expect("declare");

    let tree = session.tree();
    let billing = tree.find_child(tree.root(), "Billing").expect("Billing");
    let report = tree.binding(billing, "Report").expect("Report binding");
    assert_eq!(report.path, app.path().join("app/widgets/billing/report.rb"));
}

// =============================================================================
// Lazy vs eager
// =============================================================================

#[test]
fn lazy_session_never_resolves() {
    let app = tmp_app(&app_files());
    let session = autoload(config_for(&app, 2), RecordingHook::default(), |loader| {
        loader.declare(&["app", "**", "*.rb"])?;
        Ok(())
    })
    .expect("autoload");

    assert!(session.is_finalized());
    let (_, _, hook) = session.into_parts();
    assert_eq!(hook.deferred.len(), 3);
    assert!(hook.resolved.is_empty());
}

#[test]
fn eager_session_resolves_in_registration_order() {
    let app = tmp_app(&app_files());
    let config = config_for(&app, 2).with_eager(true);
    let session = autoload(config, RecordingHook::default(), |loader| {
        loader.declare(&["app", "**", "*.rb"])?;
        Ok(())
    })
    .expect("autoload");

    let root = app.path();
    let (tree, _, hook) = session.into_parts();
    // Expansion is lexicographic, so registration order is too.
    assert_eq!(
        hook.resolved,
        vec![
            root.join("app/features/billing/recurring/monthly/run.rb"),
            root.join("app/models/billing/line_item.rb"),
            root.join("app/models/widget.rb"),
        ]
    );

    // Every binding is flagged resolved.
    let billing = tree.find_child(tree.root(), "Billing").expect("Billing");
    assert!(tree.binding(billing, "LineItem").expect("LineItem").resolved);
    assert!(tree.binding(tree.root(), "Widget").expect("Widget").resolved);
}

#[test]
fn eager_failure_halts_remaining_queue() {
    let app = tmp_app(&app_files());
    let root = app.path();
    let hook = RecordingHook {
        fail_on: Some(root.join("app/models/billing/line_item.rb")),
        ..RecordingHook::default()
    };

    let config = config_for(&app, 2).with_eager(true);
    let mut session = LoaderSession::new(config, hook);
    session.declare(&["app", "**", "*.rb"]).expect("declare");

    let err = session.finalize().expect_err("flush must fail");
    assert!(err.is_resolve());
    assert!(session.is_finalized());

    let (_, _, hook) = session.into_parts();
    // File #2 of 3 failed: #1 loaded, #3 never touched.
    assert_eq!(
        hook.resolved,
        vec![root.join("app/features/billing/recurring/monthly/run.rb")]
    );
}

// =============================================================================
// require_now
// =============================================================================

#[test]
fn require_now_resolves_immediately_without_registration() {
    let app = tmp_app(&["app/boot.rb", "app/models/widget.rb"]);
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session.require_now(&["app", "boot.rb"]).expect("require_now");

    assert_eq!(session.registry().processed_count(), 0);
    assert_eq!(session.tree().namespace_count(), 1);

    let (_, _, hook) = session.into_parts();
    assert!(hook.deferred.is_empty());
    assert_eq!(hook.resolved, vec![app.path().join("app/boot.rb")]);
}

#[test]
fn require_now_failure_aborts_call() {
    let app = tmp_app(&["app/boot.rb"]);
    let hook = RecordingHook {
        fail_on: Some(app.path().join("app/boot.rb")),
        ..RecordingHook::default()
    };
    let mut session = LoaderSession::new(config_for(&app, 2), hook);

    let err = session.require_now(&["app", "boot.rb"]).expect_err("must fail");
    assert!(err.is_resolve());
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn declare_after_finalize_is_rejected() {
    let app = tmp_app(&["app/models/widget.rb"]);
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session.finalize().expect("finalize");

    let err = session.declare(&["app", "**", "*.rb"]).expect_err("rejected");
    assert!(err.is_finalized());
    let err = session.require_now(&["app", "**", "*.rb"]).expect_err("rejected");
    assert!(err.is_finalized());
}

#[test]
fn finalize_is_idempotent() {
    let app = tmp_app(&app_files());
    let config = config_for(&app, 2).with_eager(true);
    let mut session = LoaderSession::new(config, RecordingHook::default());
    session.declare(&["app", "**", "*.rb"]).expect("declare");

    session.finalize().expect("first finalize");
    session.finalize().expect("second finalize");

    let (_, _, hook) = session.into_parts();
    // The second flush ran on cleared state: nothing resolved twice.
    assert_eq!(hook.resolved.len(), 3);
}

#[test]
fn tree_and_registry_survive_for_a_fresh_session() {
    let app = tmp_app(&["app/models/billing/line_item.rb"]);
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session.declare(&["app", "**", "*.rb"]).expect("declare");
    session.finalize().expect("finalize");
    let (tree, registry, _) = session.into_parts();

    let billing = tree.find_child(tree.root(), "Billing").expect("Billing survives");
    assert!(tree.binding(billing, "LineItem").is_some());

    // The same parts serve a second session; the same file registers anew.
    let mut session =
        LoaderSession::with_parts(config_for(&app, 2), tree, registry, RecordingHook::default());
    session.declare(&["app", "**", "*.rb"]).expect("redeclare");
    assert_eq!(session.registry().processed_count(), 1);
}

#[test]
fn expansion_error_aborts_only_that_declaration() {
    let app = tmp_app(&["app/models/widget.rb"]);
    let mut session = LoaderSession::new(config_for(&app, 2), RecordingHook::default());
    session.declare(&["app", "**", "*.rb"]).expect("declare");

    let missing = app.path().join("nope");
    let config = SessionConfig::new(1).with_root_path(&missing);
    let mut failing = LoaderSession::new(config, RecordingHook::default());
    let err = failing.declare(&["app", "**", "*.rb"]).expect_err("walk fails");
    assert!(err.is_expand());

    // The healthy session is unaffected and still configurable.
    session.declare(&["app", "models", "*.rb"]).expect("still configuring");
    assert_eq!(session.registry().processed_count(), 1);
}
