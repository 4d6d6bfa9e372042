//! Testing utilities for the scopes workspace
//!
//! Shared in-memory catalogs, fixtures and tracing setup.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use scopes_core::{CatalogError, NodeCatalog, ScopeCatalog, ScopeTreeController};
use scopes_model::{Node, NodePath, NodesMap, Scope, SelectedScope, TreeScope};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING: Once = Once::new();

/// Install a fmt subscriber honouring `RUST_LOG`, once per process
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Node catalog backed by an in-memory tree
///
/// Node names are unique across the whole tree, so a parent is found by name
/// alone. A query keeps children whose title contains it, ignoring case.
#[derive(Debug)]
pub struct InMemoryNodeCatalog {
    root: Mutex<Node>,
    calls: Mutex<Vec<(String, String)>>,
    delays: Mutex<HashMap<String, Duration>>,
    failures: Mutex<Vec<CatalogError>>,
}

impl InMemoryNodeCatalog {
    pub fn new(root: Node) -> Self {
        Self {
            root: Mutex::new(root),
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Delay fetches issued with `query`
    pub fn delay_query(&self, query: &str, delay: Duration) {
        self.delays.lock().insert(query.to_string(), delay);
    }

    /// Fail the next fetch with `error`
    pub fn fail_next(&self, error: CatalogError) {
        self.failures.lock().push(error);
    }

    /// Replace the children of a node, simulating a backend change
    pub fn set_children(&self, parent: &str, children: impl IntoIterator<Item = Node>) {
        let mut root = self.root.lock();
        if let Some(node) = find_mut(&mut root, parent) {
            node.children = children.into_iter().map(|c| (c.name.clone(), c)).collect();
        }
    }

    /// Every `(parent, query)` fetched so far, in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

fn find_mut<'a>(node: &'a mut Node, name: &str) -> Option<&'a mut Node> {
    if node.name == name {
        return Some(node);
    }
    node.children.values_mut().find_map(|child| find_mut(child, name))
}

fn find<'a>(node: &'a Node, name: &str) -> Option<&'a Node> {
    if node.name == name {
        return Some(node);
    }
    node.children.values().find_map(|child| find(child, name))
}

#[async_trait]
impl NodeCatalog for InMemoryNodeCatalog {
    async fn fetch_children(
        &self,
        parent_name: &str,
        query: &str,
    ) -> Result<NodesMap, CatalogError> {
        self.calls
            .lock()
            .push((parent_name.to_string(), query.to_string()));

        let delay = self.delays.lock().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().pop();
        if let Some(error) = failure {
            return Err(error);
        }

        let root = self.root.lock();
        let parent = find(&root, parent_name)
            .ok_or_else(|| CatalogError::NotFound(parent_name.to_string()))?;
        let needle = query.to_lowercase();

        Ok(parent
            .children
            .values()
            .filter(|c| needle.is_empty() || c.title.to_lowercase().contains(&needle))
            .map(|c| {
                let mut child = c.clone();
                child.children = NodesMap::new();
                (child.name.clone(), child)
            })
            .collect())
    }
}

/// Scope catalog backed by a map, counting every lookup
#[derive(Debug, Default)]
pub struct InMemoryScopeCatalog {
    scopes: Mutex<HashMap<String, Scope>>,
    fetch_one_calls: AtomicUsize,
    fetch_many_calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
    failing: Mutex<Option<CatalogError>>,
}

impl InMemoryScopeCatalog {
    pub fn new(scopes: impl IntoIterator<Item = Scope>) -> Self {
        let catalog = Self::default();
        for scope in scopes {
            catalog.insert(scope);
        }
        catalog
    }

    pub fn insert(&self, scope: Scope) {
        self.scopes.lock().insert(scope.metadata.name.clone(), scope);
    }

    /// Delay every batch fetch
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Fail every lookup with `error` until cleared
    pub fn set_failing(&self, error: Option<CatalogError>) {
        *self.failing.lock() = error;
    }

    pub fn fetch_one_calls(&self) -> usize {
        self.fetch_one_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_many_calls(&self) -> usize {
        self.fetch_many_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, scope_id: &str) -> Result<Scope, CatalogError> {
        if let Some(error) = self.failing.lock().clone() {
            return Err(error);
        }
        self.scopes
            .lock()
            .get(scope_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(scope_id.to_string()))
    }
}

#[async_trait]
impl ScopeCatalog for InMemoryScopeCatalog {
    async fn fetch_one(&self, scope_id: &str) -> Result<Scope, CatalogError> {
        self.fetch_one_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(scope_id)
    }

    async fn fetch_many(
        &self,
        tree_scopes: &[TreeScope],
    ) -> Result<Vec<SelectedScope>, CatalogError> {
        self.fetch_many_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        tree_scopes
            .iter()
            .map(|ts| Ok(SelectedScope::new(self.lookup(&ts.scope_name)?, ts.path.clone())))
            .collect()
    }
}

/// Catalog tree used across tests
///
/// ```text
/// ""
/// ├── teamA    leaf -> scope-1
/// ├── teamB    leaf -> scope-2
/// ├── teamC    leaf -> scope-3
/// ├── regions  container, single select
/// │   ├── eu   leaf -> scope-eu
/// │   └── us   leaf -> scope-us
/// └── apps     container
///     ├── app1 leaf -> scope-app1
///     └── app2 leaf -> scope-app2
/// ```
pub fn teams_tree() -> Node {
    Node::root().with_children([
        Node::leaf("teamA", "Team A", "scope-1"),
        Node::leaf("teamB", "Team B", "scope-2"),
        Node::leaf("teamC", "Team C", "scope-3"),
        Node::container("regions", "Regions")
            .with_disable_multi_select(true)
            .with_children([
                Node::leaf("eu", "Europe", "scope-eu"),
                Node::leaf("us", "United States", "scope-us"),
            ]),
        Node::container("apps", "Applications").with_children([
            Node::leaf("app1", "App One", "scope-app1"),
            Node::leaf("app2", "App Two", "scope-app2"),
        ]),
    ])
}

/// Scope records for every leaf of [`teams_tree`], plus `scope-7`
pub fn teams_scopes() -> Vec<Scope> {
    [
        "scope-1",
        "scope-2",
        "scope-3",
        "scope-eu",
        "scope-us",
        "scope-app1",
        "scope-app2",
        "scope-7",
    ]
    .into_iter()
    .map(|name| {
        Scope::new(name, format!("Title {name}"))
            .with_category("teams")
            .with_filter("scope", name, "equals")
    })
    .collect()
}

/// Controller wired to fresh in-memory catalogs
pub struct Harness {
    pub nodes: Arc<InMemoryNodeCatalog>,
    pub scopes: Arc<InMemoryScopeCatalog>,
    pub controller: ScopeTreeController,
}

pub fn harness() -> Harness {
    init_tracing();
    let nodes = Arc::new(InMemoryNodeCatalog::new(teams_tree()));
    let scopes = Arc::new(InMemoryScopeCatalog::new(teams_scopes()));
    let controller = ScopeTreeController::new(nodes.clone(), scopes.clone());
    Harness {
        nodes,
        scopes,
        controller,
    }
}

/// Root path extended by `names`
pub fn path(names: &[&str]) -> NodePath {
    let mut path = NodePath::root();
    for name in names {
        path.push(*name);
    }
    path
}
