//! Scope tree controller
//!
//! [`ScopeTreeController`] owns the lazily expanded node tree behind the
//! scope picker, the draft selection a user edits while the picker is open,
//! and the committed selection mirrored to the URL.
//!
//! # Workflow
//! 1. `activate` fetches the children of the root
//! 2. `update_node` expands nodes and applies search queries
//! 3. `toggle_node_select` edits the draft selection
//! 4. `update_scopes` commits the draft; `reset_dirty_scope_names` drops it
//!
//! State is published on a watch channel after every change, so renderers
//! observe whole snapshots and never a half-applied update.

use crate::cache::CachedScopeCatalog;
use crate::catalog::{NodeCatalog, ScopeCatalog};
use crate::config::ControllerConfig;
use crate::error::{CatalogError, ScopesError};
use crate::fetch::{run_cancellable, FetchSlot};
use crate::url_sync::UrlSync;
use parking_lot::Mutex;
use scopes_model::{NodePath, NodesMap, Scope, SelectedScope, TreeScope};
use scopes_tree::{MergeReport, NodeTree, TreeError};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Observable controller state
///
/// Cloning is cheap: the node tree is a persistent structure and the
/// selection lists are short.
#[derive(Debug, Clone)]
pub struct ControllerState {
    /// Node tree rooted at the sentinel
    pub nodes: NodeTree,
    /// Node whose children are being fetched
    pub loading_node_name: Option<String>,
    /// Committed selection
    pub scopes: Vec<SelectedScope>,
    /// Draft selection
    pub tree_scopes: Vec<TreeScope>,
    /// Whether committed records are being fetched
    pub is_loading_scopes: bool,
    /// Whether the picker is open
    pub is_opened: bool,
    /// Whether the owning view is read-only
    pub is_viewing: bool,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            nodes: NodeTree::new(),
            loading_node_name: None,
            scopes: Vec::new(),
            tree_scopes: Vec::new(),
            is_loading_scopes: false,
            is_opened: false,
            is_viewing: false,
        }
    }

    /// Draft view of the committed selection
    #[must_use]
    pub fn committed_tree_scopes(&self) -> Vec<TreeScope> {
        self.scopes.iter().map(SelectedScope::to_tree_scope).collect()
    }

    /// Whether the draft differs from the committed selection
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.tree_scopes != self.committed_tree_scopes()
    }

    /// Committed scope names, in order
    #[must_use]
    pub fn scope_names(&self) -> Vec<String> {
        self.scopes
            .iter()
            .map(|s| s.scope.metadata.name.clone())
            .collect()
    }
}

/// Outcome of [`ScopeTreeController::update_node`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFetch {
    /// Node already showed the requested state; nothing fetched
    Skipped,
    /// Children fetched and merged
    Loaded(MergeReport),
    /// A newer request or teardown cancelled this fetch
    Cancelled,
}

/// Outcome of [`ScopeTreeController::toggle_node_select`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// Scope added to the draft
    Selected {
        /// New draft entry
        tree_scope: TreeScope,
        /// Draft entries replaced by this selection
        dropped: Vec<TreeScope>,
    },
    /// Scope removed from the draft
    Deselected(TreeScope),
}

/// Outcome of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopesUpdate {
    /// Draft equals the committed selection; nothing fetched
    Unchanged,
    /// Selection committed with full records
    Committed {
        /// Number of committed scopes
        count: usize,
    },
    /// A newer commit replaced this one before it resolved
    Superseded,
}

#[derive(Debug)]
struct Inner {
    state: ControllerState,
    node_fetch: FetchSlot,
    scope_fetch: FetchSlot,
    torn_down: bool,
}

/// State manager for the scope picker
pub struct ScopeTreeController {
    node_catalog: Arc<dyn NodeCatalog>,
    scope_catalog: Arc<dyn ScopeCatalog>,
    url_sync: Option<Arc<dyn UrlSync>>,
    config: ControllerConfig,
    inner: Mutex<Inner>,
    updates: watch::Sender<ControllerState>,
}

impl fmt::Debug for ScopeTreeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeTreeController")
            .field("config", &self.config)
            .field("url_sync", &self.url_sync.is_some())
            .field("inner", &*self.inner.lock())
            .finish_non_exhaustive()
    }
}

impl ScopeTreeController {
    /// Create controller with default configuration
    #[must_use]
    pub fn new(node_catalog: Arc<dyn NodeCatalog>, scope_catalog: Arc<dyn ScopeCatalog>) -> Self {
        let state = ControllerState::new();
        let (updates, _) = watch::channel(state.clone());
        Self {
            node_catalog,
            scope_catalog,
            url_sync: None,
            config: ControllerConfig::default(),
            inner: Mutex::new(Inner {
                state,
                node_fetch: FetchSlot::new(),
                scope_fetch: FetchSlot::new(),
                torn_down: false,
            }),
            updates,
        }
    }

    /// Create controller whose scope lookups go through a [`CachedScopeCatalog`]
    ///
    /// # Errors
    /// Returns `ScopesError::Config` if the configuration is invalid
    pub fn with_cached_scopes<S>(
        node_catalog: Arc<dyn NodeCatalog>,
        scope_catalog: S,
        config: ControllerConfig,
    ) -> Result<Self, ScopesError>
    where
        S: ScopeCatalog + 'static,
    {
        config.validate()?;
        let cached = CachedScopeCatalog::from_config(scope_catalog, &config);
        Self::new(node_catalog, Arc::new(cached)).with_config(config)
    }

    /// With configuration
    ///
    /// # Errors
    /// Returns `ScopesError::Config` if the configuration is invalid
    pub fn with_config(mut self, config: ControllerConfig) -> Result<Self, ScopesError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// With URL synchronisation
    #[must_use]
    pub fn with_url_sync(mut self, url_sync: Arc<dyn UrlSync>) -> Self {
        self.url_sync = Some(url_sync);
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.inner.lock().state.clone()
    }

    /// Receive a snapshot after every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.updates.subscribe()
    }

    /// Nested node view for renderers
    #[must_use]
    pub fn nodes_view(&self) -> NodesMap {
        self.inner.lock().state.nodes.to_nodes_map()
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(inner.state.clone());
    }

    /// Fetch the children of the root
    ///
    /// # Errors
    /// See [`update_node`](Self::update_node)
    pub async fn activate(&self) -> Result<NodeFetch, ScopesError> {
        info!("activating scope tree controller");
        self.fetch_base_nodes().await
    }

    /// Fetch the children of the root with an empty query
    ///
    /// # Errors
    /// See [`update_node`](Self::update_node)
    pub async fn fetch_base_nodes(&self) -> Result<NodeFetch, ScopesError> {
        self.update_node(&NodePath::root(), true, "").await
    }

    /// Expand or collapse a node and apply a search query to its children
    ///
    /// A valid request cancels any pending node fetch. A fetch is issued when the
    /// node gets expanded or its query changes; re-expanding an expanded
    /// node whose children are already loaded for `query` is a no-op.
    ///
    /// # Errors
    /// - `ScopesError::Tree` if `path` does not address a node
    /// - `ScopesError::Catalog` / `ScopesError::Timeout` if the fetch fails;
    ///   the tree keeps its previous children
    /// - `ScopesError::TornDown` after [`teardown`](Self::teardown)
    pub async fn update_node(
        &self,
        path: &NodePath,
        is_expanded: bool,
        query: &str,
    ) -> Result<NodeFetch, ScopesError> {
        let (ticket, token, name) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            if inner.torn_down {
                return Err(ScopesError::TornDown);
            }

            let id = inner.state.nodes.resolve(path)?;
            let node = inner.state.nodes.get(id).ok_or(TreeError::UnknownNode(id))?;
            let name = node.name.clone();
            let same_query = node.query == query;
            let already_shown = node.is_expanded
                && same_query
                && inner.state.nodes.loaded_query(id) == Some(query);

            inner.state.nodes.update(id, |n| {
                n.is_expanded = is_expanded;
                n.query = query.to_string();
            })?;

            // only a valid request supersedes the pending fetch
            inner.node_fetch.cancel();

            let needs_fetch = (is_expanded && !already_shown) || !same_query;
            if !needs_fetch {
                inner.state.loading_node_name = None;
                self.publish(inner);
                debug!(node = %name, query, is_expanded, "node unchanged, skipping fetch");
                return Ok(NodeFetch::Skipped);
            }

            let (ticket, token) = inner.node_fetch.begin();
            inner.state.loading_node_name = Some(name.clone());
            self.publish(inner);
            (ticket, token, name)
        };

        debug!(node = %name, query, "fetching child nodes");
        let result = run_cancellable(
            &token,
            self.config.node_fetch_timeout(),
            self.node_catalog.fetch_children(&name, query),
        )
        .await;

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let is_current = inner.node_fetch.finish(ticket);

        let children = match result {
            Ok(Some(children)) if is_current => children,
            Ok(_) => {
                debug!(node = %name, query, "node fetch cancelled");
                return Ok(NodeFetch::Cancelled);
            }
            Err(err) => {
                if is_current {
                    inner.state.loading_node_name = None;
                    self.publish(inner);
                }
                warn!(node = %name, query, error = %err, "node fetch failed");
                return Err(err);
            }
        };

        inner.state.loading_node_name = None;
        let merged = self.merge_fetched(inner, path, query, children);
        self.publish(inner);

        let report = merged?;
        debug!(
            node = %name,
            inserted = report.inserted,
            persisted = report.persisted.len(),
            removed = report.removed,
            "merged child nodes"
        );
        Ok(NodeFetch::Loaded(report))
    }

    fn merge_fetched(
        &self,
        inner: &mut Inner,
        path: &NodePath,
        query: &str,
        children: NodesMap,
    ) -> Result<MergeReport, ScopesError> {
        let id = inner.state.nodes.resolve(path).map_err(|err| {
            warn!(path = %path, error = %err, "fetched node vanished before merge");
            err
        })?;
        let retained = retained_names(&inner.state, path);
        let report = inner.state.nodes.merge_children(id, children, &retained)?;
        inner.state.nodes.mark_loaded(id, query)?;
        Ok(report)
    }

    /// Select or deselect the scope a node links to, in the draft only
    ///
    /// Selecting replaces the whole draft when the parent forbids multiple
    /// selection or when the existing draft came from a different parent.
    /// Selecting also pre-fetches the scope record in the background.
    ///
    /// # Errors
    /// - `ScopesError::Tree` if `path` does not address a node
    /// - `ScopesError::NotSelectable` for the root or a node without a link
    pub fn toggle_node_select(&self, path: &NodePath) -> Result<SelectionChange, ScopesError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let tree = &inner.state.nodes;

        let id = tree.resolve(path)?;
        let not_selectable = || ScopesError::NotSelectable { node: path.clone() };
        let parent = tree.parent(id).ok_or_else(not_selectable)?;
        let link_id = tree
            .get(id)
            .and_then(|n| n.link_id.clone())
            .ok_or_else(not_selectable)?;

        if let Some(idx) = inner
            .state
            .tree_scopes
            .iter()
            .position(|ts| ts.scope_name == link_id)
        {
            let removed = inner.state.tree_scopes.remove(idx);
            self.publish(inner);
            debug!(scope = %link_id, "scope deselected");
            return Ok(SelectionChange::Deselected(removed));
        }

        let single_select = tree.get(parent).is_some_and(|p| p.disable_multi_select);
        let from_same_parent = inner.state.tree_scopes.first().map_or(true, |first| {
            tree.children(parent).into_iter().any(|sibling| {
                tree.get(sibling)
                    .and_then(|s| s.link_id.as_deref())
                    .is_some_and(|l| l == first.scope_name)
            })
        });

        let tree_scope = TreeScope::new(link_id.clone(), path.clone());
        let dropped = if single_select || !from_same_parent {
            std::mem::replace(&mut inner.state.tree_scopes, vec![tree_scope.clone()])
        } else {
            inner.state.tree_scopes.push(tree_scope.clone());
            Vec::new()
        };
        self.publish(inner);
        drop(guard);

        debug!(scope = %link_id, dropped = dropped.len(), "scope selected");
        if self.config.warm_up_on_select {
            self.warm_up(link_id);
        }
        Ok(SelectionChange::Selected {
            tree_scope,
            dropped,
        })
    }

    fn warm_up(&self, scope_name: String) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(scope = %scope_name, "no runtime, skipping scope warm-up");
            return;
        };
        let catalog = Arc::clone(&self.scope_catalog);
        runtime.spawn(async move {
            if let Err(err) = catalog.fetch_one(&scope_name).await {
                debug!(scope = %scope_name, error = %err, "scope warm-up failed");
            }
        });
    }

    /// Commit the draft selection
    ///
    /// # Errors
    /// See [`update_scopes_with`](Self::update_scopes_with)
    pub async fn update_scopes(&self) -> Result<ScopesUpdate, ScopesError> {
        let draft = self.inner.lock().state.tree_scopes.clone();
        self.update_scopes_with(draft).await
    }

    /// Commit `tree_scopes` as the selection
    ///
    /// No-op when it equals the committed selection. Otherwise provisional
    /// records are published at once, the names are written to the URL and
    /// the full records are fetched in order. A newer commit cancels an
    /// older one still in flight.
    ///
    /// # Errors
    /// - `ScopesError::Catalog` / `ScopesError::Timeout` if the batch fetch
    ///   fails; the provisional records stay committed
    /// - `ScopesError::TornDown` after [`teardown`](Self::teardown)
    pub async fn update_scopes_with(
        &self,
        tree_scopes: Vec<TreeScope>,
    ) -> Result<ScopesUpdate, ScopesError> {
        let (ticket, token) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            if inner.torn_down {
                return Err(ScopesError::TornDown);
            }
            if tree_scopes == inner.state.committed_tree_scopes() {
                debug!(count = tree_scopes.len(), "selection unchanged, skipping commit");
                return Ok(ScopesUpdate::Unchanged);
            }

            let (ticket, token) = inner.scope_fetch.begin();
            inner.state.scopes = tree_scopes.iter().map(SelectedScope::provisional).collect();
            inner.state.tree_scopes = tree_scopes.clone();
            inner.state.is_loading_scopes = true;
            self.publish(inner);
            (ticket, token)
        };

        let names: Vec<String> = tree_scopes.iter().map(|ts| ts.scope_name.clone()).collect();
        self.write_url(&names);
        info!(count = names.len(), "committing scope selection");

        let result = run_cancellable(
            &token,
            self.config.scope_fetch_timeout(),
            self.scope_catalog.fetch_many(&tree_scopes),
        )
        .await
        .and_then(|fetched| match fetched {
            Some(scopes) if scopes.len() != tree_scopes.len() => {
                Err(ScopesError::Catalog(CatalogError::Invalid(format!(
                    "expected {} scopes, got {}",
                    tree_scopes.len(),
                    scopes.len()
                ))))
            }
            other => Ok(other),
        });

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let is_current = inner.scope_fetch.finish(ticket);

        match result {
            Ok(Some(scopes)) if is_current => {
                let count = scopes.len();
                inner.state.scopes = scopes;
                inner.state.is_loading_scopes = false;
                self.publish(inner);
                info!(count, "scope selection committed");
                Ok(ScopesUpdate::Committed { count })
            }
            Ok(_) => {
                debug!("scope commit superseded");
                Ok(ScopesUpdate::Superseded)
            }
            Err(err) => {
                if is_current {
                    inner.state.is_loading_scopes = false;
                    self.publish(inner);
                }
                warn!(error = %err, "scope fetch failed, keeping provisional records");
                Err(err)
            }
        }
    }

    /// Discard draft edits
    pub fn reset_dirty_scope_names(&self) {
        let mut inner = self.inner.lock();
        inner.state.tree_scopes = inner.state.committed_tree_scopes();
        self.publish(&inner);
    }

    /// Clear the committed and draft selections
    pub fn remove_all_scopes(&self) {
        {
            let mut inner = self.inner.lock();
            inner.scope_fetch.cancel();
            inner.state.scopes.clear();
            inner.state.tree_scopes.clear();
            inner.state.is_loading_scopes = false;
            self.publish(&inner);
        }
        self.write_url(&[]);
        info!("scope selection cleared");
    }

    /// Open the picker, revealing the first committed scope
    ///
    /// Collapses every node, then expands the ancestors of the first
    /// committed scope (the root when nothing placed is committed). Returns
    /// false without changes while in view mode.
    pub fn open(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state.is_viewing {
            debug!("picker stays closed in view mode");
            return false;
        }

        let ancestors = inner
            .state
            .scopes
            .first()
            .map(|s| s.path.parent())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(NodePath::root);

        inner.state.nodes.collapse_all();
        inner.state.nodes.expand_path(ancestors.segments());
        inner.state.is_opened = true;
        self.publish(&inner);
        true
    }

    /// Close the picker
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.state.is_opened = false;
        self.publish(&inner);
    }

    /// Switch the owning view to read-only; closes the picker
    pub fn enter_view_mode(&self) {
        let mut inner = self.inner.lock();
        inner.state.is_viewing = true;
        inner.state.is_opened = false;
        self.publish(&inner);
    }

    /// Leave read-only mode
    pub fn exit_view_mode(&self) {
        let mut inner = self.inner.lock();
        inner.state.is_viewing = false;
        self.publish(&inner);
    }

    /// Committed scope records
    #[must_use]
    pub fn selected_scopes(&self) -> Vec<Scope> {
        self.inner
            .lock()
            .state
            .scopes
            .iter()
            .map(|s| s.scope.clone())
            .collect()
    }

    /// Committed scope names, as stored in the URL
    #[must_use]
    pub fn url_state(&self) -> Vec<String> {
        self.inner.lock().state.scope_names()
    }

    /// Commit scope names restored from a URL
    ///
    /// Paths are not carried by the URL, so entries have empty paths.
    ///
    /// # Errors
    /// See [`update_scopes_with`](Self::update_scopes_with)
    pub async fn update_from_url(&self, scope_names: Vec<String>) -> Result<ScopesUpdate, ScopesError> {
        let tree_scopes = scope_names.into_iter().map(TreeScope::unplaced).collect();
        self.update_scopes_with(tree_scopes).await
    }

    /// Read the attached [`UrlSync`] and commit its scope names
    ///
    /// # Errors
    /// See [`update_scopes_with`](Self::update_scopes_with)
    pub async fn sync_from_url(&self) -> Result<ScopesUpdate, ScopesError> {
        match &self.url_sync {
            Some(sync) => self.update_from_url(sync.read()).await,
            None => Ok(ScopesUpdate::Unchanged),
        }
    }

    fn write_url(&self, scope_names: &[String]) {
        if let Some(sync) = &self.url_sync {
            sync.write(scope_names);
        }
    }

    /// Cancel in-flight fetches and refuse new ones
    pub fn teardown(&self) {
        let mut inner = self.inner.lock();
        if inner.torn_down {
            return;
        }
        inner.torn_down = true;
        let node_fetch = inner.node_fetch.cancel();
        let scope_fetch = inner.scope_fetch.cancel();
        inner.state.loading_node_name = None;
        inner.state.is_loading_scopes = false;
        self.publish(&inner);
        info!(node_fetch, scope_fetch, "scope tree controller torn down");
    }

    /// Whether [`teardown`](Self::teardown) ran
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.inner.lock().torn_down
    }
}

impl Drop for ScopeTreeController {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        inner.node_fetch.cancel();
        inner.scope_fetch.cancel();
    }
}

/// Names of `parent`'s children that back a draft or committed selection
fn retained_names(state: &ControllerState, parent: &NodePath) -> HashSet<String> {
    state
        .tree_scopes
        .iter()
        .map(|ts| &ts.path)
        .chain(state.scopes.iter().map(|s| &s.path))
        .filter(|path| path.len() == parent.len() + 1 && path.parent() == *parent)
        .filter_map(|path| path.last().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MockNodeCatalog, MockScopeCatalog};
    use pretty_assertions::assert_eq;
    use scopes_model::{nodes_map, Node};

    fn root_nodes() -> NodesMap {
        nodes_map([
            Node::leaf("teamA", "Team A", "scope-1"),
            Node::leaf("teamB", "Team B", "scope-2"),
        ])
    }

    fn controller(nodes: MockNodeCatalog) -> ScopeTreeController {
        let mut scopes = MockScopeCatalog::new();
        scopes
            .expect_fetch_one()
            .returning(|id| Ok(Scope::new(id, id.to_uppercase())));
        ScopeTreeController::new(Arc::new(nodes), Arc::new(scopes))
    }

    #[tokio::test]
    async fn activate_fetches_root_once() {
        let mut nodes = MockNodeCatalog::new();
        nodes
            .expect_fetch_children()
            .withf(|parent, query| parent.is_empty() && query.is_empty())
            .times(1)
            .returning(|_, _| Ok(root_nodes()));
        let controller = controller(nodes);

        let fetch = controller.activate().await.unwrap();
        assert!(matches!(fetch, NodeFetch::Loaded(ref r) if r.inserted == 2));

        // root is expanded and loaded for "" now
        let again = controller.fetch_base_nodes().await.unwrap();
        assert_eq!(again, NodeFetch::Skipped);
        assert_eq!(controller.state().loading_node_name, None);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_children_and_clears_loading() {
        let mut nodes = MockNodeCatalog::new();
        let mut calls = 0;
        nodes.expect_fetch_children().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(root_nodes())
            } else {
                Err(CatalogError::Unavailable("down".to_string()))
            }
        });
        let controller = controller(nodes);
        controller.activate().await.unwrap();

        let err = controller
            .update_node(&NodePath::root(), true, "team")
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        let state = controller.state();
        assert_eq!(state.loading_node_name, None);
        assert_eq!(state.nodes.children(scopes_tree::NodeId::ROOT).len(), 2);
    }

    #[tokio::test]
    async fn bad_path_fails_fast() {
        let controller = controller(MockNodeCatalog::new());
        let err = controller
            .update_node(&NodePath::from(["", "nowhere"]), true, "")
            .await
            .unwrap_err();
        assert!(matches!(err, ScopesError::Tree(TreeError::PathNotFound { .. })));
    }

    #[test]
    fn root_is_not_selectable() {
        let controller = controller(MockNodeCatalog::new());
        let err = controller.toggle_node_select(&NodePath::root()).unwrap_err();
        assert!(matches!(err, ScopesError::NotSelectable { .. }));
    }

    #[test]
    fn retained_names_match_direct_children_only() {
        let mut state = ControllerState::new();
        state.tree_scopes = vec![
            TreeScope::new("scope-1", ["", "teamA"]),
            TreeScope::new("scope-9", ["", "teams", "teamA"]),
            TreeScope::unplaced("scope-7"),
        ];
        state.scopes = vec![SelectedScope::new(Scope::provisional("scope-2"), ["", "teamB"])];

        let retained = retained_names(&state, &NodePath::root());
        assert_eq!(
            retained,
            HashSet::from(["teamA".to_string(), "teamB".to_string()])
        );
    }

    #[tokio::test]
    async fn teardown_refuses_new_fetches() {
        let controller = controller(MockNodeCatalog::new());
        controller.teardown();

        assert!(controller.is_torn_down());
        assert_eq!(controller.activate().await, Err(ScopesError::TornDown));
        assert_eq!(
            controller.update_from_url(vec!["scope-1".to_string()]).await,
            Err(ScopesError::TornDown)
        );
    }
}
