//! Arena-backed node tree
//!
//! [`NodeTree`] stores every node in a flat arena addressed by [`NodeId`].
//! Parent links and ordered child lists live next to each entry, so a
//! path-addressed update is a walk over ids followed by one indexed write.
//!
//! The arena is an [`im::Vector`], which makes `clone()` an O(1) structural
//! share: a cloned tree is a snapshot that later writes never touch. Every
//! mutation bumps [`NodeTree::version`].

use crate::error::TreeError;
use im::Vector;
use scopes_model::{Node, NodePath, NodeReason, NodeType, NodesMap, ROOT_NODE_NAME};
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

/// Stable index of a node in the arena
///
/// Ids of removed nodes are recycled, so an id is only meaningful for the
/// tree version it was obtained from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root sentinel
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-node fields, without children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Name, unique among siblings
    pub name: String,
    /// Display title
    pub title: String,
    /// Node kind
    pub node_type: NodeType,
    /// Whether the node has children to fetch
    pub is_expandable: bool,
    /// Whether the node can be selected
    pub is_selectable: bool,
    /// Whether the node is expanded
    pub is_expanded: bool,
    /// Filter applied to the children
    pub query: String,
    /// Linked scope
    pub link_id: Option<String>,
    /// Single-select restriction for children
    pub disable_multi_select: bool,
    /// Presence reason
    pub reason: NodeReason,
}

impl NodeData {
    fn from_node(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            title: node.title.clone(),
            node_type: node.node_type,
            is_expandable: node.is_expandable,
            is_selectable: node.is_selectable,
            is_expanded: node.is_expanded,
            query: node.query.clone(),
            link_id: node.link_id.clone(),
            disable_multi_select: node.disable_multi_select,
            reason: node.reason,
        }
    }

    fn to_node(&self, children: NodesMap) -> Node {
        Node {
            name: self.name.clone(),
            title: self.title.clone(),
            node_type: self.node_type,
            is_expandable: self.is_expandable,
            is_selectable: self.is_selectable,
            is_expanded: self.is_expanded,
            query: self.query.clone(),
            link_id: self.link_id.clone(),
            disable_multi_select: self.disable_multi_select,
            reason: self.reason,
            children,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vector<NodeId>,
    /// Query the children were last fetched with
    loaded_query: Option<String>,
}

/// Outcome of [`NodeTree::merge_children`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Children kept only because they back a selection
    pub persisted: Vec<String>,
    /// Children taken from the fetch result
    pub inserted: usize,
    /// Previous children dropped
    pub removed: usize,
}

/// Copy-on-write node tree
#[derive(Debug, Clone)]
pub struct NodeTree {
    slots: Vector<Option<Entry>>,
    free: Vector<NodeId>,
    version: u64,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Tree holding only the root sentinel
    #[must_use]
    pub fn new() -> Self {
        let root = Entry {
            data: NodeData::from_node(&Node::root()),
            parent: None,
            children: Vector::new(),
            loaded_query: None,
        };
        Self {
            slots: Vector::unit(Some(root)),
            free: Vector::new(),
            version: 0,
        }
    }

    /// Mutation counter
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of live nodes, root included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always false: the root cannot be removed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    fn entry(&self, id: NodeId) -> Result<&Entry, TreeError> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(TreeError::UnknownNode(id))
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut Entry, TreeError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::UnknownNode(id))
    }

    /// Node fields
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.entry(id).ok().map(|e| &e.data)
    }

    /// Parent of a node; `None` for the root
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).ok().and_then(|e| e.parent)
    }

    /// Children in display order
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.entry(id)
            .map(|e| e.children.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Child with the given name
    #[must_use]
    pub fn child_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let entry = self.entry(id).ok()?;
        entry
            .children
            .iter()
            .copied()
            .find(|c| self.get(*c).is_some_and(|d| d.name == name))
    }

    /// Resolve a path to a node id
    ///
    /// # Errors
    /// - `TreeError::EmptyPath` if the path has no segments
    /// - `TreeError::InvalidRoot` if it does not start at the root sentinel
    /// - `TreeError::PathNotFound` if a segment is missing
    pub fn resolve(&self, path: &NodePath) -> Result<NodeId, TreeError> {
        let mut segments = path.iter();
        match segments.next() {
            None => return Err(TreeError::EmptyPath),
            Some(first) if first != ROOT_NODE_NAME => {
                return Err(TreeError::InvalidRoot { path: path.clone() })
            }
            Some(_) => {}
        }

        let mut current = NodeId::ROOT;
        for segment in segments {
            current = self
                .child_by_name(current, segment)
                .ok_or_else(|| TreeError::PathNotFound {
                    path: path.clone(),
                    missing: segment.clone(),
                })?;
        }
        Ok(current)
    }

    /// Path from the root to a node
    ///
    /// # Errors
    /// Returns `TreeError::UnknownNode` if the id is not live
    pub fn path_of(&self, id: NodeId) -> Result<NodePath, TreeError> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let entry = self.entry(node)?;
            segments.push(entry.data.name.clone());
            current = entry.parent;
        }
        segments.reverse();
        Ok(NodePath::new(segments))
    }

    /// Apply a write to one node
    ///
    /// # Errors
    /// Returns `TreeError::UnknownNode` if the id is not live
    pub fn update<F>(&mut self, id: NodeId, f: F) -> Result<(), TreeError>
    where
        F: FnOnce(&mut NodeData),
    {
        f(&mut self.entry_mut(id)?.data);
        self.version += 1;
        Ok(())
    }

    /// Query the node's children were last fetched with
    #[must_use]
    pub fn loaded_query(&self, id: NodeId) -> Option<&str> {
        self.entry(id).ok().and_then(|e| e.loaded_query.as_deref())
    }

    /// Record that the node's children were fetched with `query`
    ///
    /// # Errors
    /// Returns `TreeError::UnknownNode` if the id is not live
    pub fn mark_loaded(&mut self, id: NodeId, query: &str) -> Result<(), TreeError> {
        self.entry_mut(id)?.loaded_query = Some(query.to_string());
        self.version += 1;
        Ok(())
    }

    /// Collapse every node
    pub fn collapse_all(&mut self) {
        for entry in self.slots.iter_mut().flatten() {
            entry.data.is_expanded = false;
        }
        self.version += 1;
    }

    /// Expand each node along a chain of names starting at the root
    ///
    /// Stops at the first segment that does not resolve. Returns the number
    /// of nodes expanded.
    pub fn expand_path(&mut self, segments: &[String]) -> usize {
        let mut expanded = 0;
        let mut current: Option<NodeId> = None;

        for segment in segments {
            let next = match current {
                None => (segment == ROOT_NODE_NAME).then_some(NodeId::ROOT),
                Some(parent) => self.child_by_name(parent, segment),
            };
            let Some(id) = next else { break };
            if let Ok(entry) = self.entry_mut(id) {
                entry.data.is_expanded = true;
                expanded += 1;
            }
            current = Some(id);
        }

        self.version += 1;
        expanded
    }

    /// Replace a node's children with a fetch result
    ///
    /// Existing children named in `retained` and absent from `fetched` are
    /// kept with their subtrees and tagged [`NodeReason::Persisted`]; they
    /// come first. Fetched children follow in result order, tagged
    /// [`NodeReason::Result`]. Every other existing child is removed.
    ///
    /// # Errors
    /// Returns `TreeError::UnknownNode` if the id is not live
    pub fn merge_children(
        &mut self,
        id: NodeId,
        fetched: NodesMap,
        retained: &HashSet<String>,
    ) -> Result<MergeReport, TreeError> {
        let existing = self.entry(id)?.children.clone();
        let mut children = Vector::new();
        let mut report = MergeReport::default();

        for child in existing {
            let name = self.entry(child)?.data.name.clone();
            if retained.contains(&name) && !fetched.contains_key(&name) {
                self.entry_mut(child)?.data.reason = NodeReason::Persisted;
                children.push_back(child);
                report.persisted.push(name);
            } else {
                self.release(child);
                report.removed += 1;
            }
        }

        for (name, mut node) in fetched {
            node.name = name;
            node.reason = NodeReason::Result;
            children.push_back(self.insert_subtree(&node, id));
            report.inserted += 1;
        }

        self.entry_mut(id)?.children = children;
        self.version += 1;
        Ok(report)
    }

    fn alloc(&mut self, entry: Entry) -> NodeId {
        if let Some(id) = self.free.pop_back() {
            self.slots.set(id.0, Some(entry));
            id
        } else {
            self.slots.push_back(Some(entry));
            NodeId(self.slots.len() - 1)
        }
    }

    fn insert_subtree(&mut self, node: &Node, parent: NodeId) -> NodeId {
        let id = self.alloc(Entry {
            data: NodeData::from_node(node),
            parent: Some(parent),
            children: Vector::new(),
            loaded_query: None,
        });

        let children: Vector<NodeId> = node
            .children
            .values()
            .map(|child| self.insert_subtree(child, id))
            .collect();
        if let Some(entry) = self.slots.get_mut(id.0).and_then(Option::as_mut) {
            if !children.is_empty() {
                entry.loaded_query = Some(node.query.clone());
            }
            entry.children = children;
        }
        id
    }

    fn release(&mut self, id: NodeId) {
        let Some(entry) = self.slots.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        for child in entry.children {
            self.release(child);
        }
        self.free.push_back(id);
    }

    /// Nested view of a subtree
    #[must_use]
    pub fn node_at(&self, id: NodeId) -> Option<Node> {
        let entry = self.entry(id).ok()?;
        let children = entry
            .children
            .iter()
            .filter_map(|c| self.node_at(*c))
            .map(|n| (n.name.clone(), n))
            .collect();
        Some(entry.data.to_node(children))
    }

    /// Nested view of the whole tree, keyed by the root sentinel
    #[must_use]
    pub fn to_nodes_map(&self) -> NodesMap {
        self.node_at(NodeId::ROOT)
            .map(|root| (root.name.clone(), root))
            .into_iter()
            .collect()
    }
}
