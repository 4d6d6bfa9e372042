//! Scope tree nodes
//!
//! Nodes are the entries of the hierarchical catalog a user browses to pick
//! scopes. Catalogs return them as an ordered [`NodesMap`] of direct
//! children; renderers receive the same nested shape.

use crate::path::ROOT_NODE_NAME;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping of node name to node
pub type NodesMap = IndexMap<String, Node>;

/// Kind of catalog node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Groups other nodes
    #[default]
    Container,
    /// Terminal entry, usually linking to a scope
    Leaf,
}

/// Why a node is present among its parent's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeReason {
    /// Returned by the latest catalog fetch
    #[default]
    Result,
    /// Absent from the latest fetch but kept because it backs a selection
    Persisted,
}

/// A node of the scope tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
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
    /// Whether the node is currently expanded
    #[serde(default)]
    pub is_expanded: bool,
    /// Free-text filter applied to the children
    #[serde(default)]
    pub query: String,
    /// Identifier of the scope this node represents
    #[serde(default)]
    pub link_id: Option<String>,
    /// Whether only one child may be selected at a time
    #[serde(default)]
    pub disable_multi_select: bool,
    /// Presence reason
    #[serde(default)]
    pub reason: NodeReason,
    /// Child nodes
    #[serde(default, rename = "nodes")]
    pub children: NodesMap,
}

impl Node {
    /// The root sentinel: expanded, unselectable container with an empty name
    #[must_use]
    pub fn root() -> Self {
        Self {
            name: ROOT_NODE_NAME.to_string(),
            title: String::new(),
            node_type: NodeType::Container,
            is_expandable: true,
            is_selectable: false,
            is_expanded: true,
            query: String::new(),
            link_id: None,
            disable_multi_select: false,
            reason: NodeReason::Result,
            children: NodesMap::new(),
        }
    }

    /// Expandable container node
    #[must_use]
    pub fn container(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            node_type: NodeType::Container,
            is_expandable: true,
            is_selectable: false,
            is_expanded: false,
            query: String::new(),
            link_id: None,
            disable_multi_select: false,
            reason: NodeReason::Result,
            children: NodesMap::new(),
        }
    }

    /// Selectable leaf linking to a scope
    #[must_use]
    pub fn leaf(
        name: impl Into<String>,
        title: impl Into<String>,
        link_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            node_type: NodeType::Leaf,
            is_expandable: false,
            is_selectable: true,
            is_expanded: false,
            query: String::new(),
            link_id: Some(link_id.into()),
            disable_multi_select: false,
            reason: NodeReason::Result,
            children: NodesMap::new(),
        }
    }

    /// Make the node selectable and link it to a scope
    #[inline]
    #[must_use]
    pub fn with_link(mut self, link_id: impl Into<String>) -> Self {
        self.is_selectable = true;
        self.link_id = Some(link_id.into());
        self
    }

    /// Restrict children to single selection
    #[inline]
    #[must_use]
    pub fn with_disable_multi_select(mut self, disable: bool) -> Self {
        self.disable_multi_select = disable;
        self
    }

    /// Add a child, replacing any sibling with the same name
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.insert(child.name.clone(), child);
        self
    }

    /// Add several children in order
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        for child in children {
            self.children.insert(child.name.clone(), child);
        }
        self
    }
}

/// Collect nodes into an ordered map keyed by name
///
/// Later nodes replace earlier ones with the same name, keeping the earlier
/// position.
#[must_use]
pub fn nodes_map(nodes: impl IntoIterator<Item = Node>) -> NodesMap {
    nodes.into_iter().map(|n| (n.name.clone(), n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_is_expanded_container() {
        let root = Node::root();
        assert_eq!(root.name, ROOT_NODE_NAME);
        assert!(root.is_expanded);
        assert!(!root.is_selectable);
        assert_eq!(root.node_type, NodeType::Container);
    }

    #[test]
    fn leaf_links_scope() {
        let leaf = Node::leaf("teamA", "Team A", "scope-1");
        assert_eq!(leaf.link_id.as_deref(), Some("scope-1"));
        assert!(leaf.is_selectable);
        assert!(!leaf.is_expandable);
    }

    #[test]
    fn children_keep_insertion_order() {
        let node = Node::container("teams", "Teams").with_children([
            Node::leaf("b", "B", "scope-b"),
            Node::leaf("a", "A", "scope-a"),
        ]);
        let names: Vec<_> = node.children.keys().cloned().collect();
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn decodes_catalog_json() {
        let json = r#"{
            "name": "teamA",
            "title": "Team A",
            "nodeType": "leaf",
            "isExpandable": false,
            "isSelectable": true,
            "linkId": "scope-1"
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node, Node::leaf("teamA", "Team A", "scope-1"));
    }

    #[test]
    fn rejects_unknown_node_type() {
        let json = r#"{
            "name": "x", "title": "X", "nodeType": "folder",
            "isExpandable": true, "isSelectable": false
        }"#;
        assert!(serde_json::from_str::<Node>(json).is_err());
    }
}
