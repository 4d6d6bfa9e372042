//! Scopes Tree - arena-backed node tree
//!
//! Provides [`NodeTree`], the mutable hierarchy of catalog nodes behind the
//! scope picker:
//! - Nodes addressed by stable [`NodeId`]s with parent back-links
//! - Path resolution that fails fast on stale paths
//! - O(1) snapshots via persistent vectors, with a version counter
//! - The fetch merge rule that keeps selected children alive
//!
//! # Example
//!
//! ```
//! use scopes_model::{nodes_map, Node, NodePath};
//! use scopes_tree::{NodeId, NodeTree};
//! use std::collections::HashSet;
//!
//! let mut tree = NodeTree::new();
//! let fetched = nodes_map([Node::leaf("teamA", "Team A", "scope-1")]);
//! tree.merge_children(NodeId::ROOT, fetched, &HashSet::new()).unwrap();
//!
//! let id = tree.resolve(&NodePath::from(["", "teamA"])).unwrap();
//! assert_eq!(tree.get(id).unwrap().link_id.as_deref(), Some("scope-1"));
//! ```

#![warn(unreachable_pub)]

pub mod arena;
pub mod error;

pub use arena::{MergeReport, NodeData, NodeId, NodeTree};
pub use error::TreeError;
