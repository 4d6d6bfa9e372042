//! Scopes Model - data types for the scope filter tree
//!
//! Defines the values exchanged between the tree controller, the catalogs
//! and the rendering layer:
//! - [`Node`] / [`NodesMap`]: catalog nodes and their ordered children
//! - [`NodePath`]: location of a node from the root sentinel
//! - [`Scope`]: the catalog record a user selects
//! - [`TreeScope`] / [`SelectedScope`]: draft and committed selections

#![warn(unreachable_pub)]

pub mod node;
pub mod path;
pub mod scope;

pub use node::{nodes_map, Node, NodeReason, NodeType, NodesMap};
pub use path::{NodePath, ROOT_NODE_NAME};
pub use scope::{Scope, ScopeMetadata, ScopeSpec, ScopeSpecFilter, SelectedScope, TreeScope};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
