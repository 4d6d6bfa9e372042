//! Tree addressing errors

use crate::arena::NodeId;
use scopes_model::NodePath;

/// Errors raised when addressing nodes in a [`NodeTree`](crate::NodeTree)
///
/// Paths are produced by the tree itself, so any of these indicate a caller
/// handing in a stale or hand-built path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Path has no segments
    #[error("empty node path")]
    EmptyPath,

    /// First segment is not the root sentinel
    #[error("path {path} does not start at the root")]
    InvalidRoot {
        /// Offending path
        path: NodePath,
    },

    /// A segment does not name a child of the previous node
    #[error("node {missing:?} of path {path} not found")]
    PathNotFound {
        /// Path being resolved
        path: NodePath,
        /// First segment with no matching node
        missing: String,
    },

    /// Id does not address a live node
    #[error("unknown node id {0}")]
    UnknownNode(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_not_found_display() {
        let err = TreeError::PathNotFound {
            path: NodePath::from(["", "teamA"]),
            missing: "teamA".to_string(),
        };
        assert_eq!(err.to_string(), r#"node "teamA" of path ["", "teamA"] not found"#);
    }
}
