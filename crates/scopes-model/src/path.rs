//! Node paths
//!
//! Provides [`NodePath`], the ordered sequence of node names leading from the
//! root sentinel to a node in the scope tree.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Name of the root sentinel node
pub const ROOT_NODE_NAME: &str = "";

/// Ordered node names from the root to a node
///
/// The first segment of a path produced by the tree is always the root
/// sentinel ([`ROOT_NODE_NAME`]). Paths restored from a URL are empty since
/// the URL only carries scope names.
///
/// # Example
/// ```
/// use scopes_model::NodePath;
///
/// let path = NodePath::from(["", "teamA", "frontend"]);
/// assert_eq!(path.last(), Some("frontend"));
/// assert_eq!(path.parent(), NodePath::from(["", "teamA"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Path with no segments
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Path addressing the root sentinel
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(vec![ROOT_NODE_NAME.to_string()])
    }

    /// Create from owned segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment (the addressed node's name)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path without its last segment
    #[must_use]
    pub fn parent(&self) -> Self {
        let end = self.0.len().saturating_sub(1);
        Self(self.0[..end].to_vec())
    }

    /// Append a segment in place
    #[inline]
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    /// Iterate over segments
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().map(|s| format!("{s:?}")).collect::<Vec<_>>().join(", "))
    }
}

impl From<Vec<String>> for NodePath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for NodePath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NodePath {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<'a> IntoIterator for &'a NodePath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_root_is_empty() {
        assert!(NodePath::root().parent().is_empty());
        assert!(NodePath::empty().parent().is_empty());
    }

    #[test]
    fn push_extends_path() {
        let mut path = NodePath::root();
        path.push("teamA");
        assert_eq!(path, NodePath::from(["", "teamA"]));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn display_quotes_segments() {
        let path = NodePath::from(["", "teamA"]);
        assert_eq!(path.to_string(), r#"["", "teamA"]"#);
    }

    #[test]
    fn serializes_as_plain_array() {
        let path = NodePath::from(["", "a"]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["","a"]"#);
    }
}
