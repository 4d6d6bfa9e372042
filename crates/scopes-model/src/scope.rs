//! Scopes and selections
//!
//! - [`Scope`]: the catalog record a user ultimately selects
//! - [`TreeScope`]: a draft selection entry (scope name + tree path)
//! - [`SelectedScope`]: a committed selection with its scope record

use crate::path::NodePath;
use serde::{Deserialize, Serialize};

/// Scope identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScopeMetadata {
    /// Unique scope name
    pub name: String,
}

/// Single filter carried by a scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeSpecFilter {
    /// Label key
    pub key: String,
    /// Label value
    pub value: String,
    /// Comparison operator (`equals`, `not-equals`, `regex-match`, ...)
    pub operator: String,
}

/// Scope body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScopeSpec {
    /// Display title
    pub title: String,
    /// Scope type
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Category
    #[serde(default)]
    pub category: String,
    /// Filters applied when the scope is active
    #[serde(default)]
    pub filters: Vec<ScopeSpecFilter>,
}

/// Catalog scope record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Identity
    pub metadata: ScopeMetadata,
    /// Body
    pub spec: ScopeSpec,
}

impl Scope {
    /// Create a scope with a title and no filters
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            metadata: ScopeMetadata { name: name.into() },
            spec: ScopeSpec {
                title: title.into(),
                ..ScopeSpec::default()
            },
        }
    }

    /// Placeholder record shown until the full record is fetched
    ///
    /// The title is the scope name; every other field is empty.
    #[must_use]
    pub fn provisional(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            spec: ScopeSpec {
                title: name.clone(),
                ..ScopeSpec::default()
            },
            metadata: ScopeMetadata { name },
        }
    }

    /// With filter
    #[must_use]
    pub fn with_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        self.spec.filters.push(ScopeSpecFilter {
            key: key.into(),
            value: value.into(),
            operator: operator.into(),
        });
        self
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.spec.category = category.into();
        self
    }

    /// Scope name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Whether this record is indistinguishable from a placeholder
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        *self == Self::provisional(self.metadata.name.clone())
    }
}

/// Draft selection entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeScope {
    /// Selected scope name
    pub scope_name: String,
    /// Tree location the scope was selected from
    pub path: NodePath,
}

impl TreeScope {
    /// Create new tree scope
    #[inline]
    #[must_use]
    pub fn new(scope_name: impl Into<String>, path: impl Into<NodePath>) -> Self {
        Self {
            scope_name: scope_name.into(),
            path: path.into(),
        }
    }

    /// Tree scope without location, as restored from a URL
    #[inline]
    #[must_use]
    pub fn unplaced(scope_name: impl Into<String>) -> Self {
        Self::new(scope_name, NodePath::empty())
    }
}

/// Committed selection entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedScope {
    /// Scope record (fetched or provisional)
    pub scope: Scope,
    /// Tree location the scope was selected from
    pub path: NodePath,
}

impl SelectedScope {
    /// Create new selected scope
    #[inline]
    #[must_use]
    pub fn new(scope: Scope, path: impl Into<NodePath>) -> Self {
        Self {
            scope,
            path: path.into(),
        }
    }

    /// Placeholder selection for a draft entry
    #[must_use]
    pub fn provisional(tree_scope: &TreeScope) -> Self {
        Self {
            scope: Scope::provisional(tree_scope.scope_name.clone()),
            path: tree_scope.path.clone(),
        }
    }

    /// Draft view of this selection
    #[must_use]
    pub fn to_tree_scope(&self) -> TreeScope {
        TreeScope {
            scope_name: self.scope.metadata.name.clone(),
            path: self.path.clone(),
        }
    }
}
