//! Error types for Scopes Core
//!
//! Provides error handling for:
//! - Catalog lookups (nodes and scopes)
//! - Stale or malformed node paths
//! - Fetch timeouts
//! - Use after teardown
//! - Configuration problems

use scopes_model::NodePath;
use scopes_tree::TreeError;

/// Errors reported by node and scope catalogs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend could not be reached or failed
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with something unusable
    #[error("invalid catalog response: {0}")]
    Invalid(String),
}

impl CatalogError {
    /// Check if a retry may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Main controller error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopesError {
    /// Path does not address a node
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Node cannot be selected (root, or no linked scope)
    #[error("node {node} is not selectable")]
    NotSelectable {
        /// Path of the rejected node
        node: NodePath,
    },

    /// Catalog failed
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Fetch exceeded its deadline
    #[error("fetch timed out after {millis}ms")]
    Timeout {
        /// Deadline that elapsed
        millis: u64,
    },

    /// Controller was torn down
    #[error("controller torn down")]
    TornDown,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl ScopesError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Catalog(err) => err.is_retryable(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}
