//! Catalog collaborators
//!
//! The controller never talks to a backend directly. It asks a
//! [`NodeCatalog`] for the children of a node and a [`ScopeCatalog`] for
//! full scope records.

use crate::error::CatalogError;
use async_trait::async_trait;
use futures::future::try_join_all;
use scopes_model::{NodesMap, Scope, SelectedScope, TreeScope};
use std::sync::Arc;

/// Source of tree nodes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NodeCatalog: Send + Sync {
    /// Direct children of `parent_name` matching `query`
    ///
    /// An empty `parent_name` denotes the root.
    async fn fetch_children(&self, parent_name: &str, query: &str)
        -> Result<NodesMap, CatalogError>;
}

/// Source of scope records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScopeCatalog: Send + Sync {
    /// Full record of one scope
    async fn fetch_one(&self, scope_id: &str) -> Result<Scope, CatalogError>;

    /// Full records for a selection, in input order
    ///
    /// The default resolves every entry through [`fetch_one`](Self::fetch_one)
    /// concurrently.
    async fn fetch_many(
        &self,
        tree_scopes: &[TreeScope],
    ) -> Result<Vec<SelectedScope>, CatalogError> {
        let scopes =
            try_join_all(tree_scopes.iter().map(|ts| self.fetch_one(&ts.scope_name))).await?;

        Ok(scopes
            .into_iter()
            .zip(tree_scopes)
            .map(|(scope, ts)| SelectedScope::new(scope, ts.path.clone()))
            .collect())
    }
}

#[async_trait]
impl<T: NodeCatalog + ?Sized> NodeCatalog for Arc<T> {
    async fn fetch_children(
        &self,
        parent_name: &str,
        query: &str,
    ) -> Result<NodesMap, CatalogError> {
        (**self).fetch_children(parent_name, query).await
    }
}

#[async_trait]
impl<T: ScopeCatalog + ?Sized> ScopeCatalog for Arc<T> {
    async fn fetch_one(&self, scope_id: &str) -> Result<Scope, CatalogError> {
        (**self).fetch_one(scope_id).await
    }

    async fn fetch_many(
        &self,
        tree_scopes: &[TreeScope],
    ) -> Result<Vec<SelectedScope>, CatalogError> {
        (**self).fetch_many(tree_scopes).await
    }
}
