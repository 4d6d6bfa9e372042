//! Scopes Core - state manager for the scope picker
//!
//! The central controller that:
//! - Lazily expands a tree of catalog nodes, one cancellable fetch at a time
//! - Keeps selected nodes alive when a refetch no longer returns them
//! - Separates the draft selection from the committed one
//! - Mirrors committed scope names to and from the URL
//!
//! # Example
//!
//! ```rust,ignore
//! use scopes_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(nodes: Arc<dyn NodeCatalog>, scopes: Arc<dyn ScopeCatalog>) -> Result<(), ScopesError> {
//! let controller = ScopeTreeController::new(nodes, scopes)
//!     .with_url_sync(Arc::new(QueryParamUrlSync::new()));
//!
//! controller.activate().await?;
//! controller.open();
//! controller.toggle_node_select(&NodePath::from(["", "teamA"]))?;
//! controller.close();
//! controller.update_scopes().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod url_sync;

// Re-exports for convenience
pub use cache::CachedScopeCatalog;
pub use catalog::{NodeCatalog, ScopeCatalog};
pub use config::{ControllerConfig, DEFAULT_URL_KEY};
pub use controller::{ControllerState, NodeFetch, ScopeTreeController, ScopesUpdate, SelectionChange};
pub use error::{CatalogError, ScopesError};
pub use fetch::{FetchSlot, FetchTicket};
pub use url_sync::{QueryParamUrlSync, UrlSync};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the scope tree controller
    pub use crate::{
        CatalogError, ControllerConfig, ControllerState, NodeCatalog, NodeFetch,
        QueryParamUrlSync, ScopeCatalog, ScopeTreeController, ScopesError, ScopesUpdate,
        SelectionChange, UrlSync,
    };
    pub use scopes_model::{Node, NodePath, NodesMap, Scope, SelectedScope, TreeScope};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
