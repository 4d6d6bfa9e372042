//! Scope record cache using moka
//!
//! [`CachedScopeCatalog`] memoizes [`ScopeCatalog::fetch_one`] by scope name.
//! Selecting a node issues a warm-up `fetch_one`; the later commit resolves
//! the same names through the cache instead of the backend.

use crate::catalog::ScopeCatalog;
use crate::config::ControllerConfig;
use crate::error::CatalogError;
use async_trait::async_trait;
use moka::future::Cache;
use scopes_model::Scope;
use std::time::Duration;

/// Caching wrapper around a scope catalog
///
/// - Concurrent misses for one name share a single backend call
/// - Failed lookups are not cached
/// - Entries expire after a time-to-live
#[derive(Debug, Clone)]
pub struct CachedScopeCatalog<C> {
    inner: C,
    cache: Cache<String, Scope>,
}

impl<C: ScopeCatalog> CachedScopeCatalog<C> {
    /// Create cache with max capacity and no expiry
    #[must_use]
    pub fn new(inner: C, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[must_use]
    pub fn with_ttl(inner: C, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Create cache sized by controller configuration
    #[must_use]
    pub fn from_config(inner: C, config: &ControllerConfig) -> Self {
        Self::with_ttl(inner, config.scope_cache_capacity, config.scope_cache_ttl())
    }

    /// Wrapped catalog
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Cached record, without touching the backend
    pub async fn cached(&self, scope_id: &str) -> Option<Scope> {
        self.cache.get(scope_id).await
    }

    /// Drop one cached record
    pub async fn invalidate(&self, scope_id: &str) {
        self.cache.invalidate(scope_id).await;
    }

    /// Drop every cached record
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<C: ScopeCatalog> ScopeCatalog for CachedScopeCatalog<C> {
    async fn fetch_one(&self, scope_id: &str) -> Result<Scope, CatalogError> {
        self.cache
            .try_get_with(scope_id.to_string(), self.inner.fetch_one(scope_id))
            .await
            .map_err(|e| (*e).clone())
    }
}
