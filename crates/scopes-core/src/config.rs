//! Controller configuration

use crate::error::ScopesError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default URL query parameter carrying the committed scope names
pub const DEFAULT_URL_KEY: &str = "scopes";

/// Scope tree controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Query parameter holding the committed scope names
    pub url_key: String,
    /// Deadline for a node-children fetch (none: unbounded)
    pub node_fetch_timeout_ms: Option<u64>,
    /// Deadline for a scope batch fetch (none: unbounded)
    pub scope_fetch_timeout_ms: Option<u64>,
    /// Maximum scope records kept by the scope cache
    pub scope_cache_capacity: u64,
    /// Time a cached scope record stays valid
    pub scope_cache_ttl_secs: u64,
    /// Whether selecting a node pre-fetches its scope record
    pub warm_up_on_select: bool,
}

impl ControllerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With URL key
    #[inline]
    #[must_use]
    pub fn with_url_key(mut self, key: impl Into<String>) -> Self {
        self.url_key = key.into();
        self
    }

    /// With node fetch timeout
    #[inline]
    #[must_use]
    pub fn with_node_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.node_fetch_timeout_ms = Some(duration_millis(timeout));
        self
    }

    /// With scope fetch timeout
    #[inline]
    #[must_use]
    pub fn with_scope_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.scope_fetch_timeout_ms = Some(duration_millis(timeout));
        self
    }

    /// With scope cache sizing
    #[inline]
    #[must_use]
    pub fn with_scope_cache(mut self, capacity: u64, ttl: Duration) -> Self {
        self.scope_cache_capacity = capacity;
        self.scope_cache_ttl_secs = ttl.as_secs();
        self
    }

    /// With selection warm-up toggled
    #[inline]
    #[must_use]
    pub fn with_warm_up_on_select(mut self, enabled: bool) -> Self {
        self.warm_up_on_select = enabled;
        self
    }

    /// Node fetch deadline
    #[inline]
    #[must_use]
    pub fn node_fetch_timeout(&self) -> Option<Duration> {
        self.node_fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Scope fetch deadline
    #[inline]
    #[must_use]
    pub fn scope_fetch_timeout(&self) -> Option<Duration> {
        self.scope_fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Scope cache time-to-live
    #[inline]
    #[must_use]
    pub fn scope_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.scope_cache_ttl_secs)
    }

    /// Parse and validate a TOML document
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `ScopesError::Config` on malformed TOML or invalid values
    pub fn from_toml_str(source: &str) -> Result<Self, ScopesError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ScopesError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values for consistency
    ///
    /// # Errors
    /// Returns `ScopesError::Config` describing the first invalid value
    pub fn validate(&self) -> Result<(), ScopesError> {
        if self.url_key.is_empty() {
            return Err(ScopesError::Config("url_key must not be empty".to_string()));
        }
        if self.url_key.contains(['&', '=', '#', '?']) {
            return Err(ScopesError::Config(format!(
                "url_key {:?} contains a reserved character",
                self.url_key
            )));
        }
        if self.node_fetch_timeout_ms == Some(0) || self.scope_fetch_timeout_ms == Some(0) {
            return Err(ScopesError::Config("fetch timeouts must be positive".to_string()));
        }
        if self.scope_cache_capacity == 0 {
            return Err(ScopesError::Config(
                "scope_cache_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url_key: DEFAULT_URL_KEY.to_string(),
            node_fetch_timeout_ms: None,
            scope_fetch_timeout_ms: None,
            scope_cache_capacity: 1_000,
            scope_cache_ttl_secs: 300,
            warm_up_on_select: true,
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = ControllerConfig::new();
        assert_eq!(config.url_key, "scopes");
        assert!(config.validate().is_ok());
        assert_eq!(config.node_fetch_timeout(), None);
    }

    #[test]
    fn builder_sets_timeouts() {
        let config = ControllerConfig::new()
            .with_node_fetch_timeout(Duration::from_millis(250))
            .with_scope_cache(10, Duration::from_secs(5));
        assert_eq!(config.node_fetch_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.scope_cache_capacity, 10);
        assert_eq!(config.scope_cache_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn parses_partial_toml() {
        let config = ControllerConfig::from_toml_str(
            r#"
            url_key = "scope"
            node_fetch_timeout_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(config.url_key, "scope");
        assert_eq!(config.node_fetch_timeout_ms, Some(1500));
        assert_eq!(config.scope_cache_capacity, 1_000);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(ControllerConfig::new().with_url_key("").validate().is_err());
        assert!(ControllerConfig::new().with_url_key("a&b").validate().is_err());
        assert!(matches!(
            ControllerConfig::from_toml_str("scope_cache_capacity = 0"),
            Err(ScopesError::Config(_))
        ));
        assert!(ControllerConfig::from_toml_str("url_key = [").is_err());
    }
}
