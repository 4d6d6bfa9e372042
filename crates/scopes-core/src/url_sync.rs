//! URL synchronisation of the committed selection
//!
//! Only committed scope names travel through the URL. Paths and the draft
//! selection stay in memory.

use crate::config::{ControllerConfig, DEFAULT_URL_KEY};
use parking_lot::RwLock;
use url::form_urlencoded;

/// Two-way mapping between committed scope names and the URL
pub trait UrlSync: Send + Sync {
    /// Scope names currently in the URL
    fn read(&self) -> Vec<String>;

    /// Replace the scope names in the URL
    fn write(&self, scope_names: &[String]);
}

/// In-memory query string holding scope names under one repeated key
///
/// `scopes=a&scopes=b` reads as `["a", "b"]`. Writing replaces every
/// occurrence of the key and keeps all other parameters in order.
#[derive(Debug)]
pub struct QueryParamUrlSync {
    key: String,
    query: RwLock<String>,
}

impl QueryParamUrlSync {
    /// Empty query string using the default key
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(DEFAULT_URL_KEY)
    }

    /// Empty query string using `key`
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            query: RwLock::new(String::new()),
        }
    }

    /// Start from an existing query string (a leading `?` is ignored)
    #[must_use]
    pub fn from_query(key: impl Into<String>, query: &str) -> Self {
        let sync = Self::with_key(key);
        sync.set_query(query);
        sync
    }

    /// Start from an existing query string, keyed by the configured `url_key`
    #[must_use]
    pub fn from_config(config: &ControllerConfig, query: &str) -> Self {
        Self::from_query(config.url_key.clone(), query)
    }

    /// Parameter name
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current query string, without a leading `?`
    #[must_use]
    pub fn query(&self) -> String {
        self.query.read().clone()
    }

    /// Replace the whole query string
    pub fn set_query(&self, query: &str) {
        *self.query.write() = query.trim_start_matches('?').to_string();
    }
}

impl Default for QueryParamUrlSync {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlSync for QueryParamUrlSync {
    fn read(&self) -> Vec<String> {
        let query = self.query.read();
        form_urlencoded::parse(query.as_bytes())
            .filter(|(k, v)| *k == self.key && !v.is_empty())
            .map(|(_, v)| v.into_owned())
            .collect()
    }

    fn write(&self, scope_names: &[String]) {
        let mut query = self.query.write();
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for (k, v) in form_urlencoded::parse(query.as_bytes()) {
            if k != self.key {
                serializer.append_pair(&k, &v);
            }
        }
        for name in scope_names {
            serializer.append_pair(&self.key, name);
        }

        *query = serializer.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_repeated_key() {
        let sync = QueryParamUrlSync::from_query("scopes", "?scopes=a&from=now-1h&scopes=b");
        assert_eq!(sync.read(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn ignores_empty_values() {
        let sync = QueryParamUrlSync::from_query("scopes", "scopes=&scopes=x");
        assert_eq!(sync.read(), vec!["x".to_string()]);
    }

    #[test]
    fn write_keeps_other_params() {
        let sync = QueryParamUrlSync::from_query("scopes", "from=now-1h&scopes=old&to=now");
        sync.write(&["scope-1".to_string(), "scope 2".to_string()]);

        assert_eq!(sync.query(), "from=now-1h&to=now&scopes=scope-1&scopes=scope+2");
        assert_eq!(sync.read(), vec!["scope-1".to_string(), "scope 2".to_string()]);
    }

    #[test]
    fn write_empty_removes_key() {
        let sync = QueryParamUrlSync::from_query("scopes", "scopes=a");
        sync.write(&[]);
        assert_eq!(sync.query(), "");
        assert!(sync.read().is_empty());
    }

    #[test]
    fn configured_key_reaches_query() {
        let config = ControllerConfig::from_toml_str(r#"url_key = "scope""#).unwrap();
        let sync = QueryParamUrlSync::from_config(&config, "scopes=stale&scope=a");

        assert_eq!(sync.read(), vec!["a".to_string()]);
        sync.write(&["b".to_string()]);
        assert_eq!(sync.query(), "scopes=stale&scope=b");
    }

    #[test]
    fn custom_key() {
        let sync = QueryParamUrlSync::with_key("scope");
        sync.write(&["a".to_string()]);
        assert_eq!(sync.query(), "scope=a");
        assert_eq!(sync.key(), "scope");
    }
}
