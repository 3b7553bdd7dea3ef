//! Request identity shared by the response cache and the in-flight table.

use std::collections::BTreeMap;
use std::fmt;
use url::form_urlencoded;

/// Canonical identity of an upstream request.
///
/// Built from the endpoint path and its query parameters sorted by name, so
/// two requests that differ only in parameter order map to the same key.
/// Names and values are form-encoded, so free text cannot forge a separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for a path and its query parameters.
    #[must_use]
    pub fn new<K, V, I>(path: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let sorted: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        if sorted.is_empty() {
            return Self(path.to_string());
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(sorted.iter())
            .finish();

        Self(format!("{}?{}", path, query))
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
