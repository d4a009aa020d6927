//! Edge header representation.
//!
//! The edge platform encodes headers as a map from the lower-cased header
//! name to every line received for that name, each keeping its original
//! casing. Entries for one name keep insertion order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single header line as delivered by the edge platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EdgeHeader {
    /// Header name in its original case.
    pub key: String,
    /// Raw header value.
    pub value: String,
}

/// Ordered multi-map of edge headers, keyed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EdgeHeaderMap {
    entries: BTreeMap<String, Vec<EdgeHeader>>,
}

impl EdgeHeaderMap {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header line, creating the sequence for `key` if absent.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.entries
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(EdgeHeader {
                key,
                value: value.into(),
            });
    }

    /// All lines recorded for `name` (case-insensitive), in order.
    pub fn get(&self, name: &str) -> &[EdgeHeader] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Value of the first line recorded for `name`.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.get(name).first().map(|h| h.value.as_str())
    }

    /// Iterate over `(name, lines)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EdgeHeader])> {
        self.entries
            .iter()
            .map(|(name, lines)| (name.as_str(), lines.as_slice()))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EdgeHeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.append(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_groups_by_lowercase_name() {
        let mut headers = EdgeHeaderMap::new();
        headers.append("Accept", "text/html");
        headers.append("accept", "application/json");

        assert_eq!(headers.len(), 1);
        let lines = headers.get("ACCEPT");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].key, "Accept");
        assert_eq!(lines[1].value, "application/json");
    }

    #[test]
    fn test_first_value() {
        let headers: EdgeHeaderMap = [("Host", "example.com"), ("Host", "other.com")]
            .into_iter()
            .collect();
        assert_eq!(headers.first_value("host"), Some("example.com"));
        assert_eq!(headers.first_value("missing"), None);
    }

    #[test]
    fn test_serde_shape() {
        let json = r#"{"set-cookie":[{"key":"Set-Cookie","value":"a=1"},{"key":"Set-Cookie","value":"b=2"}]}"#;
        let headers: EdgeHeaderMap = serde_json::from_str(json).unwrap();
        assert_eq!(headers.get("set-cookie").len(), 2);
        assert_eq!(serde_json::to_string(&headers).unwrap(), json);
    }
}
