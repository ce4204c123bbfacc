use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{QueryError, Result};
use crate::types::{InstantQuery, RangeQuery};

/// Deduplicated instant and range queries keyed by [`InstantQuery::hash_key`] /
/// [`RangeQuery::hash_key`].
///
/// This is also the on-disk intermediate format: two top-level objects mapping hex
/// keys to query fields. Unset fields are written as `null`; when loading, `null` and
/// an absent key both mean unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCollection {
    #[serde(default)]
    pub instant_queries: BTreeMap<String, InstantQuery>,
    #[serde(default)]
    pub range_queries: BTreeMap<String, RangeQuery>,
}

impl QueryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the query's content key, returning the key.
    pub fn add_instant_query(&mut self, query: InstantQuery) -> String {
        let key = query.hash_key();
        self.instant_queries.insert(key.clone(), query);
        key
    }

    /// Insert under the query's content key, returning the key.
    pub fn add_range_query(&mut self, query: RangeQuery) -> String {
        let key = query.hash_key();
        self.range_queries.insert(key.clone(), query);
        key
    }

    /// Union of both mappings; entries from `other` win on key clashes.
    pub fn merge(&mut self, other: QueryCollection) {
        self.instant_queries.extend(other.instant_queries);
        self.range_queries.extend(other.range_queries);
    }

    pub fn len(&self) -> usize {
        self.instant_queries.len() + self.range_queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instant_queries.is_empty() && self.range_queries.is_empty()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| QueryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Sorted-key JSON with four-space indentation and a trailing newline.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }
}
