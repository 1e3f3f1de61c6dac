//! Graph edges.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Key identifying an edge by its ordered endpoint names.
///
/// Encoded as `"{src_len}:{dst_len}-{src}-{dst}"` so that no two distinct
/// endpoint pairs map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(String);

impl EdgeKey {
    /// Derive the key for an edge from `src` to `dst`.
    ///
    /// Lengths are in UTF-8 bytes.
    pub fn new(src: &str, dst: &str) -> Self {
        Self(format!("{}:{}-{}-{}", src.len(), dst.len(), src, dst))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A connection from `src` to `dst`.
///
/// Endpoints are node names; the nodes themselves stay owned by the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    src: String,
    dst: String,
    attributes: HashMap<String, String>,
}

impl Edge {
    pub(crate) fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            attributes: HashMap::new(),
        }
    }

    /// Name of the node where the edge starts.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Name of the node where the edge ends.
    pub fn dst(&self) -> &str {
        &self.dst
    }

    /// The key this edge is stored under.
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.src, &self.dst)
    }

    pub(crate) fn set_endpoints(&mut self, src: String, dst: String) {
        self.src = src;
        self.dst = dst;
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }
}
