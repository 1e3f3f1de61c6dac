//! Attributed graph store.

mod edge;
mod node;

pub use edge::{Edge, EdgeKey};
pub use node::{DEFAULT_COLOR, DEFAULT_FILL_COLOR, DEFAULT_POS, DEFAULT_SHAPE, Node};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Graph model errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("Node name already in use: {0}")]
    DuplicateName(String),
    #[error("Edge endpoint does not exist: {0}")]
    UnresolvedEndpoint(String),
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeKey),
    #[error("Invalid value for attribute '{key}': {value:?}")]
    InvalidAttributeValue { key: String, value: String },
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Anything that identifies a node: the node itself or its name.
pub trait AsNodeName {
    fn node_name(&self) -> &str;
}

impl AsNodeName for str {
    fn node_name(&self) -> &str {
        self
    }
}

impl AsNodeName for String {
    fn node_name(&self) -> &str {
        self
    }
}

impl AsNodeName for Node {
    fn node_name(&self) -> &str {
        self.name()
    }
}

impl<T: AsNodeName + ?Sized> AsNodeName for &T {
    fn node_name(&self) -> &str {
        (**self).node_name()
    }
}

/// Reference to a node or an edge of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Node(String),
    Edge(EdgeKey),
}

impl EntityRef {
    pub fn node(name: impl Into<String>) -> Self {
        Self::Node(name.into())
    }

    pub fn edge(src: &str, dst: &str) -> Self {
        Self::Edge(EdgeKey::new(src, dst))
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge(_))
    }
}

/// An owned node or edge, e.g. one that was just removed from the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Node(Node),
    Edge(Edge),
}

impl Entity {
    /// Reference that identified this entity in the graph.
    pub fn to_ref(&self) -> EntityRef {
        match self {
            Entity::Node(node) => EntityRef::Node(node.name().to_string()),
            Entity::Edge(edge) => EntityRef::Edge(edge.key()),
        }
    }
}

/// The graph being edited.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    name: String,
    directed: bool,
    nodes: HashMap<String, Node>,
    edges: HashMap<EdgeKey, Edge>,
    attributes: HashMap<String, String>,
}

impl Graph {
    /// Create a new empty, undirected graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with a name and direction.
    pub fn with_name(name: impl Into<String>, directed: bool) -> Self {
        Self {
            name: name.into(),
            directed,
            ..Self::default()
        }
    }

    /// Replace the graph with a fresh empty one.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether edges are drawn as directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Create a node.
    ///
    /// With a name, fails if the name is taken. Without one, or with an empty
    /// one, a fresh name is generated from the wall clock, retrying until it
    /// is unused.
    pub fn create_node(&mut self, name: Option<&str>) -> GraphResult<&mut Node> {
        let name = match name {
            Some(name) if !name.is_empty() => {
                if self.nodes.contains_key(name) {
                    return Err(GraphError::DuplicateName(name.to_string()));
                }
                name.to_string()
            }
            _ => self.generate_node_name(),
        };
        log::debug!("Creating node {}", name);
        Ok(self.nodes.entry(name.clone()).or_insert_with(|| Node::new(name)))
    }

    fn generate_node_name(&self) -> String {
        let mut seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        loop {
            let name = format!("n{}", seed);
            if !self.nodes.contains_key(&name) {
                return name;
            }
            seed += 1;
        }
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    /// Remove a node given the node or its name.
    ///
    /// Edges attached to the node are left in place.
    pub fn remove_node<N: AsNodeName + ?Sized>(&mut self, node: &N) -> Option<Node> {
        let removed = self.nodes.remove(node.node_name());
        if removed.is_some() {
            log::debug!("Removed node {}", node.node_name());
        }
        removed
    }

    /// Create an edge from `src` to `dst`, each given as a node or a name.
    ///
    /// An existing edge between the same ordered pair is replaced.
    pub fn create_edge<S, D>(&mut self, src: &S, dst: &D) -> GraphResult<&mut Edge>
    where
        S: AsNodeName + ?Sized,
        D: AsNodeName + ?Sized,
    {
        let src = self.resolve(src.node_name())?;
        let dst = self.resolve(dst.node_name())?;
        let key = EdgeKey::new(&src, &dst);
        let edge = Edge::new(src, dst);
        match self.edges.entry(key) {
            Entry::Occupied(mut entry) => {
                log::debug!("Replacing existing edge {}", entry.key());
                entry.insert(edge);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                log::debug!("Creating edge {}", entry.key());
                Ok(entry.insert(edge))
            }
        }
    }

    fn resolve(&self, name: &str) -> GraphResult<String> {
        self.nodes
            .get(name)
            .map(|node| node.name().to_string())
            .ok_or_else(|| GraphError::UnresolvedEndpoint(name.to_string()))
    }

    /// Move an edge to new endpoints. Returns the edge's new key.
    pub fn reconnect_edge<S, D>(&mut self, key: &EdgeKey, src: &S, dst: &D) -> GraphResult<EdgeKey>
    where
        S: AsNodeName + ?Sized,
        D: AsNodeName + ?Sized,
    {
        let src = self.resolve(src.node_name())?;
        let dst = self.resolve(dst.node_name())?;
        let Some(mut edge) = self.edges.remove(key) else {
            return Err(GraphError::EdgeNotFound(key.clone()));
        };
        edge.set_endpoints(src, dst);
        let new_key = edge.key();
        self.edges.insert(new_key.clone(), edge);
        Ok(new_key)
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    pub fn edge_mut(&mut self, key: &EdgeKey) -> Option<&mut Edge> {
        self.edges.get_mut(key)
    }

    /// Remove an edge by key.
    pub fn remove_edge(&mut self, key: &EdgeKey) -> Option<Edge> {
        self.edges.remove(key)
    }

    /// Resolve an edge's endpoints to nodes that still exist.
    pub fn edge_endpoints(&self, edge: &Edge) -> (Option<&Node>, Option<&Node>) {
        (self.nodes.get(edge.src()), self.nodes.get(edge.dst()))
    }

    /// Edges that start or end at the named node.
    pub fn incident_edges<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .values()
            .filter(move |edge| edge.src() == name || edge.dst() == name)
    }

    /// Check whether the referenced entity exists.
    pub fn contains(&self, entity: &EntityRef) -> bool {
        match entity {
            EntityRef::Node(name) => self.nodes.contains_key(name),
            EntityRef::Edge(key) => self.edges.contains_key(key),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
