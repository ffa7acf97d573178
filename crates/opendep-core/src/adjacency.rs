//! Named-edge adjacency index backing the module graph.
//!
//! The index is a directed multi-map: for every `(edge name, parent)` pair
//! it keeps the ordered list of child vertices appended under that name.
//! Child lists preserve insertion order; traversal orderings in
//! [`crate::graph`] derive from it.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::vertex::Vertex;

/// A directed multi-graph of named edges.
///
/// Implementations must be safe for concurrent use through a shared
/// reference: writes are exclusive, reads may run in parallel.
pub trait AdjacencyIndex {
    /// Appends a named edge from `parent` to `child`.
    fn add_edge(&self, name: &str, parent: Vertex, child: Vertex);

    /// Appends named edges from `parent` to each of `children`, in order.
    fn add_edges(&self, name: &str, parent: Vertex, children: Vec<Vertex>);

    /// Returns the ordered children of `parent` under `name`, or an empty
    /// list if no such entry exists.
    fn get(&self, name: &str, parent: &Vertex) -> Vec<Vertex>;

    /// Returns the number of distinct parent vertices that have an entry
    /// under `name`. This counts parents, not the total number of children.
    fn number_of_edges(&self, name: &str) -> usize;
}

type EdgeLists = HashMap<String, HashMap<Vertex, Vec<Vertex>>>;

/// In-memory [`AdjacencyIndex`] guarded by a single reader-writer lock.
#[derive(Debug, Default)]
pub struct InMemoryAdjacencyIndex {
    inner: RwLock<EdgeLists>,
}

impl InMemoryAdjacencyIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdjacencyIndex for InMemoryAdjacencyIndex {
    fn add_edge(&self, name: &str, parent: Vertex, child: Vertex) {
        let mut inner = self.inner.write().expect("adjacency index lock poisoned");
        inner
            .entry(name.to_string())
            .or_default()
            .entry(parent)
            .or_default()
            .push(child);
    }

    fn add_edges(&self, name: &str, parent: Vertex, children: Vec<Vertex>) {
        let mut inner = self.inner.write().expect("adjacency index lock poisoned");
        inner
            .entry(name.to_string())
            .or_default()
            .entry(parent)
            .or_default()
            .extend(children);
    }

    fn get(&self, name: &str, parent: &Vertex) -> Vec<Vertex> {
        let inner = self.inner.read().expect("adjacency index lock poisoned");
        inner
            .get(name)
            .and_then(|edges| edges.get(parent))
            .cloned()
            .unwrap_or_default()
    }

    fn number_of_edges(&self, name: &str) -> usize {
        let inner = self.inner.read().expect("adjacency index lock poisoned");
        inner.get(name).map_or(0, HashMap::len)
    }
}
