//! The module dependency graph.
//!
//! [`ModuleGraph`] decomposes each added record into directed edges over
//! four named relations and offers breadth-first and depth-first traversal
//! per relation. Every dependency produces a *pair* of edges, one per
//! direction, so both sides of a relationship can be walked in O(1) without
//! inverting anything at query time:
//!
//! - an upstream dependency `self -> D` stores `depends-on(self -> D)` and
//!   `used-by(D -> self)`
//! - a downstream dependency `self -> D` stores `required-for(self -> D)`
//!   and `require(D -> self)`
//!
//! Visitors control traversal: returning `false` halts immediately. Graph
//! state is append-only; callers must not add modules from inside a visitor
//! on the same graph instance.

use std::collections::{HashSet, VecDeque};

use crate::adjacency::{AdjacencyIndex, InMemoryAdjacencyIndex};
use crate::error::GraphError;
use crate::module::{DependencyDirection, Module};
use crate::vertex::Vertex;

/// Edge where the parent depends on the child.
const DEPENDS_ON_EDGE: &str = "depends-on";
/// Edge where the parent is used by the child. Inverse of `depends-on`.
const USED_BY_EDGE: &str = "used-by";
/// Edge where the parent is required for the child.
const REQUIRED_FOR_EDGE: &str = "required-for";
/// Edge where the parent requires the child. Inverse of `required-for`.
const REQUIRE_EDGE: &str = "require";

/// A module graph over an [`AdjacencyIndex`].
#[derive(Debug, Default)]
pub struct ModuleGraph<I = InMemoryAdjacencyIndex> {
    index: I,
}

impl<I: AdjacencyIndex> ModuleGraph<I> {
    /// Creates a graph over the given adjacency index.
    pub fn new(index: I) -> Self {
        ModuleGraph { index }
    }

    /// Returns the underlying adjacency index.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Adds a module's declared dependencies to the graph.
    ///
    /// The record is validated first; on failure the graph is unchanged.
    /// Each dependency contributes its edge pair in declaration order.
    pub fn add_module(&self, module: &Module) -> Result<(), GraphError> {
        module.validate()?;

        let parent = module.vertex();

        for dependency in &module.dependencies {
            let child = dependency.vertex();

            match dependency.effective_direction() {
                DependencyDirection::Upstream => {
                    self.index
                        .add_edge(DEPENDS_ON_EDGE, parent.clone(), child.clone());
                    self.index.add_edge(USED_BY_EDGE, child, parent.clone());
                }
                DependencyDirection::Downstream => {
                    self.index
                        .add_edge(REQUIRED_FOR_EDGE, parent.clone(), child.clone());
                    self.index.add_edge(REQUIRE_EDGE, child, parent.clone());
                }
            }
        }

        Ok(())
    }

    /// Traverses `depends-on` edges breadth-first from `start`.
    ///
    /// The visitor receives each vertex together with its direct children
    /// under the relation; the first call receives `start` itself. Returning
    /// `false` halts the traversal.
    pub fn traverse_depends_on_bfs<F>(&self, start: &Vertex, visit: F)
    where
        F: FnMut(&Vertex, &[Vertex]) -> bool,
    {
        self.traverse_bfs(DEPENDS_ON_EDGE, start, visit);
    }

    /// Traverses `depends-on` edges depth-first from `start`.
    ///
    /// The visitor receives `(parent, vertex)` pairs; the first call has the
    /// empty sentinel vertex as parent of `start`, so visitors can detect it
    /// with [`Vertex::is_empty`] and handle the start case uniformly.
    /// Returning `false` halts the traversal.
    pub fn traverse_depends_on_dfs<F>(&self, start: &Vertex, visit: F)
    where
        F: FnMut(&Vertex, &Vertex) -> bool,
    {
        self.traverse_dfs(DEPENDS_ON_EDGE, start, visit);
    }

    /// Traverses `used-by` edges breadth-first from `start`.
    pub fn traverse_used_by_bfs<F>(&self, start: &Vertex, visit: F)
    where
        F: FnMut(&Vertex, &[Vertex]) -> bool,
    {
        self.traverse_bfs(USED_BY_EDGE, start, visit);
    }

    /// Traverses `used-by` edges depth-first from `start`.
    pub fn traverse_used_by_dfs<F>(&self, start: &Vertex, visit: F)
    where
        F: FnMut(&Vertex, &Vertex) -> bool,
    {
        self.traverse_dfs(USED_BY_EDGE, start, visit);
    }

    /// Traverses `required-for` edges breadth-first from `start`.
    pub fn traverse_required_for_bfs<F>(&self, start: &Vertex, visit: F)
    where
        F: FnMut(&Vertex, &[Vertex]) -> bool,
    {
        self.traverse_bfs(REQUIRED_FOR_EDGE, start, visit);
    }

    /// Traverses `required-for` edges depth-first from `start`.
    pub fn traverse_required_for_dfs<F>(&self, start: &Vertex, visit: F)
    where
        F: FnMut(&Vertex, &Vertex) -> bool,
    {
        self.traverse_dfs(REQUIRED_FOR_EDGE, start, visit);
    }

    /// Traverses `require` edges breadth-first from `start`.
    pub fn traverse_require_bfs<F>(&self, start: &Vertex, visit: F)
    where
        F: FnMut(&Vertex, &[Vertex]) -> bool,
    {
        self.traverse_bfs(REQUIRE_EDGE, start, visit);
    }

    /// Traverses `require` edges depth-first from `start`.
    pub fn traverse_require_dfs<F>(&self, start: &Vertex, visit: F)
    where
        F: FnMut(&Vertex, &Vertex) -> bool,
    {
        self.traverse_dfs(REQUIRE_EDGE, start, visit);
    }

    fn traverse_bfs<F>(&self, edge_name: &str, start: &Vertex, mut visit: F)
    where
        F: FnMut(&Vertex, &[Vertex]) -> bool,
    {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();

        seen.insert(start.clone());
        queue.push_back(start.clone());

        while let Some(vertex) = queue.pop_front() {
            let children = self.index.get(edge_name, &vertex);

            if !visit(&vertex, &children) {
                return;
            }

            for child in children {
                if seen.insert(child.clone()) {
                    queue.push_back(child);
                }
            }
        }
    }

    fn traverse_dfs<F>(&self, edge_name: &str, start: &Vertex, mut visit: F)
    where
        F: FnMut(&Vertex, &Vertex) -> bool,
    {
        let mut seen = HashSet::new();
        let mut stack = vec![(Vertex::default(), start.clone())];

        while let Some((parent, vertex)) = stack.pop() {
            // The same vertex may sit on the stack twice when two parents
            // pushed it before it was popped; visit it only once.
            if !seen.insert(vertex.clone()) {
                continue;
            }

            if !visit(&parent, &vertex) {
                return;
            }

            // Pushing children in declaration order means the last-declared
            // child is popped, and therefore visited, first.
            for child in self.index.get(edge_name, &vertex) {
                if !seen.contains(&child) {
                    stack.push((vertex.clone(), child));
                }
            }
        }
    }
}
