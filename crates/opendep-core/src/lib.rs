//! Core data model and graph engine for versioned module artifacts.
//!
//! A *module* is a software artifact identified by the four-tuple
//! `(namespace, name, type, version)`. This crate provides:
//!
//! - [`module`]: the [`Module`] record with its version block, annotations,
//!   and directed dependency declarations
//! - [`validate`]: pure validation of records against the identity and
//!   dependency constraints, with field-path error messages
//! - [`codec`]: the forward-compatible binary encoding used by persistent
//!   storage backends
//! - [`vertex`]: module identity as a graph key
//! - [`adjacency`]: the named-edge adjacency index backing the graph
//! - [`graph`]: the module dependency graph with BFS/DFS traversals over
//!   the four derived edge relations
//!
//! Storage backends live in the companion `opendep-storage` crate.

pub mod adjacency;
pub mod codec;
pub mod error;
pub mod graph;
pub mod module;
pub mod validate;
pub mod vertex;

// Re-export key types for ergonomic use.
pub use adjacency::{AdjacencyIndex, InMemoryAdjacencyIndex};
pub use error::GraphError;
pub use graph::ModuleGraph;
pub use module::{DependencyDirection, Module, ModuleDependency, ModuleVersion};
pub use validate::{ConstraintViolation, ValidationError};
pub use vertex::Vertex;
