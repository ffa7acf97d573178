//! Module identity as a graph key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The identity tuple of a module, used as a vertex in the module graph.
///
/// Vertices compare by value across all four fields. The default vertex
/// (all fields empty) is a sentinel: depth-first traversal reports it as
/// the parent of the start vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub namespace: String,
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub version: String,
}

impl Vertex {
    /// Creates a vertex from its four identity fields.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        module_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Vertex {
            namespace: namespace.into(),
            name: name.into(),
            module_type: module_type.into(),
            version: version.into(),
        }
    }

    /// Whether this is the all-empty sentinel vertex.
    pub fn is_empty(&self) -> bool {
        self.namespace.is_empty()
            && self.name.is_empty()
            && self.module_type.is_empty()
            && self.version.is_empty()
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.namespace, self.name, self.module_type, self.version
        )
    }
}
