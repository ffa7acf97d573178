//! The module record: a versioned artifact and its declared dependencies.
//!
//! [`Module`] is the value type the whole system moves around. Its identity
//! is the four-tuple `(namespace, name, type, version)`; two records with
//! equal tuples describe the same module. Records are plain data: validation
//! lives in [`crate::validate`], the binary encoding in [`crate::codec`].

use std::collections::BTreeMap;

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use crate::vertex::Vertex;

/// A versioned module artifact.
///
/// All fields deserialize leniently (absent fields become empty); whether a
/// record is well-formed is decided by [`Module::validate`], not by the
/// decoder. Map keys not known to this version of the schema are kept in
/// [`unknown`](Self::unknown) and written back on encode, so records from
/// newer producers survive a round trip through this crate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    /// Namespace the module belongs to, e.g. `com.example`.
    #[serde(default)]
    pub namespace: String,
    /// Module name within the namespace.
    #[serde(default)]
    pub name: String,
    /// Module type distinguishing representations of the same logical
    /// artifact, e.g. `go`, `helm`, `container-image`.
    #[serde(rename = "type", default)]
    pub module_type: String,
    /// The version block carrying the version name of this record.
    #[serde(default)]
    pub version: ModuleVersion,
    /// Free-form annotations attached to the record.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Directed dependency declarations, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ModuleDependency>,
    /// Fields this schema version does not know about, preserved verbatim.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl Module {
    /// Returns the graph vertex identifying this module.
    pub fn vertex(&self) -> Vertex {
        Vertex {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            module_type: self.module_type.clone(),
            version: self.version.name.clone(),
        }
    }
}

/// The version block of a module record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleVersion {
    /// Version name, e.g. `v1.0.0` or `2024.1`.
    #[serde(default)]
    pub name: String,
    /// Optional schema identifier of the versioned artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Version names this version replaces, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<String>,
}

impl ModuleVersion {
    /// Creates a version block with the given name and nothing else.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleVersion {
            name: name.into(),
            schema: None,
            replaces: Vec::new(),
        }
    }
}

/// A directed dependency declaration on another module.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleDependency {
    /// Namespace of the target module.
    #[serde(default)]
    pub namespace: String,
    /// Name of the target module.
    #[serde(default)]
    pub name: String,
    /// Type of the target module.
    #[serde(rename = "type", default)]
    pub module_type: String,
    /// Version name of the target module.
    #[serde(default)]
    pub version: String,
    /// Direction of the dependency; absent means upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<DependencyDirection>,
}

impl ModuleDependency {
    /// Returns the graph vertex identifying the dependency target.
    pub fn vertex(&self) -> Vertex {
        Vertex {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            module_type: self.module_type.clone(),
            version: self.version.clone(),
        }
    }

    /// Resolves the declared direction, defaulting to upstream.
    pub fn effective_direction(&self) -> DependencyDirection {
        self.direction.unwrap_or_default()
    }
}

/// Direction of a dependency declaration.
///
/// An upstream dependency is a module the declaring module depends on; a
/// downstream dependency is a module for which the declaring module is
/// required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DependencyDirection {
    #[default]
    Upstream,
    Downstream,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_module_is_empty() {
        let module = Module::default();
        assert_eq!(module.namespace, "");
        assert_eq!(module.version.name, "");
        assert!(module.annotations.is_empty());
        assert!(module.dependencies.is_empty());
        assert!(module.unknown.is_empty());
    }

    #[test]
    fn module_vertex_uses_version_name() {
        let module = Module {
            namespace: "com.example".into(),
            name: "product".into(),
            module_type: "go".into(),
            version: ModuleVersion::new("v1.0.0"),
            ..Default::default()
        };

        assert_eq!(
            module.vertex(),
            Vertex::new("com.example", "product", "go", "v1.0.0")
        );
    }

    #[test]
    fn dependency_vertex() {
        let dependency = ModuleDependency {
            namespace: "com.example".into(),
            name: "lib".into(),
            module_type: "go".into(),
            version: "v1.2.3".into(),
            direction: None,
        };

        assert_eq!(
            dependency.vertex(),
            Vertex::new("com.example", "lib", "go", "v1.2.3")
        );
    }

    #[test]
    fn absent_direction_defaults_to_upstream() {
        let dependency = ModuleDependency::default();
        assert_eq!(
            dependency.effective_direction(),
            DependencyDirection::Upstream
        );

        let dependency = ModuleDependency {
            direction: Some(DependencyDirection::Downstream),
            ..Default::default()
        };
        assert_eq!(
            dependency.effective_direction(),
            DependencyDirection::Downstream
        );
    }
}
