//! In-memory implementation of [`ModuleRepository`].
//!
//! [`InMemoryRepository`] is a first-class backend for tests, ephemeral
//! sessions, and anywhere persistence isn't needed. Records live in a
//! four-level nested map (`namespace -> name -> type -> version -> record`)
//! guarded by a single reader-writer lock; writes clone the record in and
//! reads clone it out, so callers never hold a pointer into the store.

use std::collections::HashMap;
use std::sync::RwLock;

use opendep_core::module::Module;

use crate::error::RepositoryError;
use crate::traits::ModuleRepository;

type VersionMap = HashMap<String, Module>;
type TypeMap = HashMap<String, VersionMap>;
type NameMap = HashMap<String, TypeMap>;
type NamespaceMap = HashMap<String, NameMap>;

/// In-memory implementation of [`ModuleRepository`].
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    data: RwLock<NamespaceMap>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModuleRepository for InMemoryRepository {
    fn add_module(&self, module: &Module) -> Result<(), RepositoryError> {
        module.validate()?;

        let clone = module.clone();

        let mut data = self.data.write().expect("repository lock poisoned");
        data.entry(clone.namespace.clone())
            .or_default()
            .entry(clone.name.clone())
            .or_default()
            .entry(clone.module_type.clone())
            .or_default()
            .insert(clone.version.name.clone(), clone);

        Ok(())
    }

    fn delete_namespace(&self, namespace: &str) -> Result<(), RepositoryError> {
        let mut data = self.data.write().expect("repository lock poisoned");
        data.remove(namespace);
        Ok(())
    }

    fn delete_module(&self, namespace: &str, name: &str) -> Result<(), RepositoryError> {
        let mut data = self.data.write().expect("repository lock poisoned");
        if let Some(names) = data.get_mut(namespace) {
            names.remove(name);
        }
        Ok(())
    }

    fn delete_module_type(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
    ) -> Result<(), RepositoryError> {
        let mut data = self.data.write().expect("repository lock poisoned");
        if let Some(types) = data.get_mut(namespace).and_then(|n| n.get_mut(name)) {
            types.remove(module_type);
        }
        Ok(())
    }

    fn delete_module_version(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
        version: &str,
    ) -> Result<(), RepositoryError> {
        let mut data = self.data.write().expect("repository lock poisoned");
        if let Some(versions) = data
            .get_mut(namespace)
            .and_then(|n| n.get_mut(name))
            .and_then(|t| t.get_mut(module_type))
        {
            versions.remove(version);
        }
        Ok(())
    }

    fn get_module(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
        version: &str,
    ) -> Result<Module, RepositoryError> {
        let data = self.data.read().expect("repository lock poisoned");
        data.get(namespace)
            .and_then(|n| n.get(name))
            .and_then(|t| t.get(module_type))
            .and_then(|v| v.get(version))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn list_module_namespaces(&self) -> Result<Vec<String>, RepositoryError> {
        let data = self.data.read().expect("repository lock poisoned");
        Ok(data.keys().cloned().collect())
    }

    fn list_module_names(&self, namespace: &str) -> Result<Vec<String>, RepositoryError> {
        let data = self.data.read().expect("repository lock poisoned");
        Ok(data
            .get(namespace)
            .map(|names| names.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn list_module_types(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        let data = self.data.read().expect("repository lock poisoned");
        Ok(data
            .get(namespace)
            .and_then(|names| names.get(name))
            .map(|types| types.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn list_module_versions(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        let data = self.data.read().expect("repository lock poisoned");
        Ok(data
            .get(namespace)
            .and_then(|names| names.get(name))
            .and_then(|types| types.get(module_type))
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendep_core::module::ModuleVersion;

    fn module(namespace: &str, name: &str, module_type: &str, version: &str) -> Module {
        Module {
            namespace: namespace.into(),
            name: name.into(),
            module_type: module_type.into(),
            version: ModuleVersion::new(version),
            ..Default::default()
        }
    }

    #[test]
    fn add_invalid_module_is_rejected() {
        let repo = InMemoryRepository::new();
        let err = repo.add_module(&Module::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "module validation failed: namespace: must have at least 1 characters"
        );
        assert!(repo.list_module_namespaces().unwrap().is_empty());
    }

    #[test]
    fn add_then_get_returns_equal_record() {
        let repo = InMemoryRepository::new();
        let mut m = module("com.example", "product", "go", "v1.0.0");
        m.annotations.insert("build".into(), "1842".into());

        repo.add_module(&m).unwrap();

        let got = repo
            .get_module("com.example", "product", "go", "v1.0.0")
            .unwrap();
        assert_eq!(got, m);
    }

    #[test]
    fn add_same_identity_overwrites() {
        let repo = InMemoryRepository::new();
        let mut first = module("com.example", "product", "go", "v1.0.0");
        first.annotations.insert("build".into(), "1".into());
        let mut second = module("com.example", "product", "go", "v1.0.0");
        second.annotations.insert("build".into(), "2".into());

        repo.add_module(&first).unwrap();
        repo.add_module(&second).unwrap();

        let got = repo
            .get_module("com.example", "product", "go", "v1.0.0")
            .unwrap();
        assert_eq!(got, second);
        assert_eq!(
            repo.list_module_versions("com.example", "product", "go")
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn get_unknown_identity_is_not_found() {
        let repo = InMemoryRepository::new();
        repo.add_module(&module("com.example", "product", "go", "v1.0.0"))
            .unwrap();

        for (ns, name, ty, version) in [
            ("unknown", "product", "go", "v1.0.0"),
            ("com.example", "unknown", "go", "v1.0.0"),
            ("com.example", "product", "unknown", "v1.0.0"),
            ("com.example", "product", "go", "unknown"),
        ] {
            let err = repo.get_module(ns, name, ty, version).unwrap_err();
            assert_eq!(err.to_string(), "not found");
        }
    }

    #[test]
    fn mutating_a_returned_record_does_not_corrupt_the_store() {
        let repo = InMemoryRepository::new();
        repo.add_module(&module("com.example", "product", "go", "v1.0.0"))
            .unwrap();

        let mut got = repo
            .get_module("com.example", "product", "go", "v1.0.0")
            .unwrap();
        got.annotations.insert("mutated".into(), "yes".into());

        let again = repo
            .get_module("com.example", "product", "go", "v1.0.0")
            .unwrap();
        assert!(again.annotations.is_empty());
    }

    #[test]
    fn delete_namespace_removes_all_contained_modules() {
        let repo = InMemoryRepository::new();
        repo.add_module(&module("com.example", "product", "go", "v1.0.0"))
            .unwrap();
        repo.add_module(&module("com.example", "order", "go", "v2.0.0"))
            .unwrap();
        repo.add_module(&module("com.other", "customer", "go", "v1.0.0"))
            .unwrap();

        repo.delete_namespace("com.example").unwrap();

        assert!(matches!(
            repo.get_module("com.example", "product", "go", "v1.0.0"),
            Err(RepositoryError::NotFound)
        ));
        assert!(repo
            .get_module("com.other", "customer", "go", "v1.0.0")
            .is_ok());
    }

    #[test]
    fn delete_at_each_level_is_scoped_to_that_level() {
        let repo = InMemoryRepository::new();
        repo.add_module(&module("com.example", "product", "go", "v1.0.0"))
            .unwrap();
        repo.add_module(&module("com.example", "product", "go", "v2.0.0"))
            .unwrap();
        repo.add_module(&module("com.example", "product", "helm", "v1.0.0"))
            .unwrap();
        repo.add_module(&module("com.example", "order", "go", "v1.0.0"))
            .unwrap();

        repo.delete_module_version("com.example", "product", "go", "v1.0.0")
            .unwrap();
        assert_eq!(
            repo.list_module_versions("com.example", "product", "go")
                .unwrap(),
            vec!["v2.0.0"]
        );

        repo.delete_module_type("com.example", "product", "go")
            .unwrap();
        assert_eq!(
            repo.list_module_types("com.example", "product").unwrap(),
            vec!["helm"]
        );

        repo.delete_module("com.example", "product").unwrap();
        assert_eq!(
            repo.list_module_names("com.example").unwrap(),
            vec!["order"]
        );
    }

    #[test]
    fn deleting_missing_targets_is_not_an_error() {
        let repo = InMemoryRepository::new();
        repo.delete_namespace("com.example").unwrap();
        repo.delete_module("com.example", "product").unwrap();
        repo.delete_module_type("com.example", "product", "go")
            .unwrap();
        repo.delete_module_version("com.example", "product", "go", "v1.0.0")
            .unwrap();
    }

    #[test]
    fn listings_of_missing_levels_are_empty() {
        let repo = InMemoryRepository::new();
        assert!(repo.list_module_namespaces().unwrap().is_empty());
        assert!(repo.list_module_names("com.example").unwrap().is_empty());
        assert!(repo
            .list_module_types("com.example", "product")
            .unwrap()
            .is_empty());
        assert!(repo
            .list_module_versions("com.example", "product", "go")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn listings_enumerate_direct_children() {
        let repo = InMemoryRepository::new();
        repo.add_module(&module("com.example", "product", "go", "v1.0.0"))
            .unwrap();
        repo.add_module(&module("com.example", "product", "helm", "v1.0.0"))
            .unwrap();
        repo.add_module(&module("com.other", "customer", "go", "v2.0.0"))
            .unwrap();

        let mut namespaces = repo.list_module_namespaces().unwrap();
        namespaces.sort();
        assert_eq!(namespaces, vec!["com.example", "com.other"]);

        let mut types = repo.list_module_types("com.example", "product").unwrap();
        types.sort();
        assert_eq!(types, vec!["go", "helm"]);

        assert_eq!(
            repo.list_module_versions("com.other", "customer", "go")
                .unwrap(),
            vec!["v2.0.0"]
        );
    }
}
