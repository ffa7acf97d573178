//! The [`ModuleRepository`] trait defining the repository contract.
//!
//! All backends ([`InMemoryRepository`](crate::memory::InMemoryRepository),
//! [`FileRepository`](crate::file::FileRepository)) implement this trait,
//! ensuring they are fully swappable without changing consumer code.

use opendep_core::module::Module;

use crate::error::RepositoryError;

/// Access to module records stored in a backend.
///
/// Records are keyed by the identity tuple `(namespace, name, type,
/// version)`; storing a record under an existing identity overwrites the
/// previous one. Methods take `&self` and synchronize internally.
pub trait ModuleRepository {
    /// Validates the given record and stores it under its identity.
    fn add_module(&self, module: &Module) -> Result<(), RepositoryError>;

    /// Deletes a whole namespace with all its modules.
    ///
    /// Deleting a namespace that does not exist is not an error.
    fn delete_namespace(&self, namespace: &str) -> Result<(), RepositoryError>;

    /// Deletes a module with all its types and versions.
    ///
    /// Deleting a module that does not exist is not an error.
    fn delete_module(&self, namespace: &str, name: &str) -> Result<(), RepositoryError>;

    /// Deletes a module type with all its versions.
    ///
    /// Deleting a type that does not exist is not an error.
    fn delete_module_type(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
    ) -> Result<(), RepositoryError>;

    /// Deletes a single module version.
    ///
    /// Deleting a version that does not exist is not an error.
    fn delete_module_version(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
        version: &str,
    ) -> Result<(), RepositoryError>;

    /// Returns the record stored under the given identity.
    ///
    /// Fails with [`RepositoryError::NotFound`] if no such record exists.
    /// The returned record is an independent copy; mutating it does not
    /// affect the store.
    fn get_module(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
        version: &str,
    ) -> Result<Module, RepositoryError>;

    /// Lists all namespaces. Unordered snapshot.
    fn list_module_namespaces(&self) -> Result<Vec<String>, RepositoryError>;

    /// Lists all module names within a namespace. Unordered snapshot; a
    /// missing namespace yields an empty list.
    fn list_module_names(&self, namespace: &str) -> Result<Vec<String>, RepositoryError>;

    /// Lists all types of a module. Unordered snapshot; missing levels
    /// yield an empty list.
    fn list_module_types(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<String>, RepositoryError>;

    /// Lists all versions of a module type. Unordered snapshot; missing
    /// levels yield an empty list.
    fn list_module_versions(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
    ) -> Result<Vec<String>, RepositoryError>;
}
