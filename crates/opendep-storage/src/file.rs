//! File-backed implementation of [`ModuleRepository`].
//!
//! Records live in a directory tree mirroring the identity hierarchy:
//!
//! ```text
//! <base>/modules/<namespace>/<name>/<type>/<version>.module.bin
//! ```
//!
//! Each record file has a companion `<file>.lock` next to it; every read
//! takes a shared advisory lock on it and every write an exclusive one, so
//! writers to the same identity serialize within and across processes while
//! different identities proceed independently. Listings enumerate directory
//! entries without locking; they are advisory snapshots a concurrent writer
//! may or may not appear in.
//!
//! Deletions prune the emptied part of the hierarchy: after removing the
//! addressed subtree, empty ancestor directories are removed walking
//! upward, stopping at the first non-empty directory and never crossing
//! the `modules/` root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use opendep_core::codec;
use opendep_core::module::Module;

use crate::error::RepositoryError;
use crate::lock::FileLock;
use crate::traits::ModuleRepository;

const MODULES_DIRECTORY: &str = "modules";
const MODULE_FILE_SUFFIX: &str = ".module.bin";
const LOCK_FILE_SUFFIX: &str = ".lock";

/// File-backed implementation of [`ModuleRepository`].
#[derive(Debug)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    /// Creates a repository rooted at `<base>/modules`, creating the
    /// directory (and missing ancestors) if absent.
    pub fn new(base: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let root = std::path::absolute(base.as_ref().join(MODULES_DIRECTORY))
            .map_err(RepositoryError::AbsolutePath)?;

        fs::create_dir_all(&root).map_err(RepositoryError::CreateDirectory)?;

        Ok(FileRepository { root })
    }

    /// The absolute `modules/` directory this repository stores records in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.root.join(namespace)
    }

    fn name_path(&self, namespace: &str, name: &str) -> PathBuf {
        self.namespace_path(namespace).join(name)
    }

    fn type_path(&self, namespace: &str, name: &str, module_type: &str) -> PathBuf {
        self.name_path(namespace, name).join(module_type)
    }

    fn module_file_path(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
        version: &str,
    ) -> PathBuf {
        self.type_path(namespace, name, module_type)
            .join(format!("{version}{MODULE_FILE_SUFFIX}"))
    }

    fn lock_file_path(module_file: &Path) -> PathBuf {
        let mut path = module_file.as_os_str().to_os_string();
        path.push(LOCK_FILE_SUFFIX);
        PathBuf::from(path)
    }

    /// Removes a directory subtree; a missing subtree is not an error.
    fn remove_subtree(path: &Path) -> Result<(), RepositoryError> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::Delete(e)),
        }
    }

    /// Removes empty directories walking upward from `start`, stopping at
    /// the first non-empty or missing directory. The `modules/` root itself
    /// is never removed.
    fn prune_upward(&self, start: &Path) -> Result<(), RepositoryError> {
        let mut current = start.to_path_buf();

        while current != self.root && current.starts_with(&self.root) {
            match fs::read_dir(&current) {
                Ok(mut entries) => {
                    if entries.next().is_some() {
                        return Ok(());
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
                Err(e) => return Err(RepositoryError::ListDirectories(e)),
            }

            match fs::remove_dir(&current) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
                Err(e) => return Err(RepositoryError::Delete(e)),
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok(()),
            }
        }

        Ok(())
    }

    /// Lists the subdirectory names of `path`; a missing directory yields
    /// an empty list.
    fn list_directories(path: &Path) -> Result<Vec<String>, RepositoryError> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::ListDirectories(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(RepositoryError::ListDirectories)?;
            let file_type = entry
                .file_type()
                .map_err(RepositoryError::ListDirectories)?;
            if file_type.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Completes an operation performed under `lock`, surfacing an unlock
    /// failure and chaining it after the operation's own error if both
    /// occurred.
    fn finish<T>(
        result: Result<T, RepositoryError>,
        lock: FileLock,
    ) -> Result<T, RepositoryError> {
        match lock.release() {
            Ok(()) => result,
            Err(unlock) => match result {
                Ok(_) => Err(RepositoryError::Unlock(unlock)),
                Err(op) => Err(RepositoryError::UnlockAfterError {
                    op: Box::new(op),
                    unlock,
                }),
            },
        }
    }
}

impl ModuleRepository for FileRepository {
    fn add_module(&self, module: &Module) -> Result<(), RepositoryError> {
        module.validate()?;

        let serialized = codec::marshal(module)?;

        let type_dir = self.type_path(&module.namespace, &module.name, &module.module_type);
        fs::create_dir_all(&type_dir).map_err(RepositoryError::CreateDirectory)?;

        let module_file = self.module_file_path(
            &module.namespace,
            &module.name,
            &module.module_type,
            &module.version.name,
        );

        let lock = FileLock::acquire_exclusive(Self::lock_file_path(&module_file))?;
        let result = fs::write(&module_file, &serialized).map_err(RepositoryError::WriteModuleFile);
        Self::finish(result, lock)
    }

    fn delete_namespace(&self, namespace: &str) -> Result<(), RepositoryError> {
        Self::remove_subtree(&self.namespace_path(namespace))
    }

    fn delete_module(&self, namespace: &str, name: &str) -> Result<(), RepositoryError> {
        Self::remove_subtree(&self.name_path(namespace, name))?;
        self.prune_upward(&self.namespace_path(namespace))
    }

    fn delete_module_type(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
    ) -> Result<(), RepositoryError> {
        Self::remove_subtree(&self.type_path(namespace, name, module_type))?;
        self.prune_upward(&self.name_path(namespace, name))
    }

    fn delete_module_version(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
        version: &str,
    ) -> Result<(), RepositoryError> {
        let module_file = self.module_file_path(namespace, name, module_type, version);

        for path in [Self::lock_file_path(&module_file), module_file] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(RepositoryError::Delete(e)),
            }
        }

        self.prune_upward(&self.type_path(namespace, name, module_type))
    }

    fn get_module(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
        version: &str,
    ) -> Result<Module, RepositoryError> {
        let module_file = self.module_file_path(namespace, name, module_type, version);

        if !module_file.exists() {
            return Err(RepositoryError::NotFound);
        }

        let lock = FileLock::acquire_shared(Self::lock_file_path(&module_file))?;
        let result = fs::read(&module_file)
            .map_err(RepositoryError::ReadModuleFile)
            .and_then(|bytes| codec::unmarshal(&bytes).map_err(RepositoryError::from));
        Self::finish(result, lock)
    }

    fn list_module_namespaces(&self) -> Result<Vec<String>, RepositoryError> {
        Self::list_directories(&self.root)
    }

    fn list_module_names(&self, namespace: &str) -> Result<Vec<String>, RepositoryError> {
        Self::list_directories(&self.namespace_path(namespace))
    }

    fn list_module_types(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        Self::list_directories(&self.name_path(namespace, name))
    }

    fn list_module_versions(
        &self,
        namespace: &str,
        name: &str,
        module_type: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        let entries = match fs::read_dir(self.type_path(namespace, name, module_type)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::ListDirectories(e)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(RepositoryError::ListDirectories)?;
            let file_name = entry.file_name();
            if let Some(version) = file_name
                .to_string_lossy()
                .strip_suffix(MODULE_FILE_SUFFIX)
            {
                versions.push(version.to_string());
            }
        }
        Ok(versions)
    }
}
