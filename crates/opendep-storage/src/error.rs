//! Storage error types.
//!
//! [`RepositoryError`] covers all anticipated failure modes in the storage
//! layer. Several display strings are part of the public contract and are
//! matched by callers (`not found`, `could not lock: <path>`,
//! `module validation failed: <cause>`).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use opendep_core::codec::CodecError;
use opendep_core::validate::ValidationError;

/// Errors produced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The record did not pass validation; nothing was stored.
    #[error("module validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No record exists under the requested identity.
    #[error("not found")]
    NotFound,

    /// The advisory lock on a record file could not be acquired within the
    /// wait budget.
    #[error("could not lock: {}", path.display())]
    Lock { path: PathBuf },

    /// Releasing an advisory lock failed after an otherwise successful
    /// operation.
    #[error("could not unlock: {0}")]
    Unlock(#[source] io::Error),

    /// Releasing an advisory lock failed after the operation itself had
    /// already failed; both errors are reported, operation first.
    #[error("{op} ; could not unlock: {unlock}")]
    UnlockAfterError {
        op: Box<RepositoryError>,
        #[source]
        unlock: io::Error,
    },

    /// Encoding or decoding a record failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The repository base path could not be resolved to an absolute path.
    #[error("could not get absolute path: {0}")]
    AbsolutePath(#[source] io::Error),

    /// A directory in the identity hierarchy could not be created.
    #[error("could not create directory: {0}")]
    CreateDirectory(#[source] io::Error),

    /// A record file could not be written.
    #[error("could not write module file: {0}")]
    WriteModuleFile(#[source] io::Error),

    /// A record file could not be read.
    #[error("could not read module file: {0}")]
    ReadModuleFile(#[source] io::Error),

    /// A directory in the identity hierarchy could not be enumerated.
    #[error("could not list directories: {0}")]
    ListDirectories(#[source] io::Error),

    /// A record file or directory subtree could not be removed.
    #[error("could not delete: {0}")]
    Delete(#[source] io::Error),
}
