//! Binary codec for module records.
//!
//! Records are stored as CBOR maps. The format is self-describing, so
//! decoding does not depend on the order fields appear in the byte stream,
//! and map keys unknown to this schema version are captured in
//! [`Module::unknown`] and written back on encode. Encoding is
//! deterministic for a given record: struct fields serialize in declaration
//! order and annotation/unknown maps are `BTreeMap`s.

use std::io;

use thiserror::Error;

use crate::module::Module;

/// Errors produced by [`marshal`] and [`unmarshal`].
#[derive(Debug, Error)]
pub enum CodecError {
    /// Encoding a record failed.
    #[error("could not marshal module: {0}")]
    Marshal(#[from] ciborium::ser::Error<io::Error>),

    /// The byte stream is not a valid encoded record.
    #[error("could not unmarshal module: {0}")]
    Unmarshal(#[from] ciborium::de::Error<io::Error>),
}

/// Encodes a module record to its binary form.
pub fn marshal(module: &Module) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(module, &mut buf)?;
    Ok(buf)
}

/// Decodes a module record from its binary form.
///
/// Fails with [`CodecError::Unmarshal`] on corrupt input. The record is not
/// validated; callers decide whether to run [`Module::validate`].
pub fn unmarshal(bytes: &[u8]) -> Result<Module, CodecError> {
    Ok(ciborium::de::from_reader(bytes)?)
}
