//! Pure validation of module records.
//!
//! Validation checks run in a fixed order and stop at the first failure:
//! namespace, name, type, the version block (name, schema, each replaced
//! version in order), annotations (key, then value), and finally each
//! dependency in declaration order. Error messages have the shape
//! `<field-path>: <constraint violation>` and callers match them by
//! substring, so the display strings here are part of the public contract.
//!
//! All length checks count bytes, not characters.

use thiserror::Error;

use crate::module::{Module, ModuleDependency, ModuleVersion};

/// A single constraint a field value failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("must have at least {min} characters")]
    TooShort { min: usize },
    #[error("must have at most {max} characters")]
    TooLong { max: usize },
    #[error("must contain only lowercase alphanumeric characters, '-' or '.'")]
    ForbiddenCharacters,
    #[error("must start with lowercase alphabetic character")]
    StartNotAlphabetic,
    #[error("must start with lowercase alphanumeric character")]
    StartNotAlphanumeric,
    #[error("must end with lowercase alphanumeric character")]
    EndNotAlphanumeric,
}

/// A validation failure, locating the violated constraint by field path.
///
/// Displays as `<field-path>: <constraint violation>`, e.g.
/// `dependencies: index 2: version: must end with lowercase alphanumeric
/// character`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {violation}")]
pub struct ValidationError {
    path: String,
    violation: ConstraintViolation,
}

impl ValidationError {
    fn new(path: impl Into<String>, violation: ConstraintViolation) -> Self {
        ValidationError {
            path: path.into(),
            violation,
        }
    }

    /// Prepends an outer field segment to the path.
    fn prefixed(mut self, prefix: &str) -> Self {
        let mut path = String::with_capacity(prefix.len() + 2 + self.path.len());
        path.push_str(prefix);
        path.push_str(": ");
        path.push_str(&self.path);
        self.path = path;
        self
    }

    /// The path of the field that failed validation.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The constraint the field value violated.
    pub fn violation(&self) -> ConstraintViolation {
        self.violation
    }
}

impl Module {
    /// Checks the record against the specification constraints.
    ///
    /// Returns the first violation found, in field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_identifier(&self.namespace).map_err(|v| ValidationError::new("namespace", v))?;
        check_identifier(&self.name).map_err(|v| ValidationError::new("name", v))?;
        check_identifier(&self.module_type).map_err(|v| ValidationError::new("type", v))?;

        self.version.validate().map_err(|e| e.prefixed("version"))?;

        for (key, value) in &self.annotations {
            check_identifier(key)
                .map_err(|v| ValidationError::new(format!("annotations: key {key:?}"), v))?;
            check_length(value, 0, 253).map_err(|v| {
                ValidationError::new(format!("annotations: value of key {key:?}"), v)
            })?;
        }

        for (i, dependency) in self.dependencies.iter().enumerate() {
            dependency
                .validate()
                .map_err(|e| e.prefixed(&format!("dependencies: index {i}")))?;
        }

        Ok(())
    }
}

impl ModuleVersion {
    /// Checks the version block against the specification constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_version_name(&self.name).map_err(|v| ValidationError::new("name", v))?;

        if let Some(schema) = &self.schema {
            check_identifier(schema).map_err(|v| ValidationError::new("schema", v))?;
        }

        for (i, replaced) in self.replaces.iter().enumerate() {
            check_version_name(replaced)
                .map_err(|v| ValidationError::new(format!("replaces: index {i}"), v))?;
        }

        Ok(())
    }
}

impl ModuleDependency {
    /// Checks the dependency declaration against the specification
    /// constraints. The optional direction needs no checking.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_identifier(&self.namespace).map_err(|v| ValidationError::new("namespace", v))?;
        check_identifier(&self.name).map_err(|v| ValidationError::new("name", v))?;
        check_identifier(&self.module_type).map_err(|v| ValidationError::new("type", v))?;
        check_version_name(&self.version).map_err(|v| ValidationError::new("version", v))?;
        Ok(())
    }
}

/// Rule for namespaces, names, types, annotation keys and version schemas:
/// 1-63 bytes of lowercase alphanumerics, `-` or `.`, starting alphabetic
/// and ending alphanumeric.
fn check_identifier(value: &str) -> Result<(), ConstraintViolation> {
    check_length(value, 1, 63)?;
    check_charset(value)?;
    check_starts_alphabetic(value)?;
    check_ends_alphanumeric(value)
}

/// Rule for version names (including replaced versions and dependency
/// versions): like identifiers, but a leading digit is allowed.
fn check_version_name(value: &str) -> Result<(), ConstraintViolation> {
    check_length(value, 1, 63)?;
    check_charset(value)?;
    check_starts_alphanumeric(value)?;
    check_ends_alphanumeric(value)
}

fn check_length(value: &str, min: usize, max: usize) -> Result<(), ConstraintViolation> {
    let len = value.len();
    if len < min {
        return Err(ConstraintViolation::TooShort { min });
    }
    if len > max {
        return Err(ConstraintViolation::TooLong { max });
    }
    Ok(())
}

fn check_charset(value: &str) -> Result<(), ConstraintViolation> {
    let allowed =
        |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.';
    if value.chars().all(allowed) {
        Ok(())
    } else {
        Err(ConstraintViolation::ForbiddenCharacters)
    }
}

fn check_starts_alphabetic(value: &str) -> Result<(), ConstraintViolation> {
    match value.as_bytes().first() {
        None => Ok(()),
        Some(b) if b.is_ascii_lowercase() => Ok(()),
        Some(_) => Err(ConstraintViolation::StartNotAlphabetic),
    }
}

fn check_starts_alphanumeric(value: &str) -> Result<(), ConstraintViolation> {
    match value.as_bytes().first() {
        None => Ok(()),
        Some(b) if b.is_ascii_lowercase() || b.is_ascii_digit() => Ok(()),
        Some(_) => Err(ConstraintViolation::StartNotAlphanumeric),
    }
}

fn check_ends_alphanumeric(value: &str) -> Result<(), ConstraintViolation> {
    match value.as_bytes().last() {
        None => Ok(()),
        Some(b) if b.is_ascii_lowercase() || b.is_ascii_digit() => Ok(()),
        Some(_) => Err(ConstraintViolation::EndNotAlphanumeric),
    }
}
