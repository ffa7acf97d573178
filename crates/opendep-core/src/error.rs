//! Error type for module graph construction.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors produced when adding a module to the graph.
///
/// Traversal itself never fails; a start vertex without edges is a legal
/// state that still yields one visitor call.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The record did not pass validation; the graph is unchanged.
    #[error("module validation failed: {0}")]
    Validation(#[from] ValidationError),
}
