//! Structured error types for registry-core.
//!
//! Uses `thiserror` so library consumers get composable errors; the
//! server binary can still wrap everything in `anyhow` at the top level.

use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
///
/// Serialized on the wire as `{"field": ..., "message": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main error type for registry operations.
///
/// `Validation` and `Conflict` are expected, caller-recoverable outcomes
/// and carry actionable detail. `NotFound` is the normal outcome for
/// get/update/delete on an absent id. `Store` is a server-side failure.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Payload violated one or more field rules; every violation is listed.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Email or ID number already belongs to an existing record.
    #[error("{0}")]
    Conflict(String),

    /// No record with this id.
    #[error("student {0} not found")]
    NotFound(i64),

    /// Underlying persistence failed.
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Result type alias for registry-core operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
