//! Cross-cutting error types.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `ConfigError`) are defined in
//! their respective crates and wrap `CoreError` where business rules fail.

use thiserror::Error;

/// Errors raised by business rules shared across crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A task was asked to depend on itself.
    #[error("Task cannot depend on itself: {task_id}")]
    SelfDependency { task_id: String },

    /// Adding the edge would close a cycle in the dependency graph.
    #[error("Adding this dependency would create a circular dependency: {dependent_id} -> {depends_on_id}")]
    CircularDependency {
        dependent_id: String,
        depends_on_id: String,
    },

    /// The caller's role does not permit the operation.
    #[error("Forbidden: {action} requires manager role")]
    Forbidden { action: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
