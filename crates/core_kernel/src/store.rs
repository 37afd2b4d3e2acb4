//! Normalized storage error surface
//!
//! Storage adapters translate provider-specific failures into this enum
//! before they reach the engine. The engine never branches on a provider
//! error shape; in particular, a detectable unique-constraint violation is
//! the signal it uses to converge concurrent writes.

use thiserror::Error;

/// Errors reported by storage adapters
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert violated a uniqueness constraint
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// An update targeted an entity that does not exist
    #[error("{entity} not found: {id}")]
    Missing { entity: &'static str, id: String },

    /// The underlying store could not be reached
    #[error("storage connection error: {0}")]
    Connection(String),

    /// Any other adapter failure
    #[error("storage internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a `UniqueViolation` with the given constraint name
    pub fn unique(constraint: impl Into<String>) -> Self {
        StoreError::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    /// Creates a `Missing` error
    pub fn missing(entity: &'static str, id: impl std::fmt::Display) -> Self {
        StoreError::Missing {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns true if this error is a uniqueness violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}
