//! The error taxonomy exposed to drivers
//!
//! Every business-rule violation raised by the engine carries one of the
//! kinds below. Each kind maps to a stable string code and status number so
//! that retries, alerts, and UI messaging can branch on kind without
//! parsing message text.

use thiserror::Error;

use crate::store::StoreError;

/// Classification of an engine error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or inconsistent input (e.g., unbalanced manual entry)
    Validation,
    /// A referenced entity is absent
    NotFound,
    /// State already satisfies the requested terminal condition
    Conflict,
    /// Valid request blocked by current business state
    PreconditionFailed,
    /// Authorization failure (raised by collaborators, never by the core)
    Forbidden,
    /// Unexpected storage or internal failure
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::PreconditionFailed => "PRECONDITION_FAILED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Stable status number for this kind
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::PreconditionFailed => 412,
            ErrorKind::Forbidden => 403,
            ErrorKind::Internal => 500,
        }
    }
}

/// Error type returned by every engine operation
#[derive(Debug, Error)]
#[error("{}: {message}", kind.code())]
pub struct CoreError {
    kind: ErrorKind,
    message: String,
}

impl CoreError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("{entity} not found: {id}"))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PreconditionFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns the error classification
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the stable code for this error
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the stable status number for this error
    pub fn status(&self) -> u16 {
        self.kind.status()
    }

    /// Returns the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            // A uniqueness violation that reaches a driver was not a benign
            // race; races are converged inside the engine by re-reading.
            StoreError::UniqueViolation { constraint } => CoreError::conflict(format!(
                "unique constraint violated: {constraint}"
            )),
            StoreError::Missing { entity, id } => CoreError::new(
                ErrorKind::NotFound,
                format!("{entity} not found: {id}"),
            ),
            StoreError::Connection(message) | StoreError::Internal(message) => {
                CoreError::internal(message)
            }
        }
    }
}
