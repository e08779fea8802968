//! Public error types for the access-scope module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

/// Errors that can be returned by the `AccessScopeClient`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessScopeError {
    /// A referenced object (profile, org unit) does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The request violates a constraint (unknown user, unknown field, ...).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The backing store failed. Safe to retry the whole operation.
    #[error("store failure: {message}")]
    StoreFailure { message: String },
}

impl AccessScopeError {
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn store_failure(message: impl Into<String>) -> Self {
        Self::StoreFailure {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreFailure { .. })
    }
}
