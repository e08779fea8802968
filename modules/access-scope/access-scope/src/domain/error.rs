use access_scope_sdk::{AccessScopeError, OrgUnitId, ProfileId, ScopeType, UserId};
use thiserror::Error;

use super::repo::RepoError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Access scope profile not found: {id}")]
    ProfileNotFound { id: ProfileId },

    #[error("User not found: {id}")]
    UserNotFound { id: UserId },

    #[error("Org unit not found: {id}")]
    OrgUnitNotFound { id: OrgUnitId },

    #[error("Unknown dependent field '{name}'")]
    UnknownField { name: String },

    #[error("Scope target {scope_type} '{scope_name}' does not exist")]
    MissingScopeTarget {
        scope_type: ScopeType,
        scope_name: String,
    },

    #[error("Cycle in org hierarchy starting at {start} (revisited {at})")]
    HierarchyCycle { start: OrgUnitId, at: OrgUnitId },

    #[error("Store error: {0}")]
    Store(RepoError),
}

impl From<RepoError> for DomainError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::UnknownUser(id) => Self::UserNotFound { id },
            e @ RepoError::Unavailable(_) => Self::Store(e),
        }
    }
}

impl DomainError {
    #[must_use]
    pub fn profile_not_found(id: &ProfileId) -> Self {
        Self::ProfileNotFound { id: id.clone() }
    }

    #[must_use]
    pub fn user_not_found(id: &UserId) -> Self {
        Self::UserNotFound { id: id.clone() }
    }

    #[must_use]
    pub fn org_unit_not_found(id: &OrgUnitId) -> Self {
        Self::OrgUnitNotFound { id: id.clone() }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for AccessScopeError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::ProfileNotFound { id } => {
                AccessScopeError::not_found("access scope profile", id.as_str())
            }
            DomainError::OrgUnitNotFound { id } => {
                AccessScopeError::not_found("org unit", id.as_str())
            }
            DomainError::UserNotFound { id } => {
                AccessScopeError::validation(format!("user '{id}' does not exist"))
            }
            e @ (DomainError::UnknownField { .. }
            | DomainError::MissingScopeTarget { .. }
            | DomainError::HierarchyCycle { .. }) => AccessScopeError::validation(e.to_string()),
            DomainError::Store(e) => AccessScopeError::store_failure(e.to_string()),
        }
    }
}
