//! Storage seams of the access-scope domain.
//!
//! All three stores are externally owned. The profile and hierarchy stores
//! are read-only from this module's point of view.

use access_scope_sdk::{
    Candidate, CandidateFilter, OrgUnit, OrgUnitId, OrgUnitKind, ProfileId, ScopeProfile,
    ScopeType, UserId, UserScopeSet,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("no user record for '{0}'")]
    UnknownUser(UserId),
}

pub trait ProfileRepository: Send + Sync {
    fn find_profile(&self, id: &ProfileId) -> Result<Option<ScopeProfile>, RepoError>;
}

pub trait UserScopeRepository: Send + Sync {
    /// `None` when the user record does not exist.
    fn find_user_scope(&self, user_id: &UserId) -> Result<Option<UserScopeSet>, RepoError>;

    /// Replaces the user's whole scope set in one commit.
    ///
    /// Either the new set is stored completely or the previous set is kept.
    fn replace_user_scope(&self, scope: UserScopeSet) -> Result<(), RepoError>;
}

pub trait OrgHierarchyRepository: Send + Sync {
    fn find_unit(&self, id: &OrgUnitId) -> Result<Option<OrgUnit>, RepoError>;

    fn units_of_kind(&self, kind: OrgUnitKind) -> Result<Vec<OrgUnit>, RepoError>;

    /// True if a record named `name` exists for the given scope type.
    fn scope_target_exists(&self, scope_type: &ScopeType, name: &str) -> Result<bool, RepoError>;

    /// Executes a candidate filter. A deny-all filter yields no records.
    fn query_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>, RepoError>;
}
