//! Profile resolution.

use std::sync::Arc;

use access_scope_sdk::{ProfileId, ScopeEntry};
use tracing::debug;

use super::error::DomainError;
use super::repo::ProfileRepository;

/// Reads the entries of a scope profile. No side effects.
#[derive(Clone)]
pub struct ScopeProfileResolver {
    profiles: Arc<dyn ProfileRepository>,
}

impl ScopeProfileResolver {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Returns the profile's entries in stored order.
    ///
    /// The returned vector is an owned copy: later edits to the profile do
    /// not reach it. A profile with no entries yields an empty vector.
    ///
    /// # Errors
    ///
    /// `ProfileNotFound` for a blank or unknown id, `Store` if the store fails.
    #[tracing::instrument(skip_all, fields(profile_id = %profile_id))]
    pub fn resolve(&self, profile_id: &ProfileId) -> Result<Vec<ScopeEntry>, DomainError> {
        if profile_id.is_blank() {
            return Err(DomainError::profile_not_found(profile_id));
        }

        let profile = self
            .profiles
            .find_profile(profile_id)?
            .ok_or_else(|| DomainError::profile_not_found(profile_id))?;

        debug!(entries = profile.entries.len(), "resolved access scope profile");
        Ok(profile.entries)
    }
}
