//! Replacement of a user's scope set from a profile.

use std::sync::Arc;

use access_scope_sdk::{ApplyOutcome, ProfileId, UserId, UserScopeSet};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::error::DomainError;
use super::repo::UserScopeRepository;
use super::resolver::ScopeProfileResolver;

/// Applies and clears user scope sets.
///
/// Calls for the same user are serialized; calls for different users run in
/// parallel. Every successful call performs exactly one store replace and a
/// failed call performs none.
pub struct UserScopeSynchronizer {
    resolver: ScopeProfileResolver,
    users: Arc<dyn UserScopeRepository>,
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserScopeSynchronizer {
    #[must_use]
    pub fn new(resolver: ScopeProfileResolver, users: Arc<dyn UserScopeRepository>) -> Self {
        Self {
            resolver,
            users,
            locks: DashMap::new(),
        }
    }

    /// Replaces the user's scope set with a copy of the profile's entries.
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `ProfileNotFound` or `Store`. On any error the user's
    /// previous set is left as it was.
    #[tracing::instrument(skip_all, fields(user_id = %user_id, profile_id = %profile_id))]
    pub fn apply(
        &self,
        user_id: &UserId,
        profile_id: &ProfileId,
    ) -> Result<ApplyOutcome, DomainError> {
        self.with_user_lock(user_id, || {
            self.require_user(user_id)?;
            let entries = self.resolver.resolve(profile_id)?;
            let outcome = ApplyOutcome::for_entries(entries.len());

            self.users.replace_user_scope(UserScopeSet {
                user_id: user_id.clone(),
                profile_id: Some(profile_id.clone()),
                entries,
            })?;

            match outcome {
                ApplyOutcome::Applied { entries } => {
                    info!(entries, "applied access scope profile");
                }
                ApplyOutcome::Empty => info!("applied empty access scope profile"),
            }
            Ok(outcome)
        })
    }

    /// Empties the user's scope set. Clearing an unknown user is a no-op.
    ///
    /// # Errors
    ///
    /// `Store` if the store could not commit the change.
    #[tracing::instrument(skip_all, fields(user_id = %user_id))]
    pub fn clear(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.with_user_lock(user_id, || {
            if self.users.find_user_scope(user_id)?.is_none() {
                debug!("no user record, nothing to clear");
                return Ok(());
            }
            self.users
                .replace_user_scope(UserScopeSet::empty(user_id.clone()))?;
            info!("cleared access scope");
            Ok(())
        })
    }

    /// Applies `Some(profile)` and clears on `None`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply`] and [`Self::clear`].
    pub fn set_profile(
        &self,
        user_id: &UserId,
        profile_id: Option<&ProfileId>,
    ) -> Result<Option<ApplyOutcome>, DomainError> {
        match profile_id {
            Some(profile_id) => self.apply(user_id, profile_id).map(Some),
            None => self.clear(user_id).map(|()| None),
        }
    }

    /// Current scope set of a user.
    ///
    /// # Errors
    ///
    /// `UserNotFound` or `Store`.
    pub fn current(&self, user_id: &UserId) -> Result<UserScopeSet, DomainError> {
        self.require_user(user_id)
    }

    fn require_user(&self, user_id: &UserId) -> Result<UserScopeSet, DomainError> {
        self.users
            .find_user_scope(user_id)?
            .ok_or_else(|| DomainError::user_not_found(user_id))
    }

    fn with_user_lock<T>(&self, user_id: &UserId, f: impl FnOnce() -> T) -> T {
        let lock = self.locks.entry(user_id.clone()).or_default().clone();
        let out = {
            let _guard = lock.lock();
            f()
        };
        drop(lock);
        // Only the map still holds the stripe when no other call is waiting on it.
        self.locks
            .remove_if(user_id, |_, stripe| Arc::strong_count(stripe) == 1);
        out
    }
}
