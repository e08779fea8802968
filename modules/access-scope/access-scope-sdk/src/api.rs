//! Public API trait for the access-scope module.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::AccessScopeError;
use crate::filter::{CandidateFilter, DocumentKind, RecordFilter};
use crate::models::{ApplyOutcome, GrantSet, ProfileId, ScopeEntry, UserId, UserScopeSet};

/// Public API trait consumed by the UI/event layer.
///
/// ```ignore
/// let entries = client.get_profile_entries(&"Finance-ReadOnly".into()).await?;
/// let outcome = client.apply_profile_to_user(&"alice".into(), &"Finance-ReadOnly".into()).await?;
/// client.clear_user_scope(&"alice".into()).await?;
/// ```
#[async_trait]
pub trait AccessScopeClient: Send + Sync {
    /// Returns the entries of a profile in stored order.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the profile does not exist
    async fn get_profile_entries(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<ScopeEntry>, AccessScopeError>;

    /// Replaces the user's scope set with a copy of the profile's entries.
    ///
    /// Returns [`ApplyOutcome::Empty`] when the profile has no entries.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the profile does not exist (the user's set is untouched)
    /// - `Validation` if the user does not exist
    async fn apply_profile_to_user(
        &self,
        user_id: &UserId,
        profile_id: &ProfileId,
    ) -> Result<ApplyOutcome, AccessScopeError>;

    /// Empties the user's scope set.
    ///
    /// # Errors
    ///
    /// - `StoreFailure` if the store could not commit the change
    async fn clear_user_scope(&self, user_id: &UserId) -> Result<(), AccessScopeError>;

    /// Applies `Some(profile)` or clears on `None`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply_profile_to_user`] and [`Self::clear_user_scope`].
    async fn set_user_profile(
        &self,
        user_id: &UserId,
        profile_id: Option<&ProfileId>,
    ) -> Result<Option<ApplyOutcome>, AccessScopeError>;

    /// Returns the user's current scope set.
    ///
    /// # Errors
    ///
    /// - `Validation` if the user does not exist
    async fn get_user_scope(&self, user_id: &UserId) -> Result<UserScopeSet, AccessScopeError>;

    /// Builds the filter descriptor for a dependent field such as
    /// `"FactoryBusinessUnit.enterprise"` from the selected ancestor values.
    ///
    /// # Errors
    ///
    /// - `Validation` if the field name is unknown
    async fn resolve_hierarchy_candidates(
        &self,
        field: &str,
        constraints: &BTreeMap<String, String>,
    ) -> Result<CandidateFilter, AccessScopeError>;

    /// Derives the effective permission grants of a user.
    ///
    /// # Errors
    ///
    /// - `Validation` if the user does not exist
    async fn materialize_grants(&self, user_id: &UserId) -> Result<GrantSet, AccessScopeError>;

    /// Builds the row-level filter a user gets for a transaction document kind.
    ///
    /// Kinds with a [`DocumentKind::line_table`] get a per-line filter.
    ///
    /// # Errors
    ///
    /// - `Validation` if the user does not exist (not checked when `roles`
    ///   contains a privileged role)
    async fn record_filter(
        &self,
        user_id: &UserId,
        roles: &[String],
        document: DocumentKind,
    ) -> Result<RecordFilter, AccessScopeError>;
}
