//! Domain service for the access-scope module.

use std::collections::BTreeMap;
use std::sync::Arc;

use access_scope_sdk::{
    ApplyOutcome, Candidate, CandidateFilter, DocumentKind, GrantSet, OrgUnit, OrgUnitId,
    ProfileId, RecordFilter, ScopeEntry, UserId, UserScopeSet,
};
use tracing::debug;

use super::error::DomainError;
use super::filter_resolver::HierarchyFilterResolver;
use super::grants::PermissionGrantMaterializer;
use super::hierarchy::{HierarchyInspector, HierarchyViolation};
use super::record_filter::RecordFilterBuilder;
use super::repo::{OrgHierarchyRepository, ProfileRepository, UserScopeRepository};
use super::resolver::ScopeProfileResolver;
use super::synchronizer::UserScopeSynchronizer;
use crate::config::AccessScopeConfig;

/// Domain service for access-scope operations.
///
/// Wires the individual components over one set of stores and exposes them
/// behind a single entry point.
pub struct AccessScopeService {
    resolver: ScopeProfileResolver,
    synchronizer: UserScopeSynchronizer,
    inspector: HierarchyInspector,
    grants: PermissionGrantMaterializer,
    records: RecordFilterBuilder,
    units: Arc<dyn OrgHierarchyRepository>,
}

impl AccessScopeService {
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        users: Arc<dyn UserScopeRepository>,
        units: Arc<dyn OrgHierarchyRepository>,
        config: &AccessScopeConfig,
    ) -> Self {
        let resolver = ScopeProfileResolver::new(profiles);
        let synchronizer = UserScopeSynchronizer::new(resolver.clone(), users.clone());
        let grants = PermissionGrantMaterializer::new(users, units.clone(), config);
        let records = RecordFilterBuilder::new(grants.clone(), units.clone(), config);

        Self {
            resolver,
            synchronizer,
            inspector: HierarchyInspector::new(units.clone(), config.max_hierarchy_depth),
            grants,
            records,
            units,
        }
    }

    /// Entries of a profile, in stored order.
    ///
    /// # Errors
    ///
    /// `ProfileNotFound` or `Store`.
    pub fn profile_entries(&self, profile_id: &ProfileId) -> Result<Vec<ScopeEntry>, DomainError> {
        self.resolver.resolve(profile_id)
    }

    /// Copies a profile's entries into a user's scope set.
    ///
    /// # Errors
    ///
    /// See [`UserScopeSynchronizer::apply`].
    pub fn apply_profile(
        &self,
        user_id: &UserId,
        profile_id: &ProfileId,
    ) -> Result<ApplyOutcome, DomainError> {
        self.synchronizer.apply(user_id, profile_id)
    }

    /// # Errors
    ///
    /// `Store` if the store could not commit the change.
    pub fn clear_user_scope(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.synchronizer.clear(user_id)
    }

    /// # Errors
    ///
    /// See [`UserScopeSynchronizer::set_profile`].
    pub fn set_user_profile(
        &self,
        user_id: &UserId,
        profile_id: Option<&ProfileId>,
    ) -> Result<Option<ApplyOutcome>, DomainError> {
        self.synchronizer.set_profile(user_id, profile_id)
    }

    /// # Errors
    ///
    /// `UserNotFound` or `Store`.
    pub fn user_scope(&self, user_id: &UserId) -> Result<UserScopeSet, DomainError> {
        self.synchronizer.current(user_id)
    }

    /// Filter descriptor for a `"<Form>.<field>"` dependent field.
    ///
    /// # Errors
    ///
    /// `UnknownField` if the name is not a dependent field.
    pub fn candidate_filter(
        &self,
        field: &str,
        constraints: &BTreeMap<String, String>,
    ) -> Result<CandidateFilter, DomainError> {
        HierarchyFilterResolver::candidates_for(field, constraints)
    }

    /// Builds the descriptor for `field` and runs it against the hierarchy store.
    ///
    /// # Errors
    ///
    /// `UnknownField` or `Store`.
    #[tracing::instrument(skip(self, constraints))]
    pub fn list_candidates(
        &self,
        field: &str,
        constraints: &BTreeMap<String, String>,
    ) -> Result<Vec<Candidate>, DomainError> {
        let filter = HierarchyFilterResolver::candidates_for(field, constraints)?;
        if filter.is_deny_all() {
            return Ok(Vec::new());
        }
        let found = self.units.query_candidates(&filter)?;
        debug!(found = found.len(), "listed candidates");
        Ok(found)
    }

    /// # Errors
    ///
    /// See [`PermissionGrantMaterializer::materialize`].
    pub fn materialize_grants(&self, user_id: &UserId) -> Result<GrantSet, DomainError> {
        self.grants.materialize(user_id)
    }

    /// # Errors
    ///
    /// See [`RecordFilterBuilder::record_filter`].
    pub fn record_filter(
        &self,
        user_id: &UserId,
        roles: &[String],
        document: DocumentKind,
    ) -> Result<RecordFilter, DomainError> {
        self.records.record_filter(user_id, roles, document)
    }

    /// # Errors
    ///
    /// See [`HierarchyInspector::ancestors`].
    pub fn ancestors(&self, unit_id: &OrgUnitId) -> Result<Vec<OrgUnit>, DomainError> {
        self.inspector.ancestors(unit_id)
    }

    /// # Errors
    ///
    /// `OrgUnitNotFound` or `Store`.
    pub fn inspect(&self, unit_id: &OrgUnitId) -> Result<Vec<HierarchyViolation>, DomainError> {
        self.inspector.inspect(unit_id)
    }
}
