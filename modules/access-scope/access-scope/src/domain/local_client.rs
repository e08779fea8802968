//! Local client implementation for the access-scope module.
//!
//! Implements the SDK trait by delegating to the domain service.

use std::collections::BTreeMap;
use std::sync::Arc;

use access_scope_sdk::{
    AccessScopeClient, AccessScopeError, ApplyOutcome, CandidateFilter, DocumentKind, GrantSet,
    ProfileId, RecordFilter, ScopeEntry, UserId, UserScopeSet,
};
use async_trait::async_trait;

use super::error::DomainError;
use super::service::AccessScopeService;

/// Local client for in-process consumers.
pub struct AccessScopeLocalClient {
    service: Arc<AccessScopeService>,
}

impl AccessScopeLocalClient {
    #[must_use]
    pub fn new(service: Arc<AccessScopeService>) -> Self {
        Self { service }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> AccessScopeError {
    tracing::error!(operation = op, error = ?e, "access_scope call failed");
    e.into()
}

#[async_trait]
impl AccessScopeClient for AccessScopeLocalClient {
    async fn get_profile_entries(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<ScopeEntry>, AccessScopeError> {
        self.service
            .profile_entries(profile_id)
            .map_err(|e| log_and_convert("get_profile_entries", e))
    }

    async fn apply_profile_to_user(
        &self,
        user_id: &UserId,
        profile_id: &ProfileId,
    ) -> Result<ApplyOutcome, AccessScopeError> {
        self.service
            .apply_profile(user_id, profile_id)
            .map_err(|e| log_and_convert("apply_profile_to_user", e))
    }

    async fn clear_user_scope(&self, user_id: &UserId) -> Result<(), AccessScopeError> {
        self.service
            .clear_user_scope(user_id)
            .map_err(|e| log_and_convert("clear_user_scope", e))
    }

    async fn set_user_profile(
        &self,
        user_id: &UserId,
        profile_id: Option<&ProfileId>,
    ) -> Result<Option<ApplyOutcome>, AccessScopeError> {
        self.service
            .set_user_profile(user_id, profile_id)
            .map_err(|e| log_and_convert("set_user_profile", e))
    }

    async fn get_user_scope(&self, user_id: &UserId) -> Result<UserScopeSet, AccessScopeError> {
        self.service
            .user_scope(user_id)
            .map_err(|e| log_and_convert("get_user_scope", e))
    }

    async fn resolve_hierarchy_candidates(
        &self,
        field: &str,
        constraints: &BTreeMap<String, String>,
    ) -> Result<CandidateFilter, AccessScopeError> {
        self.service
            .candidate_filter(field, constraints)
            .map_err(|e| log_and_convert("resolve_hierarchy_candidates", e))
    }

    async fn materialize_grants(&self, user_id: &UserId) -> Result<GrantSet, AccessScopeError> {
        self.service
            .materialize_grants(user_id)
            .map_err(|e| log_and_convert("materialize_grants", e))
    }

    async fn record_filter(
        &self,
        user_id: &UserId,
        roles: &[String],
        document: DocumentKind,
    ) -> Result<RecordFilter, AccessScopeError> {
        self.service
            .record_filter(user_id, roles, document)
            .map_err(|e| log_and_convert("record_filter", e))
    }
}
