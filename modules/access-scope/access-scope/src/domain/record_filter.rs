//! Row-level filters for transaction documents.

use std::collections::BTreeSet;
use std::sync::Arc;

use access_scope_sdk::{DocumentKind, OrgUnitId, RecordFilter, ScopeType, UserId};
use tracing::debug;

use super::error::DomainError;
use super::grants::PermissionGrantMaterializer;
use super::repo::OrgHierarchyRepository;
use crate::config::AccessScopeConfig;

/// Builds the cost-center filter a user gets on transaction documents.
#[derive(Clone)]
pub struct RecordFilterBuilder {
    grants: PermissionGrantMaterializer,
    units: Arc<dyn OrgHierarchyRepository>,
    config: AccessScopeConfig,
}

impl RecordFilterBuilder {
    #[must_use]
    pub fn new(
        grants: PermissionGrantMaterializer,
        units: Arc<dyn OrgHierarchyRepository>,
        config: &AccessScopeConfig,
    ) -> Self {
        Self {
            grants,
            units,
            config: config.clone(),
        }
    }

    /// Privileged roles see everything. Everyone else sees documents whose
    /// cost center belongs to a read-granted factory or SBU, or is granted
    /// directly.
    ///
    /// # Errors
    ///
    /// Same as [`PermissionGrantMaterializer::materialize`]. The user is not
    /// looked up when a privileged role is present.
    #[tracing::instrument(skip_all, fields(user_id = %user_id, document = %document))]
    pub fn record_filter(
        &self,
        user_id: &UserId,
        roles: &[String],
        document: DocumentKind,
    ) -> Result<RecordFilter, DomainError> {
        if self.config.is_privileged(roles) {
            return Ok(RecordFilter::Unrestricted);
        }

        let set = self.grants.materialize(user_id)?;
        let readable = |scope_type: ScopeType| -> Vec<&str> {
            set.grants
                .iter()
                .filter(|g| g.can_read && g.scope_type == scope_type)
                .map(|g| g.scope_name.as_str())
                .collect()
        };
        let factories = readable(ScopeType::FactoryBusinessUnit);
        let sbus = readable(ScopeType::StrategicBusinessUnit);
        let direct = readable(ScopeType::CostCenter);

        if factories.is_empty() && sbus.is_empty() && direct.is_empty() {
            return Ok(RecordFilter::DenyAll);
        }

        let mut cost_centers: BTreeSet<String> =
            direct.into_iter().map(str::to_owned).collect();
        for unit_id in factories.into_iter().chain(sbus) {
            if let Some(cc) = self
                .units
                .find_unit(&OrgUnitId::from(unit_id))?
                .and_then(|u| u.cost_center)
            {
                cost_centers.insert(cc);
            }
        }

        debug!(
            field = DocumentKind::FILTER_FIELD,
            cost_centers = cost_centers.len(),
            "built record filter"
        );
        if cost_centers.is_empty() {
            return Ok(RecordFilter::DenyAll);
        }
        let cost_centers = cost_centers.into_iter().collect();
        Ok(match document.line_table() {
            Some(line_table) => RecordFilter::AnyLineCostCenterIn {
                line_table: line_table.to_owned(),
                cost_centers,
            },
            None => RecordFilter::CostCenterIn { cost_centers },
        })
    }
}
