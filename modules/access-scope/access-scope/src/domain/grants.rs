//! Derivation of effective permission grants from a user's scope set.

use std::sync::Arc;

use access_scope_sdk::{
    GrantOrigin, GrantSet, OrgUnit, OrgUnitId, OrgUnitKind, PermissionGrant, ScopeEntry,
    ScopeType, UserId,
};
use tracing::{debug, warn};

use super::error::DomainError;
use super::repo::{OrgHierarchyRepository, UserScopeRepository};
use crate::config::AccessScopeConfig;

/// Turns a [`access_scope_sdk::UserScopeSet`] into a [`GrantSet`]. Pure read.
#[derive(Clone)]
pub struct PermissionGrantMaterializer {
    users: Arc<dyn UserScopeRepository>,
    units: Arc<dyn OrgHierarchyRepository>,
    expand: bool,
    skip_missing: bool,
}

impl PermissionGrantMaterializer {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserScopeRepository>,
        units: Arc<dyn OrgHierarchyRepository>,
        config: &AccessScopeConfig,
    ) -> Self {
        Self {
            users,
            units,
            expand: config.expand_hierarchical_grants,
            skip_missing: config.skip_missing_scope_targets,
        }
    }

    /// # Errors
    ///
    /// `UserNotFound`, `MissingScopeTarget` (only when missing targets are
    /// not skipped) or `Store`.
    #[tracing::instrument(skip_all, fields(user_id = %user_id))]
    pub fn materialize(&self, user_id: &UserId) -> Result<GrantSet, DomainError> {
        let scope = self
            .users
            .find_user_scope(user_id)?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        let mut set = GrantSet::default();
        let mut explicit = Vec::new();

        for entry in scope.effective_entries() {
            if entry.is_incomplete() {
                debug!(?entry, "skipping incomplete scope entry");
                continue;
            }
            if !self
                .units
                .scope_target_exists(&entry.scope_type, &entry.scope_name)?
            {
                if !self.skip_missing {
                    return Err(DomainError::MissingScopeTarget {
                        scope_type: entry.scope_type,
                        scope_name: entry.scope_name,
                    });
                }
                warn!(
                    scope_type = %entry.scope_type,
                    scope_name = %entry.scope_name,
                    "scope target does not exist"
                );
                set.skipped.push(entry);
                continue;
            }
            set.grants.push(PermissionGrant {
                scope_type: entry.scope_type.clone(),
                scope_name: entry.scope_name.clone(),
                can_read: entry.can_read,
                can_write: entry.can_write,
                is_default: entry.is_primary,
                origin: GrantOrigin::Explicit,
            });
            explicit.push(entry);
        }

        if self.expand {
            for entry in &explicit {
                self.expand_entry(entry, &entry.scope_type, &entry.scope_name, &mut set)?;
            }
        }

        debug!(
            grants = set.grants.len(),
            skipped = set.skipped.len(),
            "materialized grants"
        );
        Ok(set)
    }

    /// Adds grants for the active units below `(scope_type, scope_name)`.
    ///
    /// Enterprise expands to its SBUs and each SBU to its factories, so the
    /// recursion is at most two levels deep.
    fn expand_entry(
        &self,
        origin: &ScopeEntry,
        scope_type: &ScopeType,
        scope_name: &str,
        set: &mut GrantSet,
    ) -> Result<(), DomainError> {
        let child_kind = match scope_type {
            ScopeType::Enterprise => OrgUnitKind::StrategicBusinessUnit,
            ScopeType::StrategicBusinessUnit => OrgUnitKind::FactoryBusinessUnit,
            _ => return Ok(()),
        };

        let child_type = ScopeType::from(child_kind);
        for child in self.units.units_of_kind(child_kind)? {
            if !child.is_active || upward_link(&child) != Some(scope_name) {
                continue;
            }
            let already = set
                .grants
                .iter()
                .any(|g| g.scope_type == child_type && g.scope_name == child.id.as_str());
            if !already {
                set.grants.push(PermissionGrant {
                    scope_type: child_type.clone(),
                    scope_name: child.id.as_str().to_owned(),
                    can_read: origin.can_read,
                    can_write: origin.can_write,
                    is_default: false,
                    origin: GrantOrigin::Derived {
                        from_type: origin.scope_type.clone(),
                        from_name: origin.scope_name.clone(),
                    },
                });
            }
            self.expand_entry(origin, &child_type, child.id.as_str(), set)?;
        }
        Ok(())
    }
}

/// The link an expandable unit uses to point at the unit it expands from.
fn upward_link(unit: &OrgUnit) -> Option<&str> {
    match unit.kind {
        OrgUnitKind::StrategicBusinessUnit => unit.enterprise.as_ref().map(OrgUnitId::as_str),
        OrgUnitKind::FactoryBusinessUnit => unit.sbu.as_ref().map(OrgUnitId::as_str),
        OrgUnitKind::Enterprise | OrgUnitKind::LiaisonOffice => None,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::infra::storage::{InMemoryOrgHierarchyRepository, InMemoryUserScopeRepository};
    use access_scope_sdk::UserScopeSet;

    fn hierarchy() -> Arc<InMemoryOrgHierarchyRepository> {
        let repo = InMemoryOrgHierarchyRepository::new();
        repo.upsert_unit(OrgUnit::new("ENT-1", OrgUnitKind::Enterprise, "ACME"));
        repo.upsert_unit(
            OrgUnit::new("SBU-1", OrgUnitKind::StrategicBusinessUnit, "ACME")
                .with_enterprise("ENT-1"),
        );
        repo.upsert_unit(
            OrgUnit::new("SBU-OLD", OrgUnitKind::StrategicBusinessUnit, "ACME")
                .with_enterprise("ENT-1")
                .inactive(),
        );
        repo.upsert_unit(
            OrgUnit::new("FBU-1", OrgUnitKind::FactoryBusinessUnit, "ACME").with_sbu("SBU-1"),
        );
        repo.upsert_unit(
            OrgUnit::new("FBU-2", OrgUnitKind::FactoryBusinessUnit, "ACME").with_sbu("SBU-1"),
        );
        Arc::new(repo)
    }

    fn user_with(entries: Vec<ScopeEntry>) -> Arc<InMemoryUserScopeRepository> {
        let users = InMemoryUserScopeRepository::new();
        let carol = UserId::from("carol");
        users.insert_user(carol.clone());
        users
            .replace_user_scope(UserScopeSet {
                user_id: carol,
                profile_id: None,
                entries,
            })
            .unwrap();
        Arc::new(users)
    }

    #[test]
    fn explicit_grants_skip_incomplete_and_missing() {
        let users = user_with(vec![
            ScopeEntry::new("Enterprise", "ENT-1", true, false),
            ScopeEntry::new("", "X", true, true),
            ScopeEntry::new("Factory Business Unit", "FBU-404", true, true),
            ScopeEntry::new("Enterprise", "ENT-1", true, true),
        ]);
        let m = PermissionGrantMaterializer::new(users, hierarchy(), &AccessScopeConfig::default());
        let set = m.materialize(&UserId::from("carol")).unwrap();

        assert_eq!(set.grants.len(), 1);
        assert!(set.grants[0].can_write, "last duplicate wins");
        assert_eq!(set.grants[0].origin, GrantOrigin::Explicit);
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].scope_name, "FBU-404");
    }

    #[test]
    fn primary_entry_becomes_default_grant() {
        let users = user_with(vec![
            ScopeEntry::new("Enterprise", "ENT-1", true, false).primary(),
            ScopeEntry::new("Strategic Business Unit", "SBU-1", true, false),
        ]);
        let config = AccessScopeConfig {
            expand_hierarchical_grants: true,
            ..AccessScopeConfig::default()
        };
        let m = PermissionGrantMaterializer::new(users, hierarchy(), &config);
        let set = m.materialize(&UserId::from("carol")).unwrap();

        assert!(set.grants[0].is_default);
        assert!(!set.grants[1].is_default);
        assert!(
            set.grants[2..].iter().all(|g| !g.is_default),
            "derived grants are never default"
        );
        assert_eq!(set.grants.len(), 4);
    }

    #[test]
    fn missing_target_can_be_rejected() {
        let users = user_with(vec![ScopeEntry::new("Enterprise", "ENT-404", true, false)]);
        let config = AccessScopeConfig {
            skip_missing_scope_targets: false,
            ..AccessScopeConfig::default()
        };
        let m = PermissionGrantMaterializer::new(users, hierarchy(), &config);
        assert!(matches!(
            m.materialize(&UserId::from("carol")),
            Err(DomainError::MissingScopeTarget { .. })
        ));
    }

    #[test]
    fn enterprise_expands_to_active_sbus_and_factories() {
        let users = user_with(vec![
            ScopeEntry::new("Factory Business Unit", "FBU-2", true, false),
            ScopeEntry::new("Enterprise", "ENT-1", true, true),
        ]);
        let config = AccessScopeConfig {
            expand_hierarchical_grants: true,
            ..AccessScopeConfig::default()
        };
        let m = PermissionGrantMaterializer::new(users, hierarchy(), &config);
        let set = m.materialize(&UserId::from("carol")).unwrap();

        assert_eq!(
            set.names_of(&ScopeType::StrategicBusinessUnit),
            vec!["SBU-1"]
        );
        assert_eq!(
            set.names_of(&ScopeType::FactoryBusinessUnit),
            vec!["FBU-2", "FBU-1"]
        );

        let fbu2 = &set.grants[0];
        assert_eq!(fbu2.origin, GrantOrigin::Explicit);
        assert!(!fbu2.can_write, "explicit grant is not overwritten");

        let fbu1 = set
            .grants
            .iter()
            .find(|g| g.scope_name == "FBU-1")
            .unwrap();
        assert!(fbu1.can_write);
        assert_eq!(
            fbu1.origin,
            GrantOrigin::Derived {
                from_type: ScopeType::Enterprise,
                from_name: "ENT-1".to_owned()
            }
        );
    }

    #[test]
    fn unknown_user_is_not_found() {
        let m = PermissionGrantMaterializer::new(
            Arc::new(InMemoryUserScopeRepository::new()),
            hierarchy(),
            &AccessScopeConfig::default(),
        );
        assert!(matches!(
            m.materialize(&UserId::from("nobody")),
            Err(DomainError::UserNotFound { .. })
        ));
    }
}
