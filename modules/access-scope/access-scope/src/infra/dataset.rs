//! Serializable snapshot of every store the module reads or writes.
//!
//! A dataset is how the in-memory stores are seeded and how their state is
//! written back out. Any serde format works; the CLI reads YAML.

use std::collections::HashSet;
use std::sync::Arc;

use access_scope_sdk::{
    CompanyResource, Employee, OrgUnit, ProfileId, ScopeEntry, ScopeProfile, UserId, UserScopeSet,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::storage::{
    InMemoryOrgHierarchyRepository, InMemoryProfileRepository, InMemoryUserScopeRepository,
};
use crate::config::AccessScopeConfig;
use crate::domain::repo::{RepoError, UserScopeRepository};
use crate::domain::service::AccessScopeService;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("duplicate {kind} id '{id}'")]
    Duplicate { kind: &'static str, id: String },

    #[error("failed to seed user scope: {0}")]
    Seed(#[from] RepoError),
}

/// A user record as stored in a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetUser {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<ScopeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Dataset {
    pub profiles: Vec<ScopeProfile>,
    pub users: Vec<DatasetUser>,
    pub org_units: Vec<OrgUnit>,
    pub employees: Vec<Employee>,
    pub resources: Vec<CompanyResource>,
}

/// The three stores built from a dataset.
pub struct Stores {
    pub profiles: Arc<InMemoryProfileRepository>,
    pub users: Arc<InMemoryUserScopeRepository>,
    pub units: Arc<InMemoryOrgHierarchyRepository>,
}

impl Dataset {
    /// Seeds fresh in-memory stores. User scope sets are loaded as stored;
    /// a user's `profile` is recorded but not re-applied.
    ///
    /// # Errors
    ///
    /// `Duplicate` if a profile, user, unit or employee id occurs twice.
    pub fn into_stores(self) -> Result<Stores, DatasetError> {
        ensure_unique("profile", self.profiles.iter().map(|p| p.id.as_str()))?;
        ensure_unique("user", self.users.iter().map(|u| u.id.as_str()))?;
        ensure_unique("org unit", self.org_units.iter().map(|u| u.id.as_str()))?;
        ensure_unique("employee", self.employees.iter().map(|e| e.id.as_str()))?;

        let profiles = InMemoryProfileRepository::new();
        for profile in self.profiles {
            profiles.upsert_profile(profile);
        }

        let users = InMemoryUserScopeRepository::new();
        for user in self.users {
            users.insert_user(user.id.clone());
            users.replace_user_scope(UserScopeSet {
                user_id: user.id,
                profile_id: user.profile,
                entries: user.scope,
            })?;
        }

        let units = InMemoryOrgHierarchyRepository::new();
        for unit in self.org_units {
            units.upsert_unit(unit);
        }
        for employee in self.employees {
            units.upsert_employee(employee);
        }
        for resource in self.resources {
            units.upsert_resource(resource);
        }

        Ok(Stores {
            profiles: Arc::new(profiles),
            users: Arc::new(users),
            units: Arc::new(units),
        })
    }
}

impl Stores {
    #[must_use]
    pub fn service(&self, config: &AccessScopeConfig) -> AccessScopeService {
        AccessScopeService::new(
            self.profiles.clone(),
            self.users.clone(),
            self.units.clone(),
            config,
        )
    }

    /// Current contents of all stores.
    #[must_use]
    pub fn snapshot(&self) -> Dataset {
        Dataset {
            profiles: self.profiles.all(),
            users: self
                .users
                .all()
                .into_iter()
                .map(|set| DatasetUser {
                    id: set.user_id,
                    profile: set.profile_id,
                    scope: set.entries,
                })
                .collect(),
            org_units: self.units.all_units(),
            employees: self.units.all_employees(),
            resources: self.units.all_resources(),
        }
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), DatasetError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DatasetError::Duplicate {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}
