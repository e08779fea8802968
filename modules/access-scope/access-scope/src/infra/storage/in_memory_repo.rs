//! In-memory repositories backing the access-scope stores.

use std::collections::{BTreeMap, HashMap};

use access_scope_sdk::{
    Candidate, CandidateFilter, CandidateKind, CompanyResource, CompanyResourceKind, Employee,
    EmployeeId, OrgUnit, OrgUnitId, OrgUnitKind, ProfileId, ScopeProfile, ScopeType, UserId,
    UserScopeSet,
};
use parking_lot::RwLock;

use crate::domain::repo::{
    OrgHierarchyRepository, ProfileRepository, RepoError, UserScopeRepository,
};

/// Profile store keyed by profile id.
///
/// Lookups hand out clones, so a caller never shares storage with the store.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<BTreeMap<ProfileId, ScopeProfile>>,
}

impl InMemoryProfileRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a profile. Administrative path, not used by the domain.
    pub fn upsert_profile(&self, profile: ScopeProfile) {
        self.profiles.write().insert(profile.id.clone(), profile);
    }

    #[must_use]
    pub fn all(&self) -> Vec<ScopeProfile> {
        self.profiles.read().values().cloned().collect()
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn find_profile(&self, id: &ProfileId) -> Result<Option<ScopeProfile>, RepoError> {
        Ok(self.profiles.read().get(id).cloned())
    }
}

/// User-scope store. A replace swaps the whole set under one write lock.
#[derive(Default)]
pub struct InMemoryUserScopeRepository {
    users: RwLock<HashMap<UserId, UserScopeSet>>,
}

impl InMemoryUserScopeRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a user record with an empty scope set; existing records are kept.
    pub fn insert_user(&self, user_id: UserId) {
        self.users
            .write()
            .entry(user_id.clone())
            .or_insert_with(|| UserScopeSet::empty(user_id));
    }

    /// All user scope sets ordered by user id.
    #[must_use]
    pub fn all(&self) -> Vec<UserScopeSet> {
        let mut all: Vec<_> = self.users.read().values().cloned().collect();
        all.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        all
    }
}

impl UserScopeRepository for InMemoryUserScopeRepository {
    fn find_user_scope(&self, user_id: &UserId) -> Result<Option<UserScopeSet>, RepoError> {
        Ok(self.users.read().get(user_id).cloned())
    }

    fn replace_user_scope(&self, scope: UserScopeSet) -> Result<(), RepoError> {
        let mut users = self.users.write();
        let slot = users
            .get_mut(&scope.user_id)
            .ok_or_else(|| RepoError::UnknownUser(scope.user_id.clone()))?;
        *slot = scope;
        Ok(())
    }
}

/// Org-hierarchy store: units, employees and company resources.
#[derive(Default)]
pub struct InMemoryOrgHierarchyRepository {
    units: RwLock<BTreeMap<OrgUnitId, OrgUnit>>,
    employees: RwLock<BTreeMap<EmployeeId, Employee>>,
    resources: RwLock<Vec<CompanyResource>>,
}

impl InMemoryOrgHierarchyRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_unit(&self, unit: OrgUnit) {
        self.units.write().insert(unit.id.clone(), unit);
    }

    pub fn upsert_employee(&self, employee: Employee) {
        self.employees.write().insert(employee.id.clone(), employee);
    }

    pub fn upsert_resource(&self, resource: CompanyResource) {
        let mut resources = self.resources.write();
        match resources
            .iter_mut()
            .find(|r| r.kind == resource.kind && r.id == resource.id)
        {
            Some(existing) => *existing = resource,
            None => resources.push(resource),
        }
    }

    #[must_use]
    pub fn all_units(&self) -> Vec<OrgUnit> {
        self.units.read().values().cloned().collect()
    }

    #[must_use]
    pub fn all_employees(&self) -> Vec<Employee> {
        self.employees.read().values().cloned().collect()
    }

    #[must_use]
    pub fn all_resources(&self) -> Vec<CompanyResource> {
        self.resources.read().clone()
    }

    fn has_resource(&self, kind: CompanyResourceKind, name: &str) -> bool {
        self.resources
            .read()
            .iter()
            .any(|r| r.kind == kind && r.id == name)
    }

    fn has_company(&self, company: &str) -> bool {
        self.units
            .read()
            .values()
            .any(|u| u.company.as_str() == company)
            || self
                .employees
                .read()
                .values()
                .any(|e| e.company.as_str() == company)
            || self
                .resources
                .read()
                .iter()
                .any(|r| r.company.as_str() == company)
    }
}

impl OrgHierarchyRepository for InMemoryOrgHierarchyRepository {
    fn find_unit(&self, id: &OrgUnitId) -> Result<Option<OrgUnit>, RepoError> {
        Ok(self.units.read().get(id).cloned())
    }

    fn units_of_kind(&self, kind: OrgUnitKind) -> Result<Vec<OrgUnit>, RepoError> {
        Ok(self
            .units
            .read()
            .values()
            .filter(|u| u.kind == kind)
            .cloned()
            .collect())
    }

    /// Types this store holds no records for (`ScopeType::Other`) never exist.
    fn scope_target_exists(&self, scope_type: &ScopeType, name: &str) -> Result<bool, RepoError> {
        let exists = match scope_type {
            ScopeType::Company => self.has_company(name),
            ScopeType::CostCenter => self.has_resource(CompanyResourceKind::CostCenter, name),
            ScopeType::Warehouse => self.has_resource(CompanyResourceKind::Warehouse, name),
            ScopeType::Other(_) => false,
            unit_type => {
                let kind = unit_type.org_unit_kind();
                self.units
                    .read()
                    .get(&OrgUnitId::from(name))
                    .is_some_and(|u| Some(u.kind) == kind)
            }
        };
        Ok(exists)
    }

    fn query_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>, RepoError> {
        if filter.is_deny_all() {
            return Ok(Vec::new());
        }
        let found = match filter.target {
            CandidateKind::Enterprise
            | CandidateKind::StrategicBusinessUnit
            | CandidateKind::FactoryBusinessUnit => self
                .units
                .read()
                .values()
                .filter(|u| filter.matches(*u))
                .cloned()
                .map(Candidate::Unit)
                .collect(),
            CandidateKind::Employee => self
                .employees
                .read()
                .values()
                .filter(|e| filter.matches(*e))
                .cloned()
                .map(Candidate::Employee)
                .collect(),
            CandidateKind::CostCenter | CandidateKind::Warehouse => self
                .resources
                .read()
                .iter()
                .filter(|r| filter.matches(*r))
                .cloned()
                .map(Candidate::Resource)
                .collect(),
        };
        Ok(found)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use access_scope_sdk::{EmployeeStatus, FieldPredicate, FilterField, ScopeEntry};

    #[test]
    fn profile_lookup_returns_a_copy() {
        let repo = InMemoryProfileRepository::new();
        repo.upsert_profile(ScopeProfile {
            id: ProfileId::from("Ops"),
            entries: vec![ScopeEntry::new("Warehouse", "WH-1", true, false)],
        });
        let mut copy = repo.find_profile(&ProfileId::from("Ops")).unwrap().unwrap();
        copy.entries.clear();
        let again = repo.find_profile(&ProfileId::from("Ops")).unwrap().unwrap();
        assert_eq!(again.entries.len(), 1);
    }

    #[test]
    fn replace_requires_existing_user() {
        let repo = InMemoryUserScopeRepository::new();
        let err = repo
            .replace_user_scope(UserScopeSet::empty(UserId::from("ghost")))
            .unwrap_err();
        assert_eq!(err, RepoError::UnknownUser(UserId::from("ghost")));
        assert!(repo.find_user_scope(&UserId::from("ghost")).unwrap().is_none());
    }

    #[test]
    fn insert_user_keeps_existing_entries() {
        let repo = InMemoryUserScopeRepository::new();
        let erin = UserId::from("erin");
        repo.insert_user(erin.clone());
        repo.replace_user_scope(UserScopeSet {
            user_id: erin.clone(),
            profile_id: None,
            entries: vec![ScopeEntry::new("Company", "ACME", true, true)],
        })
        .unwrap();
        repo.insert_user(erin.clone());
        assert_eq!(repo.find_user_scope(&erin).unwrap().unwrap().entries.len(), 1);
    }

    #[test]
    fn scope_targets_check_kind_and_company() {
        let repo = InMemoryOrgHierarchyRepository::new();
        repo.upsert_unit(OrgUnit::new("ENT-1", OrgUnitKind::Enterprise, "ACME"));
        repo.upsert_resource(CompanyResource {
            kind: CompanyResourceKind::Warehouse,
            id: "WH-1".to_owned(),
            company: "GLOBEX".into(),
        });

        let exists = |t: &str, n: &str| repo.scope_target_exists(&ScopeType::parse(t), n).unwrap();
        assert!(exists("Enterprise", "ENT-1"));
        assert!(!exists("Strategic Business Unit", "ENT-1"));
        assert!(exists("Warehouse", "WH-1"));
        assert!(!exists("Cost Center", "WH-1"));
        assert!(exists("Company", "GLOBEX"));
        assert!(!exists("Project", "ENT-1"));
    }

    #[test]
    fn query_candidates_executes_filter() {
        let repo = InMemoryOrgHierarchyRepository::new();
        for (id, company, status) in [
            ("EMP-1", "ACME", EmployeeStatus::Active),
            ("EMP-2", "ACME", EmployeeStatus::Inactive),
            ("EMP-3", "GLOBEX", EmployeeStatus::Active),
        ] {
            repo.upsert_employee(Employee {
                id: EmployeeId::from(id),
                company: company.into(),
                status,
            });
        }
        let filter = CandidateFilter::all_of(
            CandidateKind::Employee,
            vec![
                FieldPredicate::eq(FilterField::Status, "Active"),
                FieldPredicate::eq(FilterField::Company, "ACME"),
            ],
        );
        let ids: Vec<_> = repo
            .query_candidates(&filter)
            .unwrap()
            .iter()
            .map(|c| c.id().to_owned())
            .collect();
        assert_eq!(ids, vec!["EMP-1".to_owned()]);

        let none = repo
            .query_candidates(&CandidateFilter::deny_all(CandidateKind::Employee))
            .unwrap();
        assert!(none.is_empty());
    }
}
