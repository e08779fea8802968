#![allow(dead_code)]

use access_scope::{AccessScopeConfig, AccessScopeService, Dataset, DatasetUser, Stores};
use access_scope_sdk::{
    CompanyResource, CompanyResourceKind, Employee, EmployeeId, EmployeeStatus, OrgUnit,
    OrgUnitKind, ProfileId, ScopeEntry, ScopeProfile, UserId,
};

pub fn profile(id: &str, entries: Vec<ScopeEntry>) -> ScopeProfile {
    ScopeProfile {
        id: ProfileId::from(id),
        entries,
    }
}

pub fn user(id: &str, scope: Vec<ScopeEntry>) -> DatasetUser {
    DatasetUser {
        id: UserId::from(id),
        profile: None,
        scope,
    }
}

/// Two companies, one small hierarchy each, a few profiles and users.
pub fn dataset() -> Dataset {
    Dataset {
        profiles: vec![
            profile(
                "Finance-ReadOnly",
                vec![ScopeEntry::new("CostCenter", "CC-100", true, false)],
            ),
            profile("Empty", vec![]),
            profile(
                "Plant-Ops",
                vec![
                    ScopeEntry::new("Strategic Business Unit", "SBU-1", true, true),
                    ScopeEntry::new("Warehouse", "WH-1", true, false),
                ],
            ),
            profile(
                "Regional",
                vec![
                    ScopeEntry::new("Enterprise", "ENT-1", true, false),
                    ScopeEntry::new("Enterprise", "ENT-1", true, true),
                    ScopeEntry::new("Factory Business Unit", "FBU-9", true, false),
                ],
            ),
        ],
        users: vec![
            user("alice", vec![]),
            user(
                "bob",
                vec![ScopeEntry::new("Company", "ACME", true, true)],
            ),
            user(
                "carol",
                vec![
                    ScopeEntry::new("Enterprise", "ENT-1", true, false),
                    ScopeEntry::new("Warehouse", "WH-1", false, true),
                ],
            ),
        ],
        org_units: vec![
            OrgUnit::new("ENT-ROOT", OrgUnitKind::Enterprise, "ACME").group(),
            OrgUnit::new("ENT-1", OrgUnitKind::Enterprise, "ACME").with_parent("ENT-ROOT"),
            OrgUnit::new("ENT-G", OrgUnitKind::Enterprise, "GLOBEX"),
            OrgUnit::new("SBU-1", OrgUnitKind::StrategicBusinessUnit, "ACME")
                .with_enterprise("ENT-1")
                .with_cost_center("CC-SBU1"),
            OrgUnit::new("FBU-1", OrgUnitKind::FactoryBusinessUnit, "ACME")
                .with_enterprise("ENT-1")
                .with_sbu("SBU-1")
                .with_cost_center("CC-FBU1"),
            OrgUnit::new("FBU-2", OrgUnitKind::FactoryBusinessUnit, "ACME")
                .with_enterprise("ENT-1")
                .with_sbu("SBU-1")
                .with_cost_center("CC-FBU2")
                .inactive(),
        ],
        employees: vec![
            Employee {
                id: EmployeeId::from("EMP-1"),
                company: "ACME".into(),
                status: EmployeeStatus::Active,
            },
            Employee {
                id: EmployeeId::from("EMP-2"),
                company: "ACME".into(),
                status: EmployeeStatus::Left,
            },
            Employee {
                id: EmployeeId::from("EMP-3"),
                company: "GLOBEX".into(),
                status: EmployeeStatus::Active,
            },
        ],
        resources: vec![
            CompanyResource {
                kind: CompanyResourceKind::CostCenter,
                id: "CC-100".to_owned(),
                company: "ACME".into(),
            },
            CompanyResource {
                kind: CompanyResourceKind::Warehouse,
                id: "WH-1".to_owned(),
                company: "ACME".into(),
            },
        ],
    }
}

pub fn stores() -> Stores {
    dataset().into_stores().expect("sample dataset is valid")
}

pub fn service_with(config: &AccessScopeConfig) -> (Stores, AccessScopeService) {
    let stores = stores();
    let service = stores.service(config);
    (stores, service)
}

pub fn service() -> (Stores, AccessScopeService) {
    service_with(&AccessScopeConfig::default())
}
