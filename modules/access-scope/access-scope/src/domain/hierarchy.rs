//! Read-side traversal and consistency checks of the org hierarchy.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use access_scope_sdk::{CompanyId, OrgUnit, OrgUnitId, OrgUnitKind};
use serde::Serialize;
use tracing::warn;

use super::error::DomainError;
use super::repo::OrgHierarchyRepository;

/// A consistency problem found on one org unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum HierarchyViolation {
    SelfParent,
    ParentMissing {
        parent: OrgUnitId,
    },
    ParentInactive {
        parent: OrgUnitId,
    },
    ParentNotGroup {
        parent: OrgUnitId,
    },
    ParentCompanyMismatch {
        parent: OrgUnitId,
        expected: CompanyId,
        found: CompanyId,
    },
    LinkMissing {
        link: &'static str,
        target: OrgUnitId,
    },
    EnterpriseCompanyMismatch {
        enterprise: OrgUnitId,
        expected: CompanyId,
        found: CompanyId,
    },
    FactoryCompanyMismatch {
        factory: OrgUnitId,
    },
    FactoryEnterpriseMismatch {
        factory: OrgUnitId,
    },
    SbuEnterpriseMismatch {
        sbu: OrgUnitId,
    },
    Cycle {
        at: OrgUnitId,
    },
}

impl fmt::Display for HierarchyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfParent => f.write_str("unit is its own parent"),
            Self::ParentMissing { parent } => write!(f, "parent '{parent}' does not exist"),
            Self::ParentInactive { parent } => write!(f, "parent '{parent}' is inactive"),
            Self::ParentNotGroup { parent } => write!(f, "parent '{parent}' is not a group"),
            Self::ParentCompanyMismatch {
                parent,
                expected,
                found,
            } => write!(
                f,
                "company '{found}' differs from parent '{parent}' company '{expected}'"
            ),
            Self::LinkMissing { link, target } => {
                write!(f, "{link} '{target}' does not exist")
            }
            Self::EnterpriseCompanyMismatch {
                enterprise,
                expected,
                found,
            } => write!(
                f,
                "company '{found}' differs from enterprise '{enterprise}' company '{expected}'"
            ),
            Self::FactoryCompanyMismatch { factory } => {
                write!(f, "factory '{factory}' belongs to another company")
            }
            Self::FactoryEnterpriseMismatch { factory } => {
                write!(f, "factory '{factory}' belongs to another enterprise")
            }
            Self::SbuEnterpriseMismatch { sbu } => {
                write!(f, "SBU '{sbu}' belongs to another enterprise")
            }
            Self::Cycle { at } => write!(f, "parent chain loops back at '{at}'"),
        }
    }
}

/// Walks parent chains and reports broken relationships. Never writes.
#[derive(Clone)]
pub struct HierarchyInspector {
    units: Arc<dyn OrgHierarchyRepository>,
    max_depth: usize,
}

impl HierarchyInspector {
    #[must_use]
    pub fn new(units: Arc<dyn OrgHierarchyRepository>, max_depth: usize) -> Self {
        Self { units, max_depth }
    }

    /// Ancestors of a unit, direct parent first.
    ///
    /// # Errors
    ///
    /// `OrgUnitNotFound` for the unit or a dangling parent link,
    /// `HierarchyCycle` if an id repeats or the chain exceeds the depth limit.
    pub fn ancestors(&self, unit_id: &OrgUnitId) -> Result<Vec<OrgUnit>, DomainError> {
        let unit = self.require(unit_id)?;
        let mut seen = HashSet::from([unit.id.clone()]);
        let mut chain = Vec::new();
        let mut next = unit.parent;

        while let Some(parent_id) = next {
            if !seen.insert(parent_id.clone()) || chain.len() >= self.max_depth {
                warn!(start = %unit_id, at = %parent_id, "org hierarchy cycle");
                return Err(DomainError::HierarchyCycle {
                    start: unit_id.clone(),
                    at: parent_id,
                });
            }
            let parent = self.require(&parent_id)?;
            next = parent.parent.clone();
            chain.push(parent);
        }

        Ok(chain)
    }

    /// Lists every consistency violation of one unit.
    ///
    /// # Errors
    ///
    /// `OrgUnitNotFound` if the unit itself does not exist, `Store` on store failure.
    pub fn inspect(&self, unit_id: &OrgUnitId) -> Result<Vec<HierarchyViolation>, DomainError> {
        let unit = self.require(unit_id)?;
        let mut violations = Vec::new();

        if let Some(parent_id) = &unit.parent {
            if parent_id == &unit.id {
                violations.push(HierarchyViolation::SelfParent);
            } else {
                self.check_parent(&unit, parent_id, &mut violations)?;
                match self.ancestors(&unit.id) {
                    Ok(_) | Err(DomainError::OrgUnitNotFound { .. }) => {}
                    Err(DomainError::HierarchyCycle { at, .. }) => {
                        violations.push(HierarchyViolation::Cycle { at });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        if let Some(enterprise_id) = &unit.enterprise {
            match self.units.find_unit(enterprise_id)? {
                None => violations.push(HierarchyViolation::LinkMissing {
                    link: "enterprise",
                    target: enterprise_id.clone(),
                }),
                Some(ent) if ent.company != unit.company => {
                    violations.push(HierarchyViolation::EnterpriseCompanyMismatch {
                        enterprise: ent.id,
                        expected: ent.company,
                        found: unit.company.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        match unit.kind {
            OrgUnitKind::StrategicBusinessUnit => {
                if let Some(factory_id) = &unit.factory {
                    match self.units.find_unit(factory_id)? {
                        None => violations.push(HierarchyViolation::LinkMissing {
                            link: "factory",
                            target: factory_id.clone(),
                        }),
                        Some(factory) => {
                            if factory.company != unit.company {
                                violations.push(HierarchyViolation::FactoryCompanyMismatch {
                                    factory: factory.id.clone(),
                                });
                            }
                            if enterprises_differ(&unit, &factory) {
                                violations.push(HierarchyViolation::FactoryEnterpriseMismatch {
                                    factory: factory.id,
                                });
                            }
                        }
                    }
                }
            }
            OrgUnitKind::FactoryBusinessUnit => {
                if let Some(sbu_id) = &unit.sbu {
                    match self.units.find_unit(sbu_id)? {
                        None => violations.push(HierarchyViolation::LinkMissing {
                            link: "sbu",
                            target: sbu_id.clone(),
                        }),
                        Some(sbu) if enterprises_differ(&unit, &sbu) => {
                            violations
                                .push(HierarchyViolation::SbuEnterpriseMismatch { sbu: sbu.id });
                        }
                        Some(_) => {}
                    }
                }
            }
            OrgUnitKind::Enterprise | OrgUnitKind::LiaisonOffice => {}
        }

        Ok(violations)
    }

    fn check_parent(
        &self,
        unit: &OrgUnit,
        parent_id: &OrgUnitId,
        violations: &mut Vec<HierarchyViolation>,
    ) -> Result<(), DomainError> {
        let Some(parent) = self.units.find_unit(parent_id)? else {
            violations.push(HierarchyViolation::ParentMissing {
                parent: parent_id.clone(),
            });
            return Ok(());
        };

        if !parent.is_active {
            violations.push(HierarchyViolation::ParentInactive {
                parent: parent.id.clone(),
            });
        }
        if unit.kind == OrgUnitKind::Enterprise && !parent.is_group {
            violations.push(HierarchyViolation::ParentNotGroup {
                parent: parent.id.clone(),
            });
        }
        if parent.company != unit.company {
            violations.push(HierarchyViolation::ParentCompanyMismatch {
                parent: parent.id,
                expected: parent.company,
                found: unit.company.clone(),
            });
        }
        Ok(())
    }

    fn require(&self, id: &OrgUnitId) -> Result<OrgUnit, DomainError> {
        self.units
            .find_unit(id)?
            .ok_or_else(|| DomainError::org_unit_not_found(id))
    }
}

/// Both enterprise links are set and point at different units.
fn enterprises_differ(a: &OrgUnit, b: &OrgUnit) -> bool {
    matches!((&a.enterprise, &b.enterprise), (Some(x), Some(y)) if x != y)
}
