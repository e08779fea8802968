//! Public models for the access-scope module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the access-scope module and its consumers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the identifier is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`ScopeProfile`].
    ProfileId
);
string_id!(
    /// Identifier of a user record.
    UserId
);
string_id!(
    /// Identifier of an organizational unit (Enterprise, SBU, Factory, Liaison Office).
    OrgUnitId
);
string_id!(
    /// Identifier of the company (tenant) every org unit belongs to.
    CompanyId
);
string_id!(
    /// Identifier of an employee record.
    EmployeeId
);

/// Lowercases and strips everything but ASCII alphanumerics, so that
/// `"Cost Center"`, `"CostCenter"` and `"cost_center"` compare equal.
pub(crate) fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Category of resource a scope entry grants access to.
///
/// Known categories are parsed case- and separator-insensitively;
/// anything else is preserved verbatim in [`ScopeType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScopeType {
    Company,
    Enterprise,
    StrategicBusinessUnit,
    FactoryBusinessUnit,
    LiaisonOffice,
    CostCenter,
    Warehouse,
    Other(String),
}

impl ScopeType {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "company" => Self::Company,
            "enterprise" => Self::Enterprise,
            "strategicbusinessunit" | "sbu" => Self::StrategicBusinessUnit,
            "factorybusinessunit" | "factory" => Self::FactoryBusinessUnit,
            "liaisonoffice" => Self::LiaisonOffice,
            "costcenter" => Self::CostCenter,
            "warehouse" => Self::Warehouse,
            _ => Self::Other(raw.trim().to_owned()),
        }
    }

    /// Display label, e.g. `"Strategic Business Unit"`.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Company => "Company",
            Self::Enterprise => "Enterprise",
            Self::StrategicBusinessUnit => "Strategic Business Unit",
            Self::FactoryBusinessUnit => "Factory Business Unit",
            Self::LiaisonOffice => "Liaison Office",
            Self::CostCenter => "Cost Center",
            Self::Warehouse => "Warehouse",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Other(raw) if raw.trim().is_empty())
    }

    /// The org-unit kind this scope type refers to, if it is one of the hierarchy levels.
    #[must_use]
    pub fn org_unit_kind(&self) -> Option<OrgUnitKind> {
        match self {
            Self::Enterprise => Some(OrgUnitKind::Enterprise),
            Self::StrategicBusinessUnit => Some(OrgUnitKind::StrategicBusinessUnit),
            Self::FactoryBusinessUnit => Some(OrgUnitKind::FactoryBusinessUnit),
            Self::LiaisonOffice => Some(OrgUnitKind::LiaisonOffice),
            _ => None,
        }
    }
}

impl From<String> for ScopeType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ScopeType> for String {
    fn from(value: ScopeType) -> Self {
        match value {
            ScopeType::Other(raw) => raw,
            known => known.label().to_owned(),
        }
    }
}

impl From<&str> for ScopeType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<OrgUnitKind> for ScopeType {
    fn from(kind: OrgUnitKind) -> Self {
        match kind {
            OrgUnitKind::Enterprise => Self::Enterprise,
            OrgUnitKind::StrategicBusinessUnit => Self::StrategicBusinessUnit,
            OrgUnitKind::FactoryBusinessUnit => Self::FactoryBusinessUnit,
            OrgUnitKind::LiaisonOffice => Self::LiaisonOffice,
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One (scope type, scope name, read, write) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeEntry {
    pub scope_type: ScopeType,
    pub scope_name: String,
    #[serde(default, alias = "read")]
    pub can_read: bool,
    #[serde(default, alias = "write")]
    pub can_write: bool,
    /// Marks the user's default value for this scope type.
    #[serde(default)]
    pub is_primary: bool,
}

impl ScopeEntry {
    #[must_use]
    pub fn new(
        scope_type: impl Into<ScopeType>,
        scope_name: impl Into<String>,
        can_read: bool,
        can_write: bool,
    ) -> Self {
        Self {
            scope_type: scope_type.into(),
            scope_name: scope_name.into(),
            can_read,
            can_write,
            is_primary: false,
        }
    }

    #[must_use]
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Identity of the scoped resource, ignoring permission flags.
    #[must_use]
    pub fn key(&self) -> (&ScopeType, &str) {
        (&self.scope_type, self.scope_name.as_str())
    }

    /// True when either the type or the name is missing.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.scope_type.is_blank() || self.scope_name.trim().is_empty()
    }
}

/// A named, reusable template of scope entries.
///
/// Users reference a profile; applying it copies the entries into the
/// user's own [`UserScopeSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeProfile {
    pub id: ProfileId,
    #[serde(default)]
    pub entries: Vec<ScopeEntry>,
}

/// The access-scope list owned by one user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserScopeSet {
    pub user_id: UserId,
    /// Profile the entries were last copied from; `None` after a clear.
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
    #[serde(default)]
    pub entries: Vec<ScopeEntry>,
}

impl UserScopeSet {
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            profile_id: None,
            entries: Vec::new(),
        }
    }

    /// Entries with duplicate (type, name) pairs collapsed; the last entry
    /// in stored order wins and keeps the position of its first occurrence.
    #[must_use]
    pub fn effective_entries(&self) -> Vec<ScopeEntry> {
        let mut out: Vec<ScopeEntry> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if let Some(existing) = out.iter_mut().find(|e| e.key() == entry.key()) {
                existing.clone_from(entry);
            } else {
                out.push(entry.clone());
            }
        }
        out
    }

    /// Effective entry for one scoped resource, if any.
    #[must_use]
    pub fn lookup(&self, scope_type: &ScopeType, scope_name: &str) -> Option<&ScopeEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| &e.scope_type == scope_type && e.scope_name == scope_name)
    }
}

/// Successful result of applying a profile to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The user's set now holds `entries` entries copied from the profile.
    Applied { entries: usize },
    /// The profile resolved to zero entries; the user's set is now empty.
    Empty,
}

impl ApplyOutcome {
    #[must_use]
    pub fn for_entries(entries: usize) -> Self {
        if entries == 0 {
            Self::Empty
        } else {
            Self::Applied { entries }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Level of the organizational hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrgUnitKind {
    Enterprise,
    StrategicBusinessUnit,
    FactoryBusinessUnit,
    LiaisonOffice,
}

impl OrgUnitKind {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match ScopeType::parse(raw) {
            ScopeType::Enterprise => Some(Self::Enterprise),
            ScopeType::StrategicBusinessUnit => Some(Self::StrategicBusinessUnit),
            ScopeType::FactoryBusinessUnit => Some(Self::FactoryBusinessUnit),
            ScopeType::LiaisonOffice => Some(Self::LiaisonOffice),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Enterprise => "Enterprise",
            Self::StrategicBusinessUnit => "Strategic Business Unit",
            Self::FactoryBusinessUnit => "Factory Business Unit",
            Self::LiaisonOffice => "Liaison Office",
        }
    }

    /// Enterprises and SBUs form trees through their `parent` link.
    #[must_use]
    pub fn is_self_referential(self) -> bool {
        matches!(self, Self::Enterprise | Self::StrategicBusinessUnit)
    }
}

impl fmt::Display for OrgUnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const fn default_true() -> bool {
    true
}

/// A node of the organizational hierarchy.
///
/// `parent` is a back-reference, not ownership. `enterprise`, `sbu` and
/// `factory` are cross-links used by some kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnit {
    pub id: OrgUnitId,
    pub kind: OrgUnitKind,
    pub company: CompanyId,
    #[serde(default)]
    pub parent: Option<OrgUnitId>,
    #[serde(default)]
    pub enterprise: Option<OrgUnitId>,
    #[serde(default)]
    pub sbu: Option<OrgUnitId>,
    #[serde(default)]
    pub factory: Option<OrgUnitId>,
    #[serde(default)]
    pub cost_center: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_group: bool,
}

impl OrgUnit {
    #[must_use]
    pub fn new(id: impl Into<OrgUnitId>, kind: OrgUnitKind, company: impl Into<CompanyId>) -> Self {
        Self {
            id: id.into(),
            kind,
            company: company.into(),
            parent: None,
            enterprise: None,
            sbu: None,
            factory: None,
            cost_center: None,
            is_active: true,
            is_group: false,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<OrgUnitId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_enterprise(mut self, enterprise: impl Into<OrgUnitId>) -> Self {
        self.enterprise = Some(enterprise.into());
        self
    }

    #[must_use]
    pub fn with_sbu(mut self, sbu: impl Into<OrgUnitId>) -> Self {
        self.sbu = Some(sbu.into());
        self
    }

    #[must_use]
    pub fn with_factory(mut self, factory: impl Into<OrgUnitId>) -> Self {
        self.factory = Some(factory.into());
        self
    }

    #[must_use]
    pub fn with_cost_center(mut self, cost_center: impl Into<String>) -> Self {
        self.cost_center = Some(cost_center.into());
        self
    }

    #[must_use]
    pub fn group(mut self) -> Self {
        self.is_group = true;
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    Left,
}

impl EmployeeStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Suspended => "Suspended",
            Self::Left => "Left",
        }
    }
}

/// Employee record, used as the candidate pool for head-of-unit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub company: CompanyId,
    #[serde(default)]
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyResourceKind {
    CostCenter,
    Warehouse,
}

/// A company-owned accounting or stock resource (cost center, warehouse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyResource {
    pub kind: CompanyResourceKind,
    pub id: String,
    pub company: CompanyId,
}

/// Where a permission grant came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum GrantOrigin {
    /// Copied from an entry of the user's scope set.
    Explicit,
    /// Added by hierarchical expansion of another grant.
    Derived {
        from_type: ScopeType,
        from_name: String,
    },
}

/// An effective permission derived from a user's scope set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub scope_type: ScopeType,
    pub scope_name: String,
    pub can_read: bool,
    pub can_write: bool,
    /// Copied from [`ScopeEntry::is_primary`]; always `false` for derived grants.
    pub is_default: bool,
    #[serde(flatten)]
    pub origin: GrantOrigin,
}

/// Grants materialized for one user, plus entries that could not be granted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrantSet {
    pub grants: Vec<PermissionGrant>,
    /// Entries whose target does not exist in the hierarchy store.
    pub skipped: Vec<ScopeEntry>,
}

impl GrantSet {
    /// Names of granted resources of one type, in grant order.
    #[must_use]
    pub fn names_of(&self, scope_type: &ScopeType) -> Vec<&str> {
        self.grants
            .iter()
            .filter(|g| &g.scope_type == scope_type)
            .map(|g| g.scope_name.as_str())
            .collect()
    }
}
