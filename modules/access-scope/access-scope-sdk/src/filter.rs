//! Declarative filter descriptors.
//!
//! A [`CandidateFilter`] describes which records are valid choices for a
//! dependent selection field. It is handed to a data source, which executes
//! it; [`CandidateFilter::matches`] evaluates it in memory.
//!
//! A [`RecordFilter`] describes which transaction documents a user may see.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{
    CompanyResource, CompanyResourceKind, Employee, OrgUnit, OrgUnitId, OrgUnitKind,
    normalize_label,
};

/// Kind of record a candidate filter selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Enterprise,
    StrategicBusinessUnit,
    FactoryBusinessUnit,
    Employee,
    CostCenter,
    Warehouse,
}

impl CandidateKind {
    /// Candidate kind of an org unit; liaison offices are never offered as choices.
    #[must_use]
    pub fn for_unit(kind: OrgUnitKind) -> Option<Self> {
        match kind {
            OrgUnitKind::Enterprise => Some(Self::Enterprise),
            OrgUnitKind::StrategicBusinessUnit => Some(Self::StrategicBusinessUnit),
            OrgUnitKind::FactoryBusinessUnit => Some(Self::FactoryBusinessUnit),
            OrgUnitKind::LiaisonOffice => None,
        }
    }
}

/// Record property a predicate compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Company,
    Enterprise,
    Status,
}

impl FilterField {
    /// Key under which the selected value is looked up in the constraint mapping.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Enterprise => "enterprise",
            Self::Status => "status",
        }
    }
}

/// Equality predicate: `field = value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPredicate {
    pub field: FilterField,
    pub value: String,
}

impl FieldPredicate {
    #[must_use]
    pub fn eq(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Constraint part of a candidate filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Constraint {
    /// No record qualifies (a required ancestor is unselected).
    DenyAll,
    /// A record qualifies if ALL predicates hold.
    AllOf { predicates: Vec<FieldPredicate> },
}

/// Filter descriptor for one dependent field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilter {
    pub target: CandidateKind,
    pub constraint: Constraint,
}

impl CandidateFilter {
    #[must_use]
    pub fn deny_all(target: CandidateKind) -> Self {
        Self {
            target,
            constraint: Constraint::DenyAll,
        }
    }

    #[must_use]
    pub fn all_of(target: CandidateKind, predicates: Vec<FieldPredicate>) -> Self {
        Self {
            target,
            constraint: Constraint::AllOf { predicates },
        }
    }

    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        matches!(self.constraint, Constraint::DenyAll)
    }

    /// Evaluates the filter against one record.
    ///
    /// A record of another kind never matches; a record missing a
    /// constrained property never matches.
    #[must_use]
    pub fn matches(&self, record: &dyn FilterSubject) -> bool {
        if record.candidate_kind() != Some(self.target) {
            return false;
        }
        match &self.constraint {
            Constraint::DenyAll => false,
            Constraint::AllOf { predicates } => predicates
                .iter()
                .all(|p| record.field_value(p.field) == Some(p.value.as_str())),
        }
    }
}

/// A record a [`CandidateFilter`] can be evaluated against.
pub trait FilterSubject {
    fn candidate_kind(&self) -> Option<CandidateKind>;
    fn field_value(&self, field: FilterField) -> Option<&str>;
}

impl FilterSubject for OrgUnit {
    fn candidate_kind(&self) -> Option<CandidateKind> {
        CandidateKind::for_unit(self.kind)
    }

    fn field_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Company => Some(self.company.as_str()),
            FilterField::Enterprise => self.enterprise.as_ref().map(OrgUnitId::as_str),
            FilterField::Status => None,
        }
    }
}

impl FilterSubject for Employee {
    fn candidate_kind(&self) -> Option<CandidateKind> {
        Some(CandidateKind::Employee)
    }

    fn field_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Company => Some(self.company.as_str()),
            FilterField::Status => Some(self.status.label()),
            FilterField::Enterprise => None,
        }
    }
}

impl FilterSubject for CompanyResource {
    fn candidate_kind(&self) -> Option<CandidateKind> {
        Some(match self.kind {
            CompanyResourceKind::CostCenter => CandidateKind::CostCenter,
            CompanyResourceKind::Warehouse => CandidateKind::Warehouse,
        })
    }

    fn field_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Company => Some(self.company.as_str()),
            FilterField::Enterprise | FilterField::Status => None,
        }
    }
}

/// A record returned by executing a candidate filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Candidate {
    Unit(OrgUnit),
    Employee(Employee),
    Resource(CompanyResource),
}

impl Candidate {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Unit(u) => u.id.as_str(),
            Self::Employee(e) => e.id.as_str(),
            Self::Resource(r) => &r.id,
        }
    }
}

/// A selection field whose valid choices depend on previously selected fields.
///
/// Addressed as `"<Form>.<field>"`, e.g. `"FactoryBusinessUnit.enterprise"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependentField {
    ParentEnterprise,
    FactoryParentEnterprise,
    FactoryHead,
    SbuHead,
    LiaisonHead,
    FactoryEnterprise,
    FactorySbu,
    FactoryCostCenter,
    FactoryWarehouse,
    SbuEnterprise,
    SbuFactory,
    SbuCostCenter,
}

impl DependentField {
    pub const ALL: [Self; 12] = [
        Self::ParentEnterprise,
        Self::FactoryParentEnterprise,
        Self::FactoryHead,
        Self::SbuHead,
        Self::LiaisonHead,
        Self::FactoryEnterprise,
        Self::FactorySbu,
        Self::FactoryCostCenter,
        Self::FactoryWarehouse,
        Self::SbuEnterprise,
        Self::SbuFactory,
        Self::SbuCostCenter,
    ];

    /// Form the field lives on.
    #[must_use]
    pub fn form(self) -> OrgUnitKind {
        match self {
            Self::ParentEnterprise => OrgUnitKind::Enterprise,
            Self::FactoryParentEnterprise
            | Self::FactoryHead
            | Self::FactoryEnterprise
            | Self::FactorySbu
            | Self::FactoryCostCenter
            | Self::FactoryWarehouse => OrgUnitKind::FactoryBusinessUnit,
            Self::SbuHead | Self::SbuEnterprise | Self::SbuFactory | Self::SbuCostCenter => {
                OrgUnitKind::StrategicBusinessUnit
            }
            Self::LiaisonHead => OrgUnitKind::LiaisonOffice,
        }
    }

    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::ParentEnterprise | Self::FactoryParentEnterprise => "parent_enterprise",
            Self::FactoryHead => "factory_head",
            Self::SbuHead => "sbu_head",
            Self::LiaisonHead => "liaison_head",
            Self::FactoryEnterprise | Self::SbuEnterprise => "enterprise",
            Self::FactorySbu => "sbu",
            Self::FactoryCostCenter | Self::SbuCostCenter => "cost_center",
            Self::FactoryWarehouse => "warehouse",
            Self::SbuFactory => "factory",
        }
    }

    /// Kind of record offered as a choice.
    #[must_use]
    pub fn target(self) -> CandidateKind {
        match self {
            Self::ParentEnterprise
            | Self::FactoryParentEnterprise
            | Self::FactoryEnterprise
            | Self::SbuEnterprise => CandidateKind::Enterprise,
            Self::FactoryHead | Self::SbuHead | Self::LiaisonHead => CandidateKind::Employee,
            Self::FactorySbu => CandidateKind::StrategicBusinessUnit,
            Self::SbuFactory => CandidateKind::FactoryBusinessUnit,
            Self::FactoryCostCenter | Self::SbuCostCenter => CandidateKind::CostCenter,
            Self::FactoryWarehouse => CandidateKind::Warehouse,
        }
    }

    /// Ancestor fields that must be selected before any choice is valid.
    #[must_use]
    pub fn required_ancestors(self) -> &'static [FilterField] {
        match self {
            Self::FactorySbu => &[FilterField::Enterprise],
            Self::SbuFactory => &[FilterField::Company, FilterField::Enterprise],
            _ => &[FilterField::Company],
        }
    }

    /// Fixed predicates that do not depend on the selection.
    #[must_use]
    pub fn fixed_predicates(self) -> Vec<FieldPredicate> {
        match self.target() {
            CandidateKind::Employee => vec![FieldPredicate::eq(FilterField::Status, "Active")],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for DependentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = match self.form() {
            OrgUnitKind::Enterprise => "Enterprise",
            OrgUnitKind::StrategicBusinessUnit => "StrategicBusinessUnit",
            OrgUnitKind::FactoryBusinessUnit => "FactoryBusinessUnit",
            OrgUnitKind::LiaisonOffice => "LiaisonOffice",
        };
        write!(f, "{form}.{}", self.field_name())
    }
}

/// Returned when a dependent field name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dependent field '{0}'")]
pub struct UnknownDependentField(pub String);

impl FromStr for DependentField {
    type Err = UnknownDependentField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownDependentField(s.to_owned());
        let (form, field) = s.rsplit_once('.').ok_or_else(unknown)?;
        let form = OrgUnitKind::parse(form).ok_or_else(unknown)?;
        let field = normalize_label(field);
        Self::ALL
            .into_iter()
            .find(|d| d.form() == form && normalize_label(d.field_name()) == field)
            .ok_or_else(unknown)
    }
}

/// Transaction document kinds subject to row-level cost-center filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    PurchaseOrder,
    SalesInvoice,
    PurchaseInvoice,
    SalesOrder,
    DeliveryNote,
    PurchaseReceipt,
    JournalEntry,
}

impl DocumentKind {
    pub const ALL: [Self; 7] = [
        Self::PurchaseOrder,
        Self::SalesInvoice,
        Self::PurchaseInvoice,
        Self::SalesOrder,
        Self::DeliveryNote,
        Self::PurchaseReceipt,
        Self::JournalEntry,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PurchaseOrder => "Purchase Order",
            Self::SalesInvoice => "Sales Invoice",
            Self::PurchaseInvoice => "Purchase Invoice",
            Self::SalesOrder => "Sales Order",
            Self::DeliveryNote => "Delivery Note",
            Self::PurchaseReceipt => "Purchase Receipt",
            Self::JournalEntry => "Journal Entry",
        }
    }

    /// Document field the row filter applies to.
    pub const FILTER_FIELD: &'static str = "cost_center";

    /// Child table holding the cost centers of documents filtered per line.
    ///
    /// A journal entry carries a cost center on each account line rather
    /// than on its header.
    #[must_use]
    pub fn line_table(self) -> Option<&'static str> {
        match self {
            Self::JournalEntry => Some("Journal Entry Account"),
            Self::PurchaseOrder
            | Self::SalesInvoice
            | Self::PurchaseInvoice
            | Self::SalesOrder
            | Self::DeliveryNote
            | Self::PurchaseReceipt => None,
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|k| normalize_label(k.label()) == wanted)
            .ok_or_else(|| format!("unknown document kind '{s}'"))
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row-level filter over transaction documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum RecordFilter {
    /// Privileged caller: no filtering.
    Unrestricted,
    /// No grants: nothing is visible.
    DenyAll,
    /// Only documents whose cost center is in the (sorted, deduplicated) set.
    CostCenterIn { cost_centers: Vec<String> },
    /// Only documents with at least one line in `line_table` whose cost
    /// center is in the set.
    AnyLineCostCenterIn {
        line_table: String,
        cost_centers: Vec<String>,
    },
}

impl RecordFilter {
    /// Checks a document filtered on its header cost center.
    #[must_use]
    pub fn allows(&self, cost_center: Option<&str>) -> bool {
        self.allows_any(cost_center)
    }

    /// Checks a document by the cost centers of its lines; one allowed line
    /// is enough.
    #[must_use]
    pub fn allows_any<'a>(&self, cost_centers: impl IntoIterator<Item = &'a str>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::DenyAll => false,
            Self::CostCenterIn {
                cost_centers: allowed,
            }
            | Self::AnyLineCostCenterIn {
                cost_centers: allowed,
                ..
            } => cost_centers
                .into_iter()
                .any(|cc| allowed.iter().any(|c| c == cc)),
        }
    }
}
