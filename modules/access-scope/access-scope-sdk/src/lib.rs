#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Access Scope SDK
//!
//! This crate provides the public API for the `access-scope` module:
//!
//! - [`AccessScopeClient`] - Public API trait for consumers
//! - [`ScopeProfile`], [`ScopeEntry`], [`UserScopeSet`] - Scope models
//! - [`OrgUnit`], [`Employee`], [`CompanyResource`] - Org-hierarchy models (read-only here)
//! - [`CandidateFilter`], [`RecordFilter`] - Declarative filter descriptors
//! - [`AccessScopeError`] - Error types
//! - [`Notice`] - User-facing rendering of outcomes and errors

pub mod api;
pub mod error;
pub mod filter;
pub mod models;
pub mod notice;

pub use api::AccessScopeClient;
pub use error::AccessScopeError;
pub use filter::{
    Candidate, CandidateFilter, CandidateKind, Constraint, DependentField, DocumentKind,
    FieldPredicate, FilterField, FilterSubject, RecordFilter, UnknownDependentField,
};
pub use models::{
    ApplyOutcome, CompanyId, CompanyResource, CompanyResourceKind, Employee, EmployeeId,
    EmployeeStatus, GrantOrigin, GrantSet, OrgUnit, OrgUnitId, OrgUnitKind, PermissionGrant,
    ProfileId, ScopeEntry, ScopeProfile, ScopeType, UserId, UserScopeSet,
};
pub use notice::{Notice, Severity};
