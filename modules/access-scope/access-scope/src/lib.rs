//! Access Scope Module Implementation
//!
//! Resolves scope profiles, copies them into user scope sets, and answers
//! org-hierarchy questions (dependent-field candidates, grants, row filters).
//! The public API is defined in `access-scope-sdk` and re-exported here.
//!
//! ## Architecture
//!
//! - **Synchronous domain**: every component is a request-scoped computation over
//!   externally owned stores
//! - **Per-user serialization**: apply/clear calls for one user never interleave
//! - **Local client**: in-process consumers use [`AccessScopeLocalClient`] through
//!   [`AccessScopeClient`]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === PUBLIC API (from SDK) ===
pub use access_scope_sdk::{
    AccessScopeClient, AccessScopeError, ApplyOutcome, CandidateFilter, DocumentKind, GrantSet,
    Notice, ProfileId, RecordFilter, ScopeEntry, ScopeProfile, UserId, UserScopeSet,
};

// === CONFIGURATION ===
pub mod config;
pub use config::AccessScopeConfig;

// === INTERNAL MODULES ===
pub mod domain;
pub mod infra;

pub use domain::hierarchy::HierarchyViolation;
pub use domain::local_client::AccessScopeLocalClient;
pub use domain::service::AccessScopeService;
pub use infra::dataset::{Dataset, DatasetError, DatasetUser, Stores};
