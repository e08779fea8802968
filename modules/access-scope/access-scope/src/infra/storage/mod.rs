//! Storage implementations for the access-scope module.

mod in_memory_repo;

pub use in_memory_repo::{
    InMemoryOrgHierarchyRepository, InMemoryProfileRepository, InMemoryUserScopeRepository,
};
