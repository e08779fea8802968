//! Declarative candidate filters for dependent selection fields.

use std::collections::BTreeMap;

use access_scope_sdk::{CandidateFilter, DependentField, FieldPredicate};
use tracing::debug;

use super::error::DomainError;

/// Builds [`CandidateFilter`]s from already-selected ancestor values.
///
/// Stateless. It never queries a store; executing the descriptor is the
/// caller's job.
pub struct HierarchyFilterResolver;

impl HierarchyFilterResolver {
    /// Parses a `"<Form>.<field>"` name and builds its filter.
    ///
    /// # Errors
    ///
    /// `UnknownField` if the name does not denote a dependent field.
    pub fn candidates_for(
        field: &str,
        constraints: &BTreeMap<String, String>,
    ) -> Result<CandidateFilter, DomainError> {
        let parsed: DependentField = field.parse().map_err(|_| DomainError::UnknownField {
            name: field.to_owned(),
        })?;
        Ok(Self::candidates(parsed, constraints))
    }

    /// Filter for one dependent field.
    ///
    /// Every required ancestor must be present and non-blank in `constraints`;
    /// otherwise the filter is deny-all, never "everything".
    #[must_use]
    pub fn candidates(
        field: DependentField,
        constraints: &BTreeMap<String, String>,
    ) -> CandidateFilter {
        let target = field.target();
        let mut predicates = field.fixed_predicates();

        for ancestor in field.required_ancestors() {
            match constraints
                .get(ancestor.key())
                .map(String::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
            {
                Some(value) => predicates.push(FieldPredicate::eq(*ancestor, value)),
                None => {
                    debug!(%field, missing = ancestor.key(), "required ancestor unset");
                    return CandidateFilter::deny_all(target);
                }
            }
        }

        CandidateFilter::all_of(target, predicates)
    }
}
