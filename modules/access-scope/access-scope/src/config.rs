//! Configuration for the access-scope module.

use serde::{Deserialize, Serialize};

/// Module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessScopeConfig {
    /// Upper bound on parent-chain length when walking the org hierarchy.
    /// Longer chains are reported as cycles.
    pub max_hierarchy_depth: usize,

    /// When `true`, an SBU grant also grants its active factories and an
    /// Enterprise grant also grants its active SBUs (and their factories).
    pub expand_hierarchical_grants: bool,

    /// Roles that bypass row-level filtering of transaction documents.
    pub privileged_roles: Vec<String>,

    /// When `true`, scope entries pointing at missing records are skipped
    /// during grant materialization; when `false` they are rejected.
    pub skip_missing_scope_targets: bool,
}

impl Default for AccessScopeConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: 64,
            expand_hierarchical_grants: false,
            privileged_roles: vec!["System Manager".to_owned()],
            skip_missing_scope_targets: true,
        }
    }
}

impl AccessScopeConfig {
    #[must_use]
    pub fn is_privileged(&self, roles: &[String]) -> bool {
        roles.iter().any(|r| self.privileged_roles.contains(r))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: AccessScopeConfig =
            serde_json::from_str(r#"{"expand_hierarchical_grants": true}"#).unwrap();
        assert!(cfg.expand_hierarchical_grants);
        assert_eq!(cfg.max_hierarchy_depth, 64);
        assert!(cfg.is_privileged(&["System Manager".to_owned()]));
        assert!(!cfg.is_privileged(&["Accounts User".to_owned()]));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_str::<AccessScopeConfig>(r#"{"max_depth": 3}"#);
        assert!(res.is_err());
    }
}
