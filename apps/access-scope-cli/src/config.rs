//! Layered configuration: defaults -> YAML file -> `APP__*` environment.

use std::path::Path;

use access_scope::{AccessScopeConfig, Dataset};
use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when neither `-v` nor `RUST_LOG` is given.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub access_scope: AccessScopeConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads the effective configuration.
    ///
    /// `APP__ACCESS_SCOPE__MAX_HIERARCHY_DEPTH=8` overrides
    /// `access_scope.max_hierarchy_depth`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("APP__").split("__"));

        figment
            .extract()
            .context("failed to load access-scope configuration")
    }
}

/// Reads a dataset file. JSON is accepted as well since it is valid YAML.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.is_file() {
        bail!("dataset file does not exist: {}", path.display());
    }
    Figment::from(Yaml::file(path))
        .extract()
        .with_context(|| format!("invalid dataset {}", path.display()))
}
