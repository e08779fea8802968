//! User-facing notices derived from operation outcomes.

use serde::{Deserialize, Serialize};

use crate::error::AccessScopeError;
use crate::models::ApplyOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Short message suitable for showing to the person who triggered an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    /// True when repeating the same request may succeed.
    #[serde(default)]
    pub retryable: bool,
}

impl Notice {
    fn new(severity: Severity, title: &str, message: String) -> Self {
        Self {
            severity,
            title: title.to_owned(),
            message,
            retryable: false,
        }
    }
}

impl From<&ApplyOutcome> for Notice {
    fn from(outcome: &ApplyOutcome) -> Self {
        match outcome {
            ApplyOutcome::Applied { entries } => Notice::new(
                Severity::Info,
                "Access Scope Updated",
                format!("{entries} access scope entries copied from the selected profile."),
            ),
            ApplyOutcome::Empty => Notice::new(
                Severity::Warning,
                "No Data",
                "No access scope data found for the selected profile.".to_owned(),
            ),
        }
    }
}

impl From<&AccessScopeError> for Notice {
    fn from(err: &AccessScopeError) -> Self {
        match err {
            AccessScopeError::NotFound { kind, id } => Notice::new(
                Severity::Error,
                "Not Found",
                format!("The {kind} '{id}' does not exist."),
            ),
            AccessScopeError::Validation { message } => {
                Notice::new(Severity::Error, "Invalid Request", message.clone())
            }
            AccessScopeError::StoreFailure { .. } => Notice {
                retryable: true,
                ..Notice::new(
                    Severity::Error,
                    "Error",
                    "Failed to load access scope profile. Please try again.".to_owned(),
                )
            },
        }
    }
}
