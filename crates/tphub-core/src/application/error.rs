//! Application layer errors.
//!
//! These errors represent failures talking to the Remote Data Service, not
//! business rules. Form validation errors are `DomainError` from
//! `crate::domain`.

use std::fmt;

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A read against the remote service failed. `message` is the remote
    /// error text, verbatim.
    #[error("Failed to fetch templates: {message}")]
    Fetch { message: String },

    /// A single-template lookup returned no row.
    #[error("Template not found: {id}")]
    NotFound { id: String },

    /// One step of the admin write sequence failed. Earlier steps are not
    /// rolled back.
    #[error("Publishing failed during {step}: {message}")]
    Write { step: WriteStep, message: String },

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },
}

/// Steps of the admin write sequence, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStep {
    EditorLookup,
    InsertTemplate,
    UpsertTag { slug: String },
}

impl fmt::Display for WriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EditorLookup => f.write_str("editor lookup"),
            Self::InsertTemplate => f.write_str("template insert"),
            Self::UpsertTag { slug } => write!(f, "tag upsert '{slug}'"),
        }
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Fetch { message } => vec![
                format!("The template service reported: {}", message),
                "Check remote.url and remote.api_key in your configuration".into(),
                "Try again in a moment".into(),
            ],
            Self::NotFound { id } => vec![
                format!("No template with id '{}'", id),
                "Browse available templates: tphub list".into(),
            ],
            Self::Write { step, .. } => {
                let mut hints = vec![format!("Failed step: {}", step)];
                if matches!(step, WriteStep::UpsertTag { .. }) {
                    hints.push("The template itself was saved; tags are incomplete".into());
                } else {
                    hints.push("Nothing was saved; fix the issue and publish again".into());
                }
                if matches!(step, WriteStep::EditorLookup) {
                    hints.push("Or skip the lookup: --editor-key null".into());
                }
                hints
            }
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch { .. } | Self::Write { .. } => ErrorCategory::Remote,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AdapterNotConfigured { .. } => ErrorCategory::Configuration,
        }
    }
}
