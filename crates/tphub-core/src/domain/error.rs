// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the admin form keeps the last error for redisplay)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Form Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} expects a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} '{value}' has no letters or digits to build a slug from")]
    NoSlug { field: &'static str, value: String },

    #[error("Unknown form field: '{0}'")]
    UnknownField(String),

    #[error("Unknown editor: '{0}'")]
    UnknownEditor(String),

    // ========================================================================
    // Record Invariants
    // ========================================================================
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("'{}' is required", field),
                "Fill in every required field and submit again".into(),
            ],
            Self::OutOfRange { field, min, max, .. } => vec![format!(
                "Choose a {} between {} and {}",
                field, min, max
            )],
            Self::InvalidNumber { field, .. } => {
                vec![format!("Enter {} as a whole number of seconds", field)]
            }
            Self::NoSlug { field, .. } => vec![
                format!("Include at least one ASCII letter or digit in each {}", field),
                "Slugs keep only a-z and 0-9, so emoji-only names collide".into(),
            ],
            Self::UnknownField(_) => vec![
                "Known fields: title, description, thumbnail_url, video_url, editor_url, duration, tags, editor".into(),
            ],
            Self::UnknownEditor(_) => vec![
                "Supported editors:".into(),
                "  • capcut       - CapCut".into(),
                "  • vn           - VN Video Editor".into(),
                "  • aftereffects - After Effects".into(),
            ],
            Self::InvalidTemplate(msg) => vec![
                format!("Template record rejected: {}", msg),
                "Check the remote row for missing columns".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTemplate(_) => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
