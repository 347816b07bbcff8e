//! Unified error handling for Template Hub Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Template Hub Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HubError {
    /// Errors from the domain layer (form validation, bad input).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (remote reads and writes).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl HubError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Template Hub".into(),
                "Please report this issue at: https://github.com/cosecruz/tphub/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    ///
    /// Remote reads and writes may succeed on a second attempt; nothing in
    /// this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::Fetch { .. })
                | Self::Application(ApplicationError::Write { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Remote,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type HubResult<T> = Result<T, HubError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> HubResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> HubResult<T> {
        self.map_err(|e| HubError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::WriteStep;

    #[test]
    fn fetch_errors_are_retryable() {
        let err: HubError = ApplicationError::Fetch {
            message: "connection reset".into(),
        }
        .into();
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Remote);
    }

    #[test]
    fn not_found_is_terminal() {
        let err: HubError = ApplicationError::NotFound { id: "42".into() }.into();
        assert!(!err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn write_error_keeps_remote_message() {
        let err: HubError = ApplicationError::Write {
            step: WriteStep::InsertTemplate,
            message: "duplicate key value".into(),
        }
        .into();
        assert!(err.to_string().contains("duplicate key value"));
    }

    #[test]
    fn validation_errors_map_to_validation_category() {
        let err: HubError = DomainError::MissingRequiredField { field: "title" }.into();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = result.context("reading rows").unwrap_err();
        assert!(matches!(err, HubError::Internal { ref message } if message.contains("boom")));
    }
}
