//! Error handling for the Template Hub CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use tphub_adapters::AdapterError;
use tphub_core::error::HubError;

// Re-export so callers only need `use crate::error::*`.
pub use tphub_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (missing flags, bad values).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote service client could not be constructed.
    #[error("Cannot connect to the template service: {0}")]
    Adapter(#[from] AdapterError),

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `tphub-core`.
    #[error("{0}")]
    Core(#[from] HubError),

    /// The detail view landed in its not-found state.
    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Inspect the active values: tphub config list".into(),
                "Create a default config: tphub init".into(),
            ],

            Self::Adapter(AdapterError::MissingApiKey { .. }) => vec![
                "Set remote.api_key in your config file".into(),
                "Or export TPHUB_REMOTE__API_KEY".into(),
            ],

            Self::Adapter(_) => vec![
                "Check remote.url in your config file".into(),
                "Unset remote.url to browse the built-in demo catalog".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::TemplateNotFound { id } => vec![
                format!("No template with id '{}' could be loaded", id),
                "Back to the listing: tphub list".into(),
            ],

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "Nothing was published".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Adapter(_) => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Remote => ErrorCategory::Remote,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::UserError,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Remote        |  1   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Remote | ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));

        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    /// Whether running the same command again might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Core(core_err) if core_err.is_retryable())
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Remote => tracing::error!(
                retryable = self.is_retryable(),
                "Remote service error: {}",
                self
            ),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// The remote service rejected or failed a request.
    Remote,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, HubError> {
    /// Core errors already carry their own context.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}
