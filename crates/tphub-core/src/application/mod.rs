//! Application layer for Template Hub.
//!
//! This layer contains:
//! - **Services**: the repository adapter and the three views
//!   (ListingView, DetailView, AdminForm)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    AdminForm, DEFAULT_EDITOR_SLUG, DEFAULT_POLL_INTERVAL, DetailCard, DetailState, DetailView,
    EditorKeyPolicy, ListingHandle, ListingState, ListingView, ReadSource, SubmitReceipt,
    TemplateRepository,
};

// Re-export port traits (for adapter implementation)
pub use ports::{DataService, LinkOpener, MediaElement, Order, Query, RemoteError};

pub use error::{ApplicationError, WriteStep};
