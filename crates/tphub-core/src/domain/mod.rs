// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Template Hub.
//!
//! This module contains pure business logic: no I/O, no async, no remote
//! calls. Everything that talks to the Remote Data Service goes through the
//! ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: Templates are read-only once fetched
//! - **Total mappings**: Editor resolution never fails
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    draft::{
        DRAFT_DEFAULT_DURATION, DRAFT_MAX_DURATION, DRAFT_MIN_DURATION, DraftField,
        NewTemplateRow, TagRow, TemplateDraft,
    },
    template::{DEFAULT_DURATION_SECONDS, Template, TemplateId, TemplateSummary},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{
    Editor, EditorMetadata, Slug, Treatment, format_count, format_duration, generate_slug,
    parse_tags, resolve_editor_metadata,
};
