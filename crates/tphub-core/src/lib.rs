//! Template Hub Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Template Hub
//! marketplace, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            tphub-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ListingView, DetailView, AdminForm)   │
//! │   TemplateRepository maps remote rows   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (DataService, MediaElement, LinkOpener) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     tphub-adapters (Infrastructure)     │
//! │ (PostgrestClient, InMemoryDataService)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Template, Editor, Slug, TemplateDraft)│
//! │         No I/O, no async                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tphub_core::application::{ListingView, TemplateRepository};
//!
//! # async fn demo(service: Arc<dyn tphub_core::application::ports::DataService>) {
//! let repository = TemplateRepository::new(service);
//! let view = ListingView::new(repository).with_limit(12);
//! let state = view.refresh().await;
//! println!("{state}");
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AdminForm, DetailCard, DetailState, DetailView, EditorKeyPolicy, ListingHandle, ListingState,
        ListingView, ReadSource, SubmitReceipt, TemplateRepository,
        ports::{DataService, LinkOpener, MediaElement, Order, Query, RemoteError},
    };
    pub use crate::domain::{
        Editor, EditorMetadata, Slug, Template, TemplateDraft, TemplateId, TemplateSummary,
        Treatment, format_duration, generate_slug, resolve_editor_metadata,
    };
    pub use crate::error::{HubError, HubResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
