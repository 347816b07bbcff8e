//! Application services - orchestrate use cases.
//!
//! [`TemplateRepository`] turns view needs into remote queries. The three
//! views sit on top of it (reads) or next to it (the admin write path).

pub mod admin;
pub mod detail;
pub mod listing;
pub mod template_repository;

pub use admin::{AdminForm, DEFAULT_EDITOR_SLUG, EditorKeyPolicy, SubmitReceipt};
pub use detail::{DetailCard, DetailState, DetailView};
pub use listing::{DEFAULT_POLL_INTERVAL, ListingHandle, ListingState, ListingView};
pub use template_repository::{ReadSource, TemplateRepository};
