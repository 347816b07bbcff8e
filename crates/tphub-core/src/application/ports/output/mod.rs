//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `tphub-adapters` crate provides the data-service implementations;
//! the CLI provides the media and link ports.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::error::HubResult;

// ── Query ────────────────────────────────────────────────────────────────────

/// Sort direction for [`Query::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// An equality filter, value already rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

/// A read against one relation, built fluently.
///
/// ```rust
/// use tphub_core::application::ports::{Order, Query};
///
/// let query = Query::table("templates")
///     .select("*, editors(name)")
///     .eq("is_published", true)
///     .order("created_at", Order::Descending)
///     .limit(12);
/// assert_eq!(query.limit, Some(12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<(String, Order)>,
    pub limit: Option<usize>,
    /// Expect at most one row.
    pub single: bool,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".into(),
            filters: Vec::new(),
            order: None,
            limit: None,
            single: false,
        }
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.to_string(),
        });
        self
    }

    pub fn order(mut self, column: impl Into<String>, order: Order) -> Self {
        self.order = Some((column.into(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }
}

// ── RemoteError ──────────────────────────────────────────────────────────────

/// Error object returned by the remote service. `message` is
/// human-readable and is surfaced to users unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
    pub code: Option<String>,
    pub status: Option<u16>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            status: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

// ── Ports ────────────────────────────────────────────────────────────────────

/// Port for the hosted table-query API.
///
/// Implemented by:
/// - `tphub_adapters::postgrest::PostgrestClient` (production)
/// - `tphub_adapters::memory::InMemoryDataService` (demo/testing)
///
/// ## Design Notes
///
/// - Rows are plain JSON objects; mapping lives in `TemplateRepository`
/// - A `single()` query that matches nothing returns an empty vector
/// - No method retries or times out on its own
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataService: Send + Sync {
    /// Run a read query.
    async fn select(&self, query: &Query) -> Result<Vec<Value>, RemoteError>;

    /// Insert one row and return the stored representation.
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, RemoteError>;

    /// Insert or merge one row keyed by `on_conflict`.
    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, RemoteError>;
}

/// Port for the preview video element.
#[cfg_attr(test, mockall::automock)]
pub trait MediaElement: Send {
    /// Start playback. Callers do not recover from a failure here.
    fn play(&mut self) -> HubResult<()>;

    /// Pause playback.
    fn pause(&mut self);
}

/// Port for opening external links in a new browsing context.
#[cfg_attr(test, mockall::automock)]
pub trait LinkOpener: Send + Sync {
    fn open_in_new_context(&self, url: &str) -> HubResult<()>;
}
