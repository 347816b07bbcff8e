//! HTTP adapter for the hosted table-query API (PostgREST dialect).
//!
//! | call              | request                                                        |
//! |-------------------|----------------------------------------------------------------|
//! | `select`          | `GET /rest/v1/{table}?select=..&col=eq.v&order=col.desc&limit=n` |
//! | `select` (single) | same, plus `Accept: application/vnd.pgrst.object+json`         |
//! | `insert`          | `POST /rest/v1/{table}`, `Prefer: return=representation`       |
//! | `upsert`          | `POST /rest/v1/{table}?on_conflict=col`, merge-duplicates      |
//!
//! Every request carries the project key twice: as `apikey` and as a bearer
//! token. No timeout is applied unless one is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use tphub_core::application::ports::{DataService, Order, Query, RemoteError};
use tracing::{debug, info, instrument, warn};

use crate::error::AdapterError;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Error code for a `single()` read that matched no row.
pub const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Debug, Clone)]
pub struct PostgrestClient {
    http: Client,
    rest_url: String,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, AdapterError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(AdapterError::InvalidUrl {
                url: base_url,
                reason: "expected an http(s) URL",
            });
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AdapterError::MissingApiKey { url: base_url });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        info!(base_url = %base_url, timeout = ?timeout, "Remote data service client initialized");

        Ok(Self {
            http,
            rest_url: format!("{base_url}/rest/v1"),
            api_key,
        })
    }

    /// Query-string pairs for a read, in wire order.
    pub fn query_params(query: &Query) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), query.columns.clone())];

        for filter in &query.filters {
            params.push((filter.column.clone(), format!("eq.{}", filter.value)));
        }

        if let Some((column, order)) = &query.order {
            let direction = match order {
                Order::Ascending => "asc",
                Order::Descending => "desc",
            };
            params.push(("order".to_string(), format!("{column}.{direction}")));
        }

        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl DataService for PostgrestClient {
    #[instrument(skip(self, query), fields(table = %query.table, single = query.single))]
    async fn select(&self, query: &Query) -> Result<Vec<Value>, RemoteError> {
        let mut request = self
            .request(Method::GET, &query.table)
            .query(&Self::query_params(query));
        if query.single {
            request = request.header(header::ACCEPT, SINGLE_OBJECT);
        }

        let response = request.send().await.map_err(transport_error)?;
        match read_rows(response).await {
            Err(err) if query.single && err.code.as_deref() == Some(NO_ROWS_CODE) => {
                debug!("Single-row read matched nothing");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    #[instrument(skip(self, row))]
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, RemoteError> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&row)
            .send()
            .await
            .map_err(transport_error)?;

        read_rows(response).await
    }

    #[instrument(skip(self, row))]
    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        let response = self
            .request(Method::POST, table)
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", MERGE_DUPLICATES)
            .json(&row)
            .send()
            .await
            .map_err(transport_error)?;

        read_rows(response).await
    }
}

// ── Response handling ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<Value>,
    hint: Option<Value>,
}

async fn read_rows(response: Response) -> Result<Vec<Value>, RemoteError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }

    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(&body).map_err(|e| {
        RemoteError::new(format!("invalid response body: {e}")).with_status(status.as_u16())
    })?;

    Ok(match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        row => vec![row],
    })
}

fn error_from_body(status: StatusCode, body: &str) -> RemoteError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let message = parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| match body.trim() {
            "" => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            text => text.to_string(),
        });

    if parsed.code.as_deref() != Some(NO_ROWS_CODE) {
        warn!(
            status = status.as_u16(),
            code = ?parsed.code,
            details = ?parsed.details,
            hint = ?parsed.hint,
            "Remote data service returned an error"
        );
    }

    let err = RemoteError::new(message).with_status(status.as_u16());
    match parsed.code {
        Some(code) => err.with_code(code),
        None => err,
    }
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    warn!(error = %err, "Request to remote data service failed");
    if err.is_timeout() {
        return RemoteError::new("request timed out");
    }
    RemoteError::new(err.to_string())
}
