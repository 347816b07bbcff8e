//! In-memory data service.
//!
//! Behaves like the hosted query API closely enough for demos and tests:
//! equality filters, ordering, limits, single-row reads, id/timestamp
//! assignment on insert and merge-on-conflict upserts. Column lists are not
//! projected; every read returns whole rows.
//!
//! Read-only relations derived from a table (like `template_details`) are
//! registered with [`InMemoryDataService::with_derived_view`] and receive a
//! projected copy of every row inserted into their source table.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tphub_core::application::ports::{DataService, Order, Query, RemoteError};
use tracing::{debug, trace};
use uuid::Uuid;

/// Projection from a stored source row to its derived-view row.
pub type ViewProjection = fn(&Value) -> Value;

#[derive(Clone)]
struct DerivedView {
    source: String,
    view: String,
    project: ViewProjection,
}

/// Thread-safe in-memory table store.
#[derive(Clone, Default)]
pub struct InMemoryDataService {
    tables: Arc<RwLock<HashMap<String, Vec<Value>>>>,
    views: Arc<Vec<DerivedView>>,
    failure: Arc<RwLock<Option<RemoteError>>>,
}

impl InMemoryDataService {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `tables`.
    pub fn with_tables(tables: HashMap<String, Vec<Value>>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
            views: Arc::default(),
            failure: Arc::default(),
        }
    }

    /// Keep `view` in step with inserts into `source`.
    pub fn with_derived_view(
        mut self,
        source: impl Into<String>,
        view: impl Into<String>,
        project: ViewProjection,
    ) -> Self {
        Arc::make_mut(&mut self.views).push(DerivedView {
            source: source.into(),
            view: view.into(),
            project,
        });
        self
    }

    /// Make every subsequent call fail with `err`; `None` heals the store.
    pub async fn fail_with(&self, err: Option<RemoteError>) {
        *self.failure.write().await = err;
    }

    /// Snapshot of one table.
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    async fn check_failure(&self) -> Result<(), RemoteError> {
        match self.failure.read().await.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataService for InMemoryDataService {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, RemoteError> {
        self.check_failure().await?;

        let tables = self.tables.read().await;
        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|f| row.get(&f.column).map(as_text) == Some(f.value.clone()))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, order)) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(column), b.get(column));
                match order {
                    Order::Ascending => ordering,
                    Order::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        if query.single && rows.len() != 1 {
            trace!(table = %query.table, matched = rows.len(), "Single-row read did not match one row");
            return Ok(Vec::new());
        }

        debug!(table = %query.table, rows = rows.len(), "In-memory select");
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, RemoteError> {
        self.check_failure().await?;

        let mut object = into_object(row)?;
        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        object
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let stored = Value::Object(object);
        let mut tables = self.tables.write().await;
        for view in self.views.iter().filter(|v| v.source == table) {
            let projected = (view.project)(&stored);
            tables.entry(view.view.clone()).or_default().push(projected);
            trace!(table, view = %view.view, "Derived view row added");
        }
        tables.entry(table.to_string()).or_default().push(stored.clone());

        debug!(table, "In-memory insert");
        Ok(vec![stored])
    }

    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        self.check_failure().await?;

        let incoming = into_object(row)?;
        let key = incoming.get(on_conflict).cloned().ok_or_else(|| {
            RemoteError::new(format!("there is no value for conflict column \"{on_conflict}\""))
                .with_status(400)
        })?;

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        if let Some(existing) = rows
            .iter_mut()
            .find(|row| row.get(on_conflict) == Some(&key))
        {
            if let Value::Object(fields) = existing {
                fields.extend(incoming);
            }
            debug!(table, on_conflict, "In-memory upsert merged");
            return Ok(vec![existing.clone()]);
        }

        let mut object = incoming;
        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        let stored = Value::Object(object);
        rows.push(stored.clone());

        debug!(table, on_conflict, "In-memory upsert inserted");
        Ok(vec![stored])
    }
}

fn into_object(row: Value) -> Result<Map<String, Value>, RemoteError> {
    match row {
        Value::Object(object) => Ok(object),
        other => Err(RemoteError::new(format!("expected a JSON object row, got {other}"))
            .with_status(400)),
    }
}

/// Column value as the filter operand would be written.
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Numbers numerically, everything else by its text form. Missing and
/// null values sort last.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => as_text(x).cmp(&as_text(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> InMemoryDataService {
        let mut tables = HashMap::new();
        tables.insert(
            "templates".to_string(),
            vec![
                json!({"id": 1, "title": "Old", "is_published": true, "created_at": "2024-01-01T00:00:00Z"}),
                json!({"id": 2, "title": "Draft", "is_published": false, "created_at": "2024-03-01T00:00:00Z"}),
                json!({"id": 3, "title": "New", "is_published": true, "created_at": "2024-02-01T00:00:00Z"}),
            ],
        );
        InMemoryDataService::with_tables(tables)
    }

    #[tokio::test]
    async fn select_filters_orders_and_limits() {
        let store = seeded();
        let query = Query::table("templates")
            .eq("is_published", true)
            .order("created_at", Order::Descending)
            .limit(5);

        let titles: Vec<_> = store
            .select(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|row| row["title"].clone())
            .collect();
        assert_eq!(titles, vec![json!("New"), json!("Old")]);
    }

    #[tokio::test]
    async fn numeric_ids_match_text_filters() {
        let rows = seeded()
            .select(&Query::table("templates").eq("id", 3).single())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], json!("New"));
    }

    #[tokio::test]
    async fn single_without_match_is_empty() {
        let rows = seeded()
            .select(&Query::table("templates").eq("id", 99).single())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unknown_table_reads_empty() {
        assert!(seeded().select(&Query::table("nope")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let store = InMemoryDataService::new();
        let stored = store
            .insert("templates", json!({"title": "Fresh"}))
            .await
            .unwrap();

        assert!(stored[0]["id"].is_string());
        assert!(stored[0]["created_at"].is_string());
        assert_eq!(store.rows("templates").await.len(), 1);
    }

    #[tokio::test]
    async fn derived_view_receives_projected_inserts() {
        fn shout(row: &Value) -> Value {
            json!({
                "id": row["id"].clone(),
                "title": row["title"].as_str().unwrap_or_default().to_uppercase(),
            })
        }

        let store = seeded().with_derived_view("templates", "loud", shout);
        store
            .insert("templates", json!({"id": 4, "title": "fresh"}))
            .await
            .unwrap();
        store.insert("tags", json!({"slug": "x"})).await.unwrap();

        let view = store.rows("loud").await;
        assert_eq!(view, vec![json!({"id": 4, "title": "FRESH"})]);
    }

    #[tokio::test]
    async fn upsert_merges_on_conflict_column() {
        let store = InMemoryDataService::new();
        store
            .upsert("tags", json!({"name": "Phonk", "slug": "phonk"}), "slug")
            .await
            .unwrap();
        store
            .upsert("tags", json!({"name": "phonk", "slug": "phonk"}), "slug")
            .await
            .unwrap();

        let rows = store.rows("tags").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("phonk"));
    }

    #[tokio::test]
    async fn injected_failure_applies_to_every_call() {
        let store = seeded();
        store
            .fail_with(Some(RemoteError::new("service unavailable")))
            .await;

        let err = store.select(&Query::table("templates")).await.unwrap_err();
        assert_eq!(err.message, "service unavailable");
        assert!(store.insert("templates", json!({})).await.is_err());

        store.fail_with(None).await;
        assert!(store.select(&Query::table("templates")).await.is_ok());
    }

    #[tokio::test]
    async fn non_object_rows_are_rejected() {
        let err = InMemoryDataService::new()
            .insert("templates", json!([1, 2]))
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(400));
    }
}
