//! Template Repository - the read side of the Remote Data Service.
//!
//! Builds the listing and detail queries and decodes rows into
//! [`Template`]s, substituting defaults for missing optional columns:
//!
//! | column             | default  |
//! |--------------------|----------|
//! | `editor`           | CapCut   |
//! | `duration_seconds` | 15       |
//! | `downloads_count`  | 0        |
//! | `likes_count`      | 0        |
//! | tags               | `[]`     |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{DataService, Order, Query, RemoteError},
    },
    domain::{DEFAULT_DURATION_SECONDS, Editor, Template, TemplateId},
};

/// Which relation the repository reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadSource {
    /// `templates` with the editor and tags embedded by the join select.
    #[default]
    Table,
    /// The precomputed `template_details` relation.
    DetailsView,
}

impl ReadSource {
    pub const fn relation(&self) -> &'static str {
        match self {
            Self::Table => "templates",
            Self::DetailsView => "template_details",
        }
    }

    pub const fn columns(&self) -> &'static str {
        match self {
            Self::Table => "*, editors(name), tags(name)",
            Self::DetailsView => "*",
        }
    }
}

/// Translates view needs into query-service calls.
#[derive(Clone)]
pub struct TemplateRepository {
    service: Arc<dyn DataService>,
    source: ReadSource,
}

impl TemplateRepository {
    pub fn new(service: Arc<dyn DataService>) -> Self {
        Self {
            service,
            source: ReadSource::default(),
        }
    }

    pub fn with_source(mut self, source: ReadSource) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> ReadSource {
        self.source
    }

    /// Shared handle to the underlying data service.
    pub fn service(&self) -> Arc<dyn DataService> {
        Arc::clone(&self.service)
    }

    /// Published templates, newest first.
    #[instrument(skip(self), fields(relation = self.source.relation()))]
    pub async fn list_published(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<Template>, ApplicationError> {
        let mut query = Query::table(self.source.relation())
            .select(self.source.columns())
            .eq("is_published", true)
            .order("created_at", Order::Descending);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = self.service.select(&query).await.map_err(fetch_error)?;
        debug!(rows = rows.len(), "Fetched published templates");

        rows.into_iter().map(decode_row).collect()
    }

    /// Exactly one template by id.
    #[instrument(skip(self), fields(template_id = %id))]
    pub async fn get(&self, id: &TemplateId) -> Result<Template, ApplicationError> {
        let query = Query::table(self.source.relation())
            .select(self.source.columns())
            .eq("id", id)
            .single();

        let rows = self.service.select(&query).await.map_err(fetch_error)?;

        match rows.into_iter().next() {
            Some(row) => decode_row(row),
            None => Err(ApplicationError::NotFound { id: id.to_string() }),
        }
    }
}

fn fetch_error(err: RemoteError) -> ApplicationError {
    warn!(error = %err, code = ?err.code, "Template fetch failed");
    ApplicationError::Fetch {
        message: err.message,
    }
}

// ── Row decoding ─────────────────────────────────────────────────────────────

/// Wire shape shared by both read sources. Everything except `id` and
/// `title` may be absent.
#[derive(Debug, Deserialize)]
struct TemplateRow {
    id: RowId,
    title: String,
    slug: Option<String>,
    description: Option<String>,
    thumbnail_url: Option<String>,
    video_preview_url: Option<String>,
    capcut_url: Option<String>,
    editor: Option<String>,
    /// `template_details` flattens the editor join into this column.
    editor_name: Option<String>,
    /// Embedded `editors(name)`: an object, or an array for to-many joins.
    editors: Option<Value>,
    duration_seconds: Option<i64>,
    downloads_count: Option<i64>,
    likes_count: Option<i64>,
    is_published: Option<bool>,
    is_featured: Option<bool>,
    created_at: Option<String>,
    /// Embedded `tags(name)`.
    tags: Option<Vec<TagEntry>>,
    /// `template_details` aggregate; may contain nulls from an outer join.
    tag_names: Option<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowId {
    Number(i64),
    Text(String),
}

impl RowId {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagEntry {
    Name(String),
    Row { name: Option<String> },
}

fn decode_row(row: Value) -> Result<Template, ApplicationError> {
    let row: TemplateRow = serde_json::from_value(row).map_err(malformed)?;

    let editor_label = joined_editor_name(&row);
    let editor = resolve_editor(row.editor.as_deref(), editor_label.as_deref());

    let id = TemplateId::parse(&row.id.into_string()).map_err(malformed)?;

    let tags = match (row.tags, row.tag_names) {
        (Some(entries), _) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                TagEntry::Name(name) => Some(name),
                TagEntry::Row { name } => name,
            })
            .collect(),
        (None, Some(names)) => names.into_iter().flatten().collect(),
        (None, None) => Vec::new(),
    };

    let template = Template {
        id,
        title: row.title,
        slug: row.slug,
        description: row.description.filter(|d| !d.trim().is_empty()),
        thumbnail_url: row.thumbnail_url.unwrap_or_default(),
        preview_video_url: row.video_preview_url,
        editor_url: row.capcut_url,
        editor,
        editor_label,
        duration_seconds: row
            .duration_seconds
            .map(|d| d.clamp(0, i64::from(u32::MAX)) as u32)
            .unwrap_or(DEFAULT_DURATION_SECONDS),
        downloads: non_negative(row.downloads_count),
        likes: non_negative(row.likes_count),
        is_published: row.is_published.unwrap_or(false),
        is_featured: row.is_featured.unwrap_or(false),
        created_at: row
            .created_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc)),
        tags,
    };
    template.validate().map_err(malformed)?;
    Ok(template)
}

fn malformed(err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Fetch {
        message: format!("malformed template row: {err}"),
    }
}

/// Editor name from the join, unless a tag column decides the editor.
fn joined_editor_name(row: &TemplateRow) -> Option<String> {
    if row.editor.is_some() {
        return None;
    }
    if let Some(name) = row.editor_name.as_deref() {
        return Some(name.to_string());
    }
    let object = match row.editors.as_ref()? {
        Value::Array(items) => items.first()?,
        other => other,
    };
    object.get("name")?.as_str().map(String::from)
}

/// Tag column first, then the joined editor name.
fn resolve_editor(tag: Option<&str>, joined: Option<&str>) -> Editor {
    if tag.is_some() {
        return Editor::resolve(tag);
    }

    joined
        .and_then(|name| {
            Editor::ALL
                .into_iter()
                .find(|e| e.metadata().display_name.eq_ignore_ascii_case(name))
                .or_else(|| Editor::from_tag(name))
        })
        .unwrap_or_default()
}

fn non_negative(count: Option<i64>) -> u64 {
    count.map(|c| c.max(0) as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDataService;
    use serde_json::json;

    fn repository(mock: MockDataService) -> TemplateRepository {
        TemplateRepository::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn listing_query_filters_orders_and_limits() {
        let mut mock = MockDataService::new();
        mock.expect_select()
            .withf(|q: &Query| {
                q.table == "templates"
                    && q.columns == "*, editors(name), tags(name)"
                    && q.filters.len() == 1
                    && q.filters[0].column == "is_published"
                    && q.filters[0].value == "true"
                    && q.order == Some(("created_at".into(), Order::Descending))
                    && q.limit == Some(6)
                    && !q.single
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let templates = repository(mock).list_published(Some(6)).await.unwrap();
        assert!(templates.is_empty());
    }

    #[tokio::test]
    async fn details_view_source_reads_flat_relation() {
        let mut mock = MockDataService::new();
        mock.expect_select()
            .withf(|q: &Query| q.table == "template_details" && q.columns == "*")
            .returning(|_| {
                Ok(vec![json!({
                    "id": 3,
                    "title": "Logo Animation",
                    "editor_name": "After Effects",
                    "tag_names": ["logo", null, "reveal"],
                })])
            });

        let repo = repository(mock).with_source(ReadSource::DetailsView);
        let templates = repo.list_published(None).await.unwrap();
        assert_eq!(templates[0].id.as_str(), "3");
        assert_eq!(templates[0].editor, Editor::AfterEffects);
        assert_eq!(templates[0].tags, vec!["logo", "reveal"]);
    }

    #[tokio::test]
    async fn missing_optional_fields_take_defaults() {
        let mut mock = MockDataService::new();
        mock.expect_select()
            .returning(|_| Ok(vec![json!({"id": "a1", "title": "Bare"})]));

        let template = repository(mock)
            .get(&TemplateId::new("a1"))
            .await
            .unwrap();
        assert_eq!(template.editor, Editor::CapCut);
        assert_eq!(template.duration_seconds, 15);
        assert_eq!(template.downloads, 0);
        assert_eq!(template.likes, 0);
        assert!(template.tags.is_empty());
        assert!(template.description.is_none());
    }

    #[tokio::test]
    async fn embedded_joins_are_flattened() {
        let mut mock = MockDataService::new();
        mock.expect_select().returning(|_| {
            Ok(vec![json!({
                "id": "t1",
                "title": "Story Pack",
                "editors": {"name": "VN Video Editor"},
                "tags": [{"name": "story"}, {"name": "instagram"}],
                "downloads_count": 8330,
                "likes_count": -4,
                "created_at": "2024-05-01T12:00:00.123456+00:00",
            })])
        });

        let templates = repository(mock).list_published(None).await.unwrap();
        let t = &templates[0];
        assert_eq!(t.editor, Editor::Vn);
        assert_eq!(t.tags, vec!["story", "instagram"]);
        assert_eq!(t.downloads, 8330);
        assert_eq!(t.likes, 0);
        assert!(t.created_at.is_some());
    }

    #[tokio::test]
    async fn editor_tag_column_wins_over_join() {
        let mut mock = MockDataService::new();
        mock.expect_select().returning(|_| {
            Ok(vec![json!({
                "id": "t1",
                "title": "Intro",
                "editor": "premiere",
                "editors": {"name": "After Effects"},
            })])
        });

        let templates = repository(mock).list_published(None).await.unwrap();
        assert_eq!(templates[0].editor, Editor::CapCut);
        assert_eq!(templates[0].summary().editor_name, "CapCut");
    }

    #[tokio::test]
    async fn unmapped_joined_editor_keeps_its_label() {
        let mut mock = MockDataService::new();
        mock.expect_select().returning(|_| {
            Ok(vec![json!({
                "id": 3,
                "title": "YouTube Intro Template",
                "editors": {"name": "Premiere Pro"},
            })])
        });

        let templates = repository(mock).list_published(None).await.unwrap();
        let card = templates[0].summary();
        assert_eq!(card.editor, Editor::CapCut);
        assert_eq!(card.editor_name, "Premiere Pro");
        assert_eq!(templates[0].editor_metadata().cta_label, "Edit in CapCut");
    }

    #[tokio::test]
    async fn untitled_row_is_a_fetch_error() {
        let mut mock = MockDataService::new();
        mock.expect_select()
            .returning(|_| Ok(vec![json!({"id": 9, "title": "   "})]));

        let err = repository(mock).list_published(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Fetch { message } if message.contains("has no title")));
    }

    #[tokio::test]
    async fn detail_query_is_single_by_id() {
        let mut mock = MockDataService::new();
        mock.expect_select()
            .withf(|q: &Query| {
                q.single && q.filters.len() == 1 && q.filters[0].column == "id" && q.filters[0].value == "42"
            })
            .returning(|_| Ok(vec![]));

        let err = repository(mock)
            .get(&TemplateId::new("42"))
            .await
            .unwrap_err();
        assert_eq!(err, ApplicationError::NotFound { id: "42".into() });
    }

    #[tokio::test]
    async fn remote_errors_keep_their_message() {
        let mut mock = MockDataService::new();
        mock.expect_select()
            .returning(|_| Err(RemoteError::new("JWT expired").with_status(401)));

        let err = repository(mock).list_published(None).await.unwrap_err();
        assert_eq!(
            err,
            ApplicationError::Fetch {
                message: "JWT expired".into()
            }
        );
    }

    #[tokio::test]
    async fn undecodable_row_is_a_fetch_error() {
        let mut mock = MockDataService::new();
        mock.expect_select()
            .returning(|_| Ok(vec![json!({"title": "no id"})]));

        let err = repository(mock).list_published(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Fetch { message } if message.contains("malformed")));
    }
}
