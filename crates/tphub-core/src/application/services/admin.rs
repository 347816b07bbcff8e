//! Admin form: collects a draft and publishes it.
//!
//! Publishing is three dependent remote writes issued in order:
//!
//! 1. resolve the editor foreign key (or skip, per [`EditorKeyPolicy`])
//! 2. insert the `templates` row
//! 3. upsert each tag into `tags`, keyed by slug
//!
//! The first failure aborts the rest. Nothing is rolled back, and the draft
//! is kept so the operator can fix the cause and submit again.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, WriteStep,
        ports::{DataService, Query, RemoteError},
    },
    domain::{DraftField, Slug, TemplateDraft, TemplateId, generate_slug},
    error::{Context, HubResult},
};

/// Editor row looked up when the policy asks for a foreign key.
pub const DEFAULT_EDITOR_SLUG: &str = "capcut";

/// How the inserted row's `editor_id` is filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKeyPolicy {
    /// Look up `editors.id` by slug before inserting.
    LookupBySlug(String),
    /// Insert with a null `editor_id`.
    Null,
}

impl Default for EditorKeyPolicy {
    fn default() -> Self {
        Self::LookupBySlug(DEFAULT_EDITOR_SLUG.to_string())
    }
}

/// What a successful publish wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitReceipt {
    /// Id assigned by the remote service, when it echoed the row back.
    pub template_id: Option<TemplateId>,
    pub slug: Slug,
    pub editor_id: Option<Value>,
    /// Upserted tag slugs, in input order.
    pub tags: Vec<String>,
}

pub struct AdminForm {
    service: Arc<dyn DataService>,
    policy: EditorKeyPolicy,
    draft: TemplateDraft,
}

impl AdminForm {
    pub fn new(service: Arc<dyn DataService>, policy: EditorKeyPolicy) -> Self {
        Self {
            service,
            policy,
            draft: TemplateDraft::default(),
        }
    }

    pub fn draft(&self) -> &TemplateDraft {
        &self.draft
    }

    pub fn policy(&self) -> &EditorKeyPolicy {
        &self.policy
    }

    /// Set a field by its form name (`"title"`, `"thumbnailUrl"`, ...).
    pub fn update_field(&mut self, name: &str, value: &str) -> HubResult<()> {
        let field: DraftField = name.parse()?;
        self.set(field, value)
    }

    pub fn set(&mut self, field: DraftField, value: &str) -> HubResult<()> {
        self.draft.update(field, value)?;
        Ok(())
    }

    /// Slug the current title will publish under.
    pub fn generate_slug(&self) -> String {
        generate_slug(&self.draft.title)
    }

    pub fn reset(&mut self) {
        self.draft = TemplateDraft::default();
    }

    #[instrument(skip(self), fields(title = %self.draft.title))]
    pub async fn submit(&mut self) -> HubResult<SubmitReceipt> {
        self.draft.validate()?;

        let editor_id = self.resolve_editor_key().await?;

        let row = serde_json::to_value(self.draft.to_row(editor_id.clone()))
            .context("serializing template row")?;
        let inserted = self
            .service
            .insert("templates", row)
            .await
            .map_err(|e| write_error(WriteStep::InsertTemplate, e))?;

        let template_id = inserted
            .first()
            .and_then(|row| row.get("id"))
            .and_then(id_text)
            .and_then(|id| TemplateId::parse(&id).ok());
        debug!(template_id = ?template_id, "Template row inserted");

        let mut tags = Vec::new();
        for tag in self.draft.tag_rows() {
            let slug = tag.slug.clone();
            let row = serde_json::to_value(&tag).context("serializing tag row")?;
            self.service
                .upsert("tags", row, "slug")
                .await
                .map_err(|e| write_error(WriteStep::UpsertTag { slug: slug.clone() }, e))?;
            tags.push(slug);
        }

        let receipt = SubmitReceipt {
            template_id,
            slug: self.draft.slug(),
            editor_id,
            tags,
        };
        info!(slug = %receipt.slug, tags = receipt.tags.len(), "Template published");

        self.reset();
        Ok(receipt)
    }

    async fn resolve_editor_key(&self) -> HubResult<Option<Value>> {
        let slug = match &self.policy {
            EditorKeyPolicy::Null => return Ok(None),
            EditorKeyPolicy::LookupBySlug(slug) => slug,
        };

        let query = Query::table("editors").select("id").eq("slug", slug).single();
        let rows = self
            .service
            .select(&query)
            .await
            .map_err(|e| write_error(WriteStep::EditorLookup, e))?;

        match rows.first().and_then(|row| row.get("id")) {
            Some(id) if !id.is_null() => Ok(Some(id.clone())),
            _ => Err(ApplicationError::Write {
                step: WriteStep::EditorLookup,
                message: format!("no editor with slug '{slug}'"),
            }
            .into()),
        }
    }
}

fn write_error(step: WriteStep, err: RemoteError) -> crate::error::HubError {
    warn!(step = %step, error = %err, "Publish step failed");
    ApplicationError::Write {
        step,
        message: err.message,
    }
    .into()
}

fn id_text(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use serde_json::json;

    use super::*;
    use crate::application::ports::MockDataService;
    use crate::domain::DomainError;
    use crate::error::HubError;

    fn fill(form: &mut AdminForm) {
        form.update_field("title", "Viral Phonk Intro!!").unwrap();
        form.update_field("description", "Hard-hitting intro").unwrap();
        form.update_field("thumbnailUrl", "https://img/1.jpg").unwrap();
        form.update_field("videoUrl", "https://vid/1.mp4").unwrap();
        form.update_field("capcutUrl", "https://capcut.app/t/abc").unwrap();
        form.update_field("tags", "phonk, viral, intro").unwrap();
    }

    #[tokio::test]
    async fn submit_runs_lookup_insert_then_three_upserts() {
        let mut mock = MockDataService::new();
        let mut seq = Sequence::new();

        mock.expect_select()
            .withf(|q| q.table == "editors" && q.single && q.filters[0].value == "capcut")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![json!({"id": 1})]));
        mock.expect_insert()
            .withf(|table, row| {
                table == "templates"
                    && row["is_published"] == json!(true)
                    && row["is_featured"] == json!(true)
                    && row["editor_id"] == json!(1)
                    && row["slug"] == json!("viral-phonk-intro")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, row| {
                let mut stored = row;
                stored["id"] = json!(101);
                Ok(vec![stored])
            });
        for slug in ["phonk", "viral", "intro"] {
            mock.expect_upsert()
                .withf(move |table, row, conflict| {
                    table == "tags" && conflict == "slug" && row["slug"] == json!(slug)
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, row, _| Ok(vec![row]));
        }

        let mut form = AdminForm::new(Arc::new(mock), EditorKeyPolicy::default());
        fill(&mut form);

        let receipt = form.submit().await.unwrap();
        assert_eq!(receipt.template_id, Some(TemplateId::new("101")));
        assert_eq!(receipt.tags, vec!["phonk", "viral", "intro"]);
        assert_eq!(form.draft(), &TemplateDraft::default());
    }

    #[tokio::test]
    async fn null_policy_skips_lookup() {
        let mut mock = MockDataService::new();
        mock.expect_select().never();
        mock.expect_insert()
            .withf(|_, row| row["editor_id"].is_null())
            .returning(|_, row| Ok(vec![row]));
        mock.expect_upsert().returning(|_, row, _| Ok(vec![row]));

        let mut form = AdminForm::new(Arc::new(mock), EditorKeyPolicy::Null);
        fill(&mut form);

        let receipt = form.submit().await.unwrap();
        assert!(receipt.editor_id.is_none());
        assert!(receipt.template_id.is_none());
    }

    #[tokio::test]
    async fn missing_editor_row_aborts_before_insert() {
        let mut mock = MockDataService::new();
        mock.expect_select().returning(|_| Ok(vec![]));
        mock.expect_insert().never();

        let mut form = AdminForm::new(Arc::new(mock), EditorKeyPolicy::default());
        fill(&mut form);

        let err = form.submit().await.unwrap_err();
        assert!(matches!(
            err,
            HubError::Application(ApplicationError::Write {
                step: WriteStep::EditorLookup,
                ..
            })
        ));
        assert_eq!(form.draft().title, "Viral Phonk Intro!!");
    }

    #[tokio::test]
    async fn tag_failure_keeps_draft_and_stops() {
        let mut mock = MockDataService::new();
        mock.expect_insert().returning(|_, row| Ok(vec![row]));
        mock.expect_upsert()
            .times(1)
            .returning(|_, _, _| Err(RemoteError::new("duplicate key value")));

        let mut form = AdminForm::new(Arc::new(mock), EditorKeyPolicy::Null);
        fill(&mut form);

        let err = form.submit().await.unwrap_err();
        assert_eq!(
            err,
            HubError::Application(ApplicationError::Write {
                step: WriteStep::UpsertTag {
                    slug: "phonk".into()
                },
                message: "duplicate key value".into(),
            })
        );
        assert_eq!(form.draft().tags, "phonk, viral, intro");
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_remote() {
        let mut mock = MockDataService::new();
        mock.expect_select().never();
        mock.expect_insert().never();

        let mut form = AdminForm::new(Arc::new(mock), EditorKeyPolicy::default());
        fill(&mut form);
        form.update_field("duration", "301").unwrap();

        assert!(matches!(
            form.submit().await,
            Err(HubError::Domain(DomainError::OutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn emoji_only_tags_are_rejected_before_any_write() {
        let mut mock = MockDataService::new();
        mock.expect_select().never();
        mock.expect_insert().never();
        mock.expect_upsert().never();

        let mut form = AdminForm::new(Arc::new(mock), EditorKeyPolicy::default());
        fill(&mut form);
        form.update_field("tags", "🔥, ✨, phonk").unwrap();

        assert!(matches!(
            form.submit().await,
            Err(HubError::Domain(DomainError::NoSlug { field: "tags", .. }))
        ));
        assert_eq!(form.draft().tags, "🔥, ✨, phonk");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut form = AdminForm::new(Arc::new(MockDataService::new()), EditorKeyPolicy::Null);
        assert!(matches!(
            form.update_field("colour", "red"),
            Err(HubError::Domain(DomainError::UnknownField(_)))
        ));
    }

    #[test]
    fn slug_follows_title() {
        let mut form = AdminForm::new(Arc::new(MockDataService::new()), EditorKeyPolicy::Null);
        form.update_field("title", "  TikTok -- Transition Pack ").unwrap();
        assert_eq!(form.generate_slug(), "tiktok-transition-pack");
    }

    #[tokio::test]
    async fn empty_tags_are_not_upserted() {
        let mut mock = MockDataService::new();
        mock.expect_insert().returning(|_, row| Ok(vec![row]));
        mock.expect_upsert().never();

        let mut form = AdminForm::new(Arc::new(mock), EditorKeyPolicy::Null);
        fill(&mut form);
        form.update_field("tags", " , ,").unwrap();

        assert!(form.submit().await.unwrap().tags.is_empty());
    }
}
