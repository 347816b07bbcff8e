//! Admin form state and the rows it produces.
//!
//! [`TemplateDraft`] holds raw form input. Field updates are unchecked apart
//! from parsing; [`TemplateDraft::validate`] applies the required/min/max
//! rules right before submission.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    error::DomainError,
    value_objects::{Editor, Slug, generate_slug, parse_tags},
};

pub const DRAFT_DEFAULT_DURATION: i64 = 15;
pub const DRAFT_MIN_DURATION: i64 = 1;
pub const DRAFT_MAX_DURATION: i64 = 300;

// ── DraftField ───────────────────────────────────────────────────────────────

/// Every input of the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Description,
    ThumbnailUrl,
    VideoUrl,
    EditorUrl,
    Duration,
    Tags,
    Editor,
}

impl DraftField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::ThumbnailUrl => "thumbnail_url",
            Self::VideoUrl => "video_url",
            Self::EditorUrl => "editor_url",
            Self::Duration => "duration",
            Self::Tags => "tags",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts snake_case, kebab-case and camelCase spellings.
impl FromStr for DraftField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "thumbnailurl" | "thumbnail" => Ok(Self::ThumbnailUrl),
            "videourl" | "video" | "previewurl" => Ok(Self::VideoUrl),
            "editorurl" | "capcuturl" | "link" => Ok(Self::EditorUrl),
            "duration" | "durationseconds" => Ok(Self::Duration),
            "tags" => Ok(Self::Tags),
            "editor" => Ok(Self::Editor),
            _ => Err(DomainError::UnknownField(s.to_string())),
        }
    }
}

// ── TemplateDraft ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub editor_url: String,
    /// Raw value so out-of-range input survives until validation.
    pub duration_seconds: i64,
    pub tags: String,
    pub editor: Editor,
}

impl Default for TemplateDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            thumbnail_url: String::new(),
            video_url: String::new(),
            editor_url: String::new(),
            duration_seconds: DRAFT_DEFAULT_DURATION,
            tags: String::new(),
            editor: Editor::default(),
        }
    }
}

impl TemplateDraft {
    pub fn update(&mut self, field: DraftField, value: &str) -> Result<(), DomainError> {
        match field {
            DraftField::Title => self.title = value.to_string(),
            DraftField::Description => self.description = value.to_string(),
            DraftField::ThumbnailUrl => self.thumbnail_url = value.to_string(),
            DraftField::VideoUrl => self.video_url = value.to_string(),
            DraftField::EditorUrl => self.editor_url = value.to_string(),
            DraftField::Tags => self.tags = value.to_string(),
            DraftField::Editor => self.editor = value.parse()?,
            DraftField::Duration => {
                self.duration_seconds =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| DomainError::InvalidNumber {
                            field: "duration",
                            value: value.to_string(),
                        })?;
            }
        }
        Ok(())
    }

    pub fn slug(&self) -> Slug {
        Slug::from_title(&self.title)
    }

    pub fn tag_names(&self) -> Vec<String> {
        parse_tags(&self.tags)
    }

    /// Required fields, slug-able title and tags, and the duration range.
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("thumbnail_url", &self.thumbnail_url),
            ("video_url", &self.video_url),
            ("editor_url", &self.editor_url),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::MissingRequiredField { field });
            }
        }

        if self.slug().is_empty() {
            return Err(DomainError::NoSlug {
                field: "title",
                value: self.title.trim().to_string(),
            });
        }

        // An empty slug is the upsert conflict key for every such tag.
        if let Some(name) = self
            .tag_names()
            .into_iter()
            .find(|name| generate_slug(name).is_empty())
        {
            return Err(DomainError::NoSlug {
                field: "tags",
                value: name,
            });
        }

        if !(DRAFT_MIN_DURATION..=DRAFT_MAX_DURATION).contains(&self.duration_seconds) {
            return Err(DomainError::OutOfRange {
                field: "duration",
                value: self.duration_seconds,
                min: DRAFT_MIN_DURATION,
                max: DRAFT_MAX_DURATION,
            });
        }

        Ok(())
    }

    /// The `templates` row inserted on submit. Published and featured
    /// unconditionally.
    pub fn to_row(&self, editor_id: Option<Value>) -> NewTemplateRow {
        NewTemplateRow {
            title: self.title.trim().to_string(),
            slug: self.slug().to_string(),
            description: self.description.trim().to_string(),
            thumbnail_url: self.thumbnail_url.trim().to_string(),
            video_preview_url: self.video_url.trim().to_string(),
            capcut_url: self.editor_url.trim().to_string(),
            editor: self.editor,
            editor_id,
            duration_seconds: self.duration_seconds.clamp(0, i64::from(u32::MAX)) as u32,
            is_published: true,
            is_featured: true,
        }
    }

    /// One `tags` row per token, in input order.
    pub fn tag_rows(&self) -> Vec<TagRow> {
        self.tag_names()
            .into_iter()
            .map(|name| TagRow {
                slug: generate_slug(&name),
                name,
            })
            .collect()
    }
}

// ── Rows ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTemplateRow {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_preview_url: String,
    pub capcut_url: String,
    pub editor: Editor,
    /// Serialized as `null` when the editor-key policy skips the lookup.
    pub editor_id: Option<Value>,
    pub duration_seconds: u32,
    pub is_published: bool,
    pub is_featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRow {
    pub name: String,
    pub slug: String,
}
