//! Template entity and its card projection.
//!
//! A [`Template`] is a remote-owned record. This crate never mutates one
//! after it has been read; the only write path is [`super::draft`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{Editor, EditorMetadata, format_duration},
};

/// Duration assumed when a row carries none.
pub const DEFAULT_DURATION_SECONDS: u32 = 15;

// ── TemplateId ───────────────────────────────────────────────────────────────

/// Remote-assigned identifier. Opaque: numeric ids and UUIDs are both
/// carried as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// # Panics
    ///
    /// Panics if the id is blank. Use [`TemplateId::parse`] for input.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.trim().is_empty(), "template id cannot be blank");
        Self(id)
    }

    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::InvalidTemplate("empty template id".into()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TemplateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Template ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: String,
    pub preview_video_url: Option<String>,
    /// "Open in editor" link; the download action is a no-op without it.
    pub editor_url: Option<String>,
    pub editor: Editor,
    /// Editor name as the remote service labels it, when it came from a
    /// join. Shown on cards even for editors without a mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_label: Option<String>,
    pub duration_seconds: u32,
    pub downloads: u64,
    pub likes: u64,
    pub is_published: bool,
    pub is_featured: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl Template {
    /// A published template with every optional field at its default.
    pub fn new(id: TemplateId, title: impl Into<String>, thumbnail_url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            slug: None,
            description: None,
            thumbnail_url: thumbnail_url.into(),
            preview_video_url: None,
            editor_url: None,
            editor: Editor::default(),
            editor_label: None,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            downloads: 0,
            likes: 0,
            is_published: true,
            is_featured: false,
            created_at: None,
            tags: Vec::new(),
        }
    }

    pub fn editor_metadata(&self) -> EditorMetadata {
        self.editor.metadata()
    }

    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_seconds)
    }

    /// Whether a preview video can be played; otherwise the thumbnail is
    /// shown.
    pub fn has_preview(&self) -> bool {
        self.preview_video_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// The editor link, if one is present and non-blank.
    pub fn download_link(&self) -> Option<&str> {
        self.editor_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            editor: self.editor,
            editor_name: self
                .editor_label
                .clone()
                .unwrap_or_else(|| self.editor.metadata().display_name.to_string()),
            thumbnail_url: self.thumbnail_url.clone(),
            downloads: self.downloads,
            likes: self.likes,
        }
    }

    /// A row without a title cannot be shown as a card.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "template '{}' has no title",
                self.id
            )));
        }
        Ok(())
    }
}

// ── TemplateSummary ──────────────────────────────────────────────────────────

/// Card projection rendered by the listing grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub title: String,
    pub editor: Editor,
    pub editor_name: String,
    pub thumbnail_url: String,
    pub downloads: u64,
    pub likes: u64,
}

impl TemplateSummary {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        editor: Editor,
        thumbnail_url: impl Into<String>,
        downloads: u64,
        likes: u64,
    ) -> Self {
        Self {
            id: TemplateId::new(id),
            title: title.into(),
            editor,
            editor_name: editor.metadata().display_name.to_string(),
            thumbnail_url: thumbnail_url.into(),
            downloads,
            likes,
        }
    }
}
