//! Detail view: one template, its preview player and the editor link.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{LinkOpener, MediaElement},
        services::TemplateRepository,
    },
    domain::{EditorMetadata, Template, TemplateId, Treatment, format_count},
    error::HubResult,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Ready(Box<Template>),
    /// Terminal. The only way out is back to the listing.
    NotFound { id: String },
}

/// Everything the detail page renders, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailCard {
    pub id: String,
    pub title: String,
    pub editor_name: &'static str,
    pub cta_label: &'static str,
    pub treatment: Treatment,
    pub duration: String,
    pub downloads: String,
    pub likes: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Preview video, or the thumbnail when there is none.
    pub media_url: String,
    pub has_preview: bool,
    pub editor_url: Option<String>,
}

pub struct DetailView {
    repository: TemplateRepository,
    state: DetailState,
    is_playing: bool,
    media: Box<dyn MediaElement>,
    opener: Box<dyn LinkOpener>,
}

impl DetailView {
    pub fn new(
        repository: TemplateRepository,
        media: Box<dyn MediaElement>,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        Self {
            repository,
            state: DetailState::Loading,
            is_playing: false,
            media,
            opener,
        }
    }

    /// Fetch one template. Any failure lands in `NotFound`; there is no retry.
    #[instrument(skip(self))]
    pub async fn load(&mut self, id: &str) -> &DetailState {
        self.state = DetailState::Loading;
        self.is_playing = false;

        let outcome = match TemplateId::parse(id) {
            Ok(template_id) => self.repository.get(&template_id).await,
            Err(_) => Err(ApplicationError::NotFound { id: id.to_string() }),
        };

        self.state = match outcome {
            Ok(template) => {
                debug!(title = %template.title, "Template loaded");
                DetailState::Ready(Box::new(template))
            }
            Err(ApplicationError::NotFound { .. }) => DetailState::NotFound { id: id.to_string() },
            Err(err) => {
                warn!(error = %err, "Template fetch failed, showing not-found");
                DetailState::NotFound { id: id.to_string() }
            }
        };

        &self.state
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn template(&self) -> Option<&Template> {
        match &self.state {
            DetailState::Ready(template) => Some(template),
            _ => None,
        }
    }

    pub fn editor_metadata(&self) -> Option<EditorMetadata> {
        self.template().map(Template::editor_metadata)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn card(&self) -> Option<DetailCard> {
        let template = self.template()?;
        let meta = template.editor_metadata();

        Some(DetailCard {
            id: template.id.to_string(),
            title: template.title.clone(),
            editor_name: meta.display_name,
            cta_label: meta.cta_label,
            treatment: meta.treatment,
            duration: template.formatted_duration(),
            downloads: format_count(template.downloads),
            likes: template.likes.to_string(),
            description: template.description.clone(),
            tags: template.tags.clone(),
            media_url: match template.preview_video_url.as_deref() {
                Some(url) if template.has_preview() => url.to_string(),
                _ => template.thumbnail_url.clone(),
            },
            has_preview: template.has_preview(),
            editor_url: template.download_link().map(String::from),
        })
    }

    /// Flip the play state and drive the media element to match.
    ///
    /// A failing `play()` is logged and otherwise ignored: the local state
    /// flips regardless and can drift from the element until the next
    /// [`on_media_event`](Self::on_media_event).
    pub fn toggle_preview(&mut self) {
        let has_preview = self.template().is_some_and(Template::has_preview);
        if !has_preview {
            return;
        }

        if self.is_playing {
            self.media.pause();
        } else if let Err(err) = self.media.play() {
            warn!(error = %err, "Preview playback failed to start");
        }

        self.is_playing = !self.is_playing;
    }

    /// Play/pause notification from the element itself.
    pub fn on_media_event(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Open the editor link in a new context. `Ok(false)` when there is none.
    pub fn download(&self) -> HubResult<bool> {
        let Some(link) = self.template().and_then(Template::download_link) else {
            debug!("No editor link, download skipped");
            return Ok(false);
        };

        self.opener.open_in_new_context(link)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::application::ports::{MockDataService, MockLinkOpener, MockMediaElement, RemoteError};
    use crate::error::HubError;

    fn repo_returning(rows: Vec<serde_json::Value>) -> TemplateRepository {
        let mut mock = MockDataService::new();
        mock.expect_select().returning(move |_| Ok(rows.clone()));
        TemplateRepository::new(Arc::new(mock))
    }

    fn preview_row() -> serde_json::Value {
        json!({
            "id": 1,
            "title": "Viral Phonk Intro",
            "thumbnail_url": "https://img/1.jpg",
            "video_preview_url": "https://vid/1.mp4",
            "capcut_url": "https://capcut.app/t/1",
            "editor": "vn",
            "downloads_count": 15420,
            "likes_count": 1240,
        })
    }

    #[tokio::test]
    async fn not_found_never_touches_media() {
        let mut media = MockMediaElement::new();
        media.expect_play().never();
        media.expect_pause().never();

        let mut view = DetailView::new(
            repo_returning(vec![]),
            Box::new(media),
            Box::new(MockLinkOpener::new()),
        );
        assert_eq!(
            view.load("99").await,
            &DetailState::NotFound { id: "99".into() }
        );

        view.toggle_preview();
        assert!(!view.is_playing());
        assert!(view.card().is_none());
    }

    #[tokio::test]
    async fn fetch_error_renders_not_found() {
        let mut mock = MockDataService::new();
        mock.expect_select()
            .returning(|_| Err(RemoteError::new("network down")));
        let mut view = DetailView::new(
            TemplateRepository::new(Arc::new(mock)),
            Box::new(MockMediaElement::new()),
            Box::new(MockLinkOpener::new()),
        );

        assert!(matches!(view.load("1").await, DetailState::NotFound { .. }));
    }

    #[tokio::test]
    async fn toggle_plays_then_pauses() {
        let mut media = MockMediaElement::new();
        media.expect_play().times(1).returning(|| Ok(()));
        media.expect_pause().times(1).return_const(());

        let mut view = DetailView::new(
            repo_returning(vec![preview_row()]),
            Box::new(media),
            Box::new(MockLinkOpener::new()),
        );
        view.load("1").await;

        view.toggle_preview();
        assert!(view.is_playing());
        view.toggle_preview();
        assert!(!view.is_playing());
    }

    #[tokio::test]
    async fn failed_play_still_flips_state() {
        let mut media = MockMediaElement::new();
        media.expect_play().returning(|| {
            Err(HubError::Internal {
                message: "autoplay blocked".into(),
            })
        });

        let mut view = DetailView::new(
            repo_returning(vec![preview_row()]),
            Box::new(media),
            Box::new(MockLinkOpener::new()),
        );
        view.load("1").await;

        view.toggle_preview();
        assert!(view.is_playing());

        view.on_media_event(false);
        assert!(!view.is_playing());
    }

    #[tokio::test]
    async fn toggle_without_preview_is_noop() {
        let mut media = MockMediaElement::new();
        media.expect_play().never();

        let mut view = DetailView::new(
            repo_returning(vec![json!({"id": 2, "title": "Still", "thumbnail_url": "t.jpg"})]),
            Box::new(media),
            Box::new(MockLinkOpener::new()),
        );
        view.load("2").await;
        view.toggle_preview();

        assert!(!view.is_playing());
        assert_eq!(view.card().unwrap().media_url, "t.jpg");
    }

    #[tokio::test]
    async fn download_opens_editor_link() {
        let mut opener = MockLinkOpener::new();
        opener
            .expect_open_in_new_context()
            .withf(|url| url == "https://capcut.app/t/1")
            .times(1)
            .returning(|_| Ok(()));

        let mut view = DetailView::new(
            repo_returning(vec![preview_row()]),
            Box::new(MockMediaElement::new()),
            Box::new(opener),
        );
        view.load("1").await;

        assert!(view.download().unwrap());
    }

    #[tokio::test]
    async fn download_without_link_is_noop() {
        let mut opener = MockLinkOpener::new();
        opener.expect_open_in_new_context().never();

        let mut view = DetailView::new(
            repo_returning(vec![json!({"id": 3, "title": "No Link", "capcut_url": " "})]),
            Box::new(MockMediaElement::new()),
            Box::new(opener),
        );
        view.load("3").await;

        assert!(!view.download().unwrap());
    }

    #[tokio::test]
    async fn card_formats_counts_and_editor() {
        let mut view = DetailView::new(
            repo_returning(vec![preview_row()]),
            Box::new(MockMediaElement::new()),
            Box::new(MockLinkOpener::new()),
        );
        view.load("1").await;

        let card = view.card().unwrap();
        assert_eq!(card.editor_name, "VN Video Editor");
        assert_eq!(card.cta_label, "Edit in VN");
        assert_eq!(card.downloads, "15,420");
        assert_eq!(card.likes, "1240");
        assert_eq!(card.duration, "0:15");
        assert!(card.has_preview);
    }
}
