//! The fixed sample catalog.
//!
//! Six templates used two ways: as the listing fallback when the remote
//! service is unreachable, and as seed data for the demo backend.

use std::collections::HashMap;

use serde_json::{Value, json};
use tphub_core::domain::{Editor, TemplateSummary, generate_slug};

use crate::memory::InMemoryDataService;

pub const PLACEHOLDER_THUMBNAIL: &str = "/api/placeholder/400/225";

struct SampleTemplate {
    id: u32,
    title: &'static str,
    editor_label: &'static str,
    downloads: u64,
    likes: u64,
}

const SAMPLES: [SampleTemplate; 6] = [
    SampleTemplate {
        id: 1,
        title: "Viral Phonk Intro",
        editor_label: "CapCut",
        downloads: 15420,
        likes: 1240,
    },
    SampleTemplate {
        id: 2,
        title: "Instagram Story Pack",
        editor_label: "After Effects",
        downloads: 8330,
        likes: 892,
    },
    SampleTemplate {
        id: 3,
        title: "YouTube Intro Template",
        editor_label: "Premiere Pro",
        downloads: 6540,
        likes: 673,
    },
    SampleTemplate {
        id: 4,
        title: "TikTok Transition Pack",
        editor_label: "CapCut",
        downloads: 12100,
        likes: 1156,
    },
    SampleTemplate {
        id: 5,
        title: "Logo Animation",
        editor_label: "After Effects",
        downloads: 4820,
        likes: 445,
    },
    SampleTemplate {
        id: 6,
        title: "Podcast Intro",
        editor_label: "DaVinci Resolve",
        downloads: 3210,
        likes: 298,
    },
];

/// Editors seeded alongside the templates, keyed by slug.
const EDITORS: [(u32, &str, &str); 3] = [
    (1, "CapCut", "capcut"),
    (2, "VN Video Editor", "vn"),
    (3, "After Effects", "aftereffects"),
];

fn editor_for(label: &str) -> Editor {
    Editor::ALL
        .into_iter()
        .find(|e| e.metadata().display_name == label)
        .unwrap_or_default()
}

/// Cards for the listing fallback, in catalog order. Editor labels are
/// shown as-is, including editors the app has no mapping for.
pub fn summaries() -> Vec<TemplateSummary> {
    SAMPLES
        .iter()
        .map(|s| {
            let mut card = TemplateSummary::new(
                s.id.to_string(),
                s.title,
                editor_for(s.editor_label),
                PLACEHOLDER_THUMBNAIL,
                s.downloads,
                s.likes,
            );
            card.editor_name = s.editor_label.to_string();
            card
        })
        .collect()
}

/// Rows for the `templates`, `template_details` and `editors` tables.
///
/// `created_at` descends with catalog order so a newest-first read
/// returns the catalog as listed.
pub fn seed_tables() -> HashMap<String, Vec<Value>> {
    let created_at = |id: u32| format!("2024-01-{:02}T12:00:00Z", 10 - id);

    let templates: Vec<Value> = SAMPLES
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "title": s.title,
                "slug": generate_slug(s.title),
                "thumbnail_url": PLACEHOLDER_THUMBNAIL,
                "editors": {"name": s.editor_label},
                "downloads_count": s.downloads,
                "likes_count": s.likes,
                "is_published": true,
                "is_featured": false,
                "created_at": created_at(s.id),
                "tags": [],
            })
        })
        .collect();

    let details: Vec<Value> = SAMPLES
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "title": s.title,
                "slug": generate_slug(s.title),
                "thumbnail_url": PLACEHOLDER_THUMBNAIL,
                "editor_name": s.editor_label,
                "downloads_count": s.downloads,
                "likes_count": s.likes,
                "is_published": true,
                "is_featured": false,
                "created_at": created_at(s.id),
                "tag_names": [],
            })
        })
        .collect();

    let editors: Vec<Value> = EDITORS
        .iter()
        .map(|(id, name, slug)| json!({"id": id, "name": name, "slug": slug}))
        .collect();

    HashMap::from([
        ("templates".to_string(), templates),
        ("template_details".to_string(), details),
        ("editors".to_string(), editors),
        ("tags".to_string(), Vec::new()),
    ])
}

/// `template_details` row for a newly inserted `templates` row. Tag links
/// are not modelled, so `tag_names` starts empty.
fn details_row(row: &Value) -> Value {
    let mut details = row.as_object().cloned().unwrap_or_default();
    details.remove("editors");
    details.remove("tags");
    details.remove("editor_id");

    let editor = Editor::resolve(row.get("editor").and_then(Value::as_str));
    details.insert(
        "editor_name".into(),
        Value::from(editor.metadata().display_name),
    );
    details.insert("tag_names".into(), json!([]));
    Value::Object(details)
}

impl InMemoryDataService {
    /// A demo backend holding the sample catalog.
    pub fn with_sample_catalog() -> Self {
        Self::with_tables(seed_tables()).with_derived_view(
            "templates",
            "template_details",
            details_row,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_templates_in_catalog_order() {
        let cards = summaries();
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].title, "Viral Phonk Intro");
        assert_eq!(cards[0].downloads, 15420);
        assert_eq!(cards[5].title, "Podcast Intro");
        assert!(cards.iter().all(|c| c.thumbnail_url == PLACEHOLDER_THUMBNAIL));
    }

    #[test]
    fn unmapped_editors_keep_their_label() {
        let cards = summaries();
        assert_eq!(cards[2].editor_name, "Premiere Pro");
        assert_eq!(cards[2].editor, Editor::CapCut);
        assert_eq!(cards[1].editor, Editor::AfterEffects);
    }

    #[test]
    fn details_row_flattens_editor() {
        let row = details_row(&json!({
            "id": "abc",
            "title": "Fresh",
            "editor": "vn",
            "editor_id": 2,
        }));
        assert_eq!(row["editor_name"], "VN Video Editor");
        assert_eq!(row["tag_names"], json!([]));
        assert!(row.get("editor_id").is_none());
    }

    #[test]
    fn seed_covers_every_relation() {
        let tables = seed_tables();
        assert_eq!(tables["templates"].len(), 6);
        assert_eq!(tables["template_details"].len(), 6);
        assert_eq!(tables["editors"][0]["slug"], "capcut");
    }
}
