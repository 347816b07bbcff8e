//! Domain value objects: Editor, EditorMetadata, Slug, durations.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! Editor is a closed enumeration; everything that arrives from the remote
//! service as a free-form string is resolved through [`Editor::resolve`],
//! which falls back to CapCut.
//!
//! # Adding New Editors
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str`, `from_tag` and `metadata` arms here
//! 3. Done: the repository, views and CLI pick it up

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Editor ───────────────────────────────────────────────────────────────────

/// The video-editing application a template targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Editor {
    #[default]
    CapCut,
    Vn,
    AfterEffects,
}

impl Editor {
    pub const ALL: [Editor; 3] = [Editor::CapCut, Editor::Vn, Editor::AfterEffects];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CapCut => "capcut",
            Self::Vn => "vn",
            Self::AfterEffects => "aftereffects",
        }
    }

    /// Case-insensitive match against the known editor tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "capcut" => Some(Self::CapCut),
            "vn" => Some(Self::Vn),
            "aftereffects" => Some(Self::AfterEffects),
            _ => None,
        }
    }

    /// Total resolution of a remote editor tag. Unknown or missing tags map
    /// to CapCut.
    pub fn resolve(tag: Option<&str>) -> Self {
        tag.and_then(Self::from_tag).unwrap_or_default()
    }

    pub const fn metadata(self) -> EditorMetadata {
        match self {
            Self::CapCut => EditorMetadata {
                display_name: "CapCut",
                cta_label: "Edit in CapCut",
                treatment: Treatment::Dark,
            },
            Self::Vn => EditorMetadata {
                display_name: "VN Video Editor",
                cta_label: "Edit in VN",
                treatment: Treatment::Blue,
            },
            Self::AfterEffects => EditorMetadata {
                display_name: "After Effects",
                cta_label: "Edit in AE",
                treatment: Treatment::Purple,
            },
        }
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse used for user input. Remote rows go through
/// [`Editor::resolve`] instead.
impl FromStr for Editor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capcut" | "cc" => Ok(Self::CapCut),
            "vn" => Ok(Self::Vn),
            "aftereffects" | "after-effects" | "ae" => Ok(Self::AfterEffects),
            other => Err(DomainError::UnknownEditor(other.to_string())),
        }
    }
}

// ── EditorMetadata ───────────────────────────────────────────────────────────

/// Display metadata derived from an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditorMetadata {
    pub display_name: &'static str,
    pub cta_label: &'static str,
    pub treatment: Treatment,
}

/// Visual treatment of the call-to-action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Treatment {
    Dark,
    Blue,
    Purple,
}

impl Treatment {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Blue => "blue",
            Self::Purple => "purple",
        }
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a remote editor tag to its display metadata.
pub fn resolve_editor_metadata(tag: Option<&str>) -> EditorMetadata {
    Editor::resolve(tag).metadata()
}

// ── Slug ─────────────────────────────────────────────────────────────────────

/// URL-safe, lowercase, hyphenated key derived from a title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn from_title(title: &str) -> Self {
        Self(generate_slug(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lowercase, collapse every run of non-alphanumeric characters into a
/// single hyphen, strip leading and trailing hyphens.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut gap = false;

    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(ch);
        } else {
            gap = true;
        }
    }

    slug
}

/// Split a comma-separated tag field into trimmed, non-empty names.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

// ── Durations ────────────────────────────────────────────────────────────────

/// Render seconds as `m:ss`.
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Group digits in thousands: `15420` → `15,420`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
