//! Catalog data model.
//!
//! - [`ImageRecord`] - one catalog entry as returned by the API
//! - [`SearchType`] - ranking strategy for text search
//! - [`FileInfo`] - identity of a locally selected file
//! - [`ImageMetadata`] - the descriptive fields sent on upload

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MIME type accepted for uploads and reverse-image search.
pub const JPEG_MIME: &str = "image/jpeg";

// =============================================================================
// Image Records
// =============================================================================

/// One catalog entry.
///
/// Only `_id` and `url` are guaranteed; every descriptive attribute is
/// optional. Records are immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Opaque identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Display URL, usually relative to the asset origin
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub born_died: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "uploadDate")]
    pub upload_date: Option<String>,
    /// Relevance score in `[0, 1]`
    #[serde(default)]
    pub score: Option<f64>,
}

impl ImageRecord {
    /// Title for display, falling back to "Untitled".
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Untitled",
        }
    }

    /// Relevance as a whole percentage, clamped to `0..=100`.
    pub fn score_percent(&self) -> Option<u8> {
        self.score
            .filter(|s| s.is_finite())
            .map(|s| (s.clamp(0.0, 1.0) * 100.0).round() as u8)
    }

    /// Upload date as a calendar date, e.g. `Mar 4, 2024`.
    ///
    /// Accepts RFC 3339 and naive ISO timestamps; anything else is
    /// returned verbatim.
    pub fn formatted_upload_date(&self) -> Option<String> {
        let raw = self.upload_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.format("%b %-d, %Y").to_string());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.format("%b %-d, %Y").to_string());
        }
        Some(raw.to_string())
    }

    /// Author with life dates when both are known.
    pub fn author_line(&self) -> Option<String> {
        let author = self.author.as_deref().filter(|a| !a.trim().is_empty())?;
        match self.born_died.as_deref().filter(|b| !b.trim().is_empty()) {
            Some(born_died) => Some(format!("{} ({})", author, born_died)),
            None => Some(author.to_string()),
        }
    }

    /// Labelled provenance attributes that are present, in display order.
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        [
            ("Date", self.date.as_deref()),
            ("Technique", self.technique.as_deref()),
            ("Location", self.location.as_deref()),
            ("Form", self.form.as_deref()),
            ("Type", self.kind.as_deref()),
            ("School", self.school.as_deref()),
            ("Timeline", self.timeline.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}

// =============================================================================
// Search Types
// =============================================================================

/// Ranking strategy offered by the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Semantic,
    Keyword,
    Hybrid,
}

impl SearchType {
    pub const ALL: [SearchType; 3] = [SearchType::Semantic, SearchType::Keyword, SearchType::Hybrid];

    /// Wire value for the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Semantic => "semantic",
            SearchType::Keyword => "keyword",
            SearchType::Hybrid => "hybrid",
        }
    }

    /// Human label for the selector.
    pub fn label(&self) -> &'static str {
        match self {
            SearchType::Semantic => "Semantic",
            SearchType::Keyword => "Keyword",
            SearchType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "semantic" => Ok(SearchType::Semantic),
            "keyword" => Ok(SearchType::Keyword),
            "hybrid" => Ok(SearchType::Hybrid),
            other => Err(format!("Unknown search type: {}", other)),
        }
    }
}

// =============================================================================
// Local Files
// =============================================================================

/// Identity of a file picked by the user.
///
/// The bytes stay in the browser; this is what keys caches and drives
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileInfo {
    pub name: String,
    /// MIME type reported by the browser (may be empty)
    pub mime_type: String,
    pub size: u64,
    /// Milliseconds since the Unix epoch
    pub last_modified: i64,
}

impl FileInfo {
    /// Whether the file is a JPEG.
    pub fn is_jpeg(&self) -> bool {
        self.mime_type.to_ascii_lowercase().starts_with(JPEG_MIME)
    }
}

// =============================================================================
// Upload Metadata
// =============================================================================

/// Descriptive fields submitted with a new image.
///
/// Serialized as the `image_data` part of the upload request. Empty
/// optional fields are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub born_died: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub date: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub technique: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub form: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty", default)]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub school: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub timeline: String,
}

/// Editable field of [`ImageMetadata`], used by the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Title,
    Author,
    BornDied,
    Date,
    Technique,
    Location,
    Form,
    Type,
    School,
    Timeline,
}

impl MetadataField {
    pub const ALL: [MetadataField; 10] = [
        MetadataField::Title,
        MetadataField::Author,
        MetadataField::BornDied,
        MetadataField::Date,
        MetadataField::Technique,
        MetadataField::Location,
        MetadataField::Form,
        MetadataField::Type,
        MetadataField::School,
        MetadataField::Timeline,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetadataField::Title => "Title",
            MetadataField::Author => "Author",
            MetadataField::BornDied => "Born-Died",
            MetadataField::Date => "Date",
            MetadataField::Technique => "Technique",
            MetadataField::Location => "Location",
            MetadataField::Form => "Form",
            MetadataField::Type => "Type",
            MetadataField::School => "School",
            MetadataField::Timeline => "Timeline",
        }
    }

    /// JSON / form name of the field.
    pub fn key(&self) -> &'static str {
        match self {
            MetadataField::Title => "title",
            MetadataField::Author => "author",
            MetadataField::BornDied => "born_died",
            MetadataField::Date => "date",
            MetadataField::Technique => "technique",
            MetadataField::Location => "location",
            MetadataField::Form => "form",
            MetadataField::Type => "type",
            MetadataField::School => "school",
            MetadataField::Timeline => "timeline",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, MetadataField::Title)
    }
}

impl ImageMetadata {
    pub fn get(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::Title => &self.title,
            MetadataField::Author => &self.author,
            MetadataField::BornDied => &self.born_died,
            MetadataField::Date => &self.date,
            MetadataField::Technique => &self.technique,
            MetadataField::Location => &self.location,
            MetadataField::Form => &self.form,
            MetadataField::Type => &self.kind,
            MetadataField::School => &self.school,
            MetadataField::Timeline => &self.timeline,
        }
    }

    pub fn set(&mut self, field: MetadataField, value: String) {
        let slot = match field {
            MetadataField::Title => &mut self.title,
            MetadataField::Author => &mut self.author,
            MetadataField::BornDied => &mut self.born_died,
            MetadataField::Date => &mut self.date,
            MetadataField::Technique => &mut self.technique,
            MetadataField::Location => &mut self.location,
            MetadataField::Form => &mut self.form,
            MetadataField::Type => &mut self.kind,
            MetadataField::School => &mut self.school,
            MetadataField::Timeline => &mut self.timeline,
        };
        *slot = value;
    }
}
