//! Document-level types.

use super::{EmbeddedResource, Section};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decoded document.
///
/// Owned by one extraction request for its duration; never shared or
/// persisted across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Best-effort document properties
    pub metadata: Metadata,

    /// Body sections in document order
    pub sections: Vec<Section>,

    /// Embedded resources, when the container exposes them through its
    /// decoded tree. Empty for containers that only expose resources at the
    /// archive level.
    pub resources: Vec<EmbeddedResource>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            sections: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Add a section to the document.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Total paragraph count across all sections.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }

    /// Check if the document has any body content.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.paragraphs.is_empty())
    }

    /// Get plain text content of the entire document, in structural order.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort document properties.
///
/// Every field is optional: the decoders populate what the container
/// actually carries and leave the rest `None`. Absence degrades output, it
/// never fails a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// Container format version (e.g. "5.0.5.0")
    pub format_version: Option<String>,
}

impl Metadata {
    /// Check if no property could be recovered at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subject.is_none()
            && self.author.is_none()
            && self.keywords.is_none()
            && self.created.is_none()
            && self.modified.is_none()
            && self.format_version.is_none()
    }

    /// Labeled property values for display.
    ///
    /// Returns every known property slot, present or not, so callers can
    /// emit an explicit "unavailable" marker instead of silently omitting
    /// fields.
    pub fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("Title", self.title.clone()),
            ("Subject", self.subject.clone()),
            ("Author", self.author.clone()),
            ("Keywords", self.keywords.clone()),
            ("Created", self.created.map(|d| d.to_rfc3339())),
            ("Modified", self.modified.map(|d| d.to_rfc3339())),
            ("Format version", self.format_version.clone()),
        ]
    }
}
