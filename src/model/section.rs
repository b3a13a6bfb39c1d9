//! Body section type.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// One body section: an ordered run of paragraphs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section index within the document (0-based)
    pub index: usize,

    /// Paragraphs in document order
    pub paragraphs: Vec<Paragraph>,
}

impl Section {
    /// Create a new empty section.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            paragraphs: Vec::new(),
        }
    }

    /// Add a paragraph to the section.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Plain text of the section: one line per paragraph, in order.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
