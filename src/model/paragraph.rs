//! Paragraph and control-element types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A paragraph: an ordered sequence of text runs and control elements.
///
/// The position of a `ParaItem::Control` within `items` is the structural
/// position the control occupies in the paragraph. Flattening walks the
/// items in order, so a table anchored mid-paragraph contributes its text at
/// exactly that point, never after the surrounding runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Runs and controls in structural order
    pub items: Vec<ParaItem>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create a paragraph holding a single text run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.push_text(text);
        p
    }

    /// Append text, merging into a trailing run when one exists.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(ParaItem::Run(run)) = self.items.last_mut() {
            run.push_str(&text);
        } else {
            self.items.push(ParaItem::Run(text));
        }
    }

    /// Append a control element at the current position.
    pub fn push_control(&mut self, control: Control) {
        self.items.push(ParaItem::Control(control));
    }

    /// Plain text of the paragraph with control text interleaved in place.
    pub fn plain_text(&self) -> String {
        self.items
            .iter()
            .map(|item| match item {
                ParaItem::Run(text) => text.clone(),
                ParaItem::Control(control) => control.plain_text(),
            })
            .collect()
    }

    /// Check if the paragraph carries no visible content.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() || self.plain_text().trim().is_empty()
    }
}

/// One positional item within a paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParaItem {
    /// A run of plain text
    Run(String),

    /// A control element anchored at this position
    Control(Control),
}

/// A structural object within a paragraph contributing its own text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Control {
    /// A table; cells hold nested paragraphs
    Table(Table),

    /// A field (hyperlink, cross reference, date code) with its display text
    Field(String),

    /// An inline object (text box, shape, caption) holding nested paragraphs
    Object(Vec<Paragraph>),
}

impl Control {
    /// The control's own text content.
    pub fn plain_text(&self) -> String {
        match self {
            Control::Table(table) => table.plain_text(),
            Control::Field(text) => text.clone(),
            Control::Object(paragraphs) => paragraphs
                .iter()
                .map(|p| p.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableCell, TableRow};

    #[test]
    fn test_push_text_merges_runs() {
        let mut p = Paragraph::new();
        p.push_text("Hello, ");
        p.push_text("world");
        assert_eq!(p.items.len(), 1);
        assert_eq!(p.plain_text(), "Hello, world");
    }

    #[test]
    fn test_control_text_interleaved_in_place() {
        let mut table = Table::new();
        let mut row = TableRow::new();
        row.add_cell(TableCell::with_text("inside"));
        table.add_row(row);

        let mut p = Paragraph::new();
        p.push_text("before ");
        p.push_control(Control::Table(table));
        p.push_text(" after");

        assert_eq!(p.plain_text(), "before inside after");
    }

    #[test]
    fn test_field_control() {
        let mut p = Paragraph::new();
        p.push_text("see ");
        p.push_control(Control::Field("chapter 3".to_string()));
        assert_eq!(p.plain_text(), "see chapter 3");
    }

    #[test]
    fn test_empty_paragraph() {
        assert!(Paragraph::new().is_empty());
        assert!(Paragraph::with_text("   ").is_empty());
        assert!(!Paragraph::with_text("x").is_empty());
    }
}
