//! Table types.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// A table control; cells carry full nested paragraphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain text: cells tab-joined, rows newline-joined.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| cell.plain_text())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Add a cell to the row.
    pub fn add_cell(&mut self, cell: TableCell) {
        self.cells.push(cell);
    }
}

/// A single table cell holding nested paragraphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell paragraphs in order
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    /// Create a new empty cell.
    pub fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
        }
    }

    /// Create a cell holding a single plain-text paragraph.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            paragraphs: vec![Paragraph::with_text(text)],
        }
    }

    /// Add a paragraph to the cell.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Plain text of the cell: paragraphs newline-joined.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_plain_text_layout() {
        let mut table = Table::new();

        let mut header = TableRow::new();
        header.add_cell(TableCell::with_text("name"));
        header.add_cell(TableCell::with_text("value"));
        table.add_row(header);

        let mut row = TableRow::new();
        row.add_cell(TableCell::with_text("alpha"));
        row.add_cell(TableCell::with_text("1"));
        table.add_row(row);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.plain_text(), "name\tvalue\nalpha\t1");
    }

    #[test]
    fn test_multi_paragraph_cell() {
        let mut cell = TableCell::new();
        cell.add_paragraph(Paragraph::with_text("line one"));
        cell.add_paragraph(Paragraph::with_text("line two"));
        assert_eq!(cell.plain_text(), "line one\nline two");
    }
}
