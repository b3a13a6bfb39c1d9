//! # unhwp
//!
//! Text, metadata, and embedded-file extraction for HWP and HWPX word
//! processor documents.
//!
//! Two structurally different containers sit behind one pipeline: the
//! legacy binary container (a CFB compound file of record streams) and the
//! package container (a ZIP archive of XML parts). Format dispatch is by
//! file suffix; each format's quirks stay inside its adapter.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unhwp::{extract_file, ExtractOptions};
//!
//! fn main() -> unhwp::Result<()> {
//!     let options = ExtractOptions::new()
//!         .with_output_dir("out")
//!         .with_resources(true);
//!     let outcome = extract_file(std::path::Path::new("report.hwp"), &options)?;
//!     println!("text written to {:?}", outcome.text_destination);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two container formats**: legacy binary (.hwp) and package (.hwpx)
//! - **In-order text**: table and object text stays at its structural
//!   position inside the paragraph that anchors it
//! - **Embedded-file recovery**: best-effort, one bad asset never blocks
//!   the rest
//! - **Batch processing**: per-file failure isolation, progress channel for
//!   interactive front-ends

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_kind, sniff_container, DocumentKind};
pub use error::{Error, Result};
pub use extract::{
    adapter_for, extract_file, extract_with_console, run_batch, run_batch_with, spawn_batch,
    BatchEvent, BatchFailure, BatchSummary, BatchWorker, ExtractOptions, FileOutcome,
    FormatAdapter, HwpAdapter, HwpxAdapter, ResourceFailure, ResourceReport, TextDestination,
};
pub use model::{
    Control, Document, EmbeddedResource, Metadata, ParaItem, Paragraph, Section, Table, TableCell,
    TableRow,
};
pub use render::{CleanupOptions, RenderOptions};

use std::path::Path;

/// Decode a document and return its flattened text without writing
/// anything to disk.
///
/// # Example
///
/// ```no_run
/// let text = unhwp::extract_text("document.hwpx").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let adapter = adapter_for(detect_kind(path)?);
    let doc = adapter.decode(path, &ExtractOptions::new())?;
    adapter.extract_text(&doc)
}

/// Decode a document and return its best-effort properties.
///
/// Fails with [`Error::MetadataUnavailable`] when the container exposes no
/// properties at all; partial metadata is returned as-is with the absent
/// fields `None`.
pub fn extract_metadata<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    let path = path.as_ref();
    let adapter = adapter_for(detect_kind(path)?);
    let doc = adapter.decode(path, &ExtractOptions::new())?;
    let metadata = adapter.extract_metadata(&doc);
    if metadata.is_empty() {
        return Err(Error::MetadataUnavailable(format!(
            "'{}' exposes no document properties",
            path.display()
        )));
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_missing_file() {
        let result = extract_text("no/such/file.hwp");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_extract_text_unsupported_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.odt");
        std::fs::write(&path, b"odt bytes").unwrap();
        assert!(matches!(
            extract_text(&path),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
