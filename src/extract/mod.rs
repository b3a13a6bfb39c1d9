//! Extraction orchestration: format dispatch, the adapter contract, and the
//! per-file pipeline.
//!
//! The two container formats differ in how embedded resources surface (the
//! binary container exposes them through its decoded tree, the package
//! container only at the archive level). [`FormatAdapter`] confines that
//! difference to the two adapter implementations; everything above the
//! trait sees one uniform pipeline.

mod batch;
mod hwp;
mod hwpx;
mod output;
mod resources;

pub use batch::{
    run_batch, run_batch_with, spawn_batch, BatchEvent, BatchFailure, BatchSummary, BatchWorker,
};
pub use hwp::HwpAdapter;
pub use hwpx::HwpxAdapter;
pub use output::{route_text, TextDestination};
pub use resources::{resource_dir, write_resources, ResourceFailure, ResourceReport};

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::detect::{self, DocumentKind};
use crate::error::Result;
use crate::model::{Document, EmbeddedResource, Metadata};

/// Immutable per-invocation configuration, threaded explicitly through
/// every call.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Surface full failure detail for diagnosis
    pub debug: bool,

    /// Recover document properties (best-effort)
    pub extract_metadata: bool,

    /// Recover embedded resources
    pub extract_resources: bool,

    /// Emit extracted text to the console stream instead of a file
    pub console: bool,

    /// Directory for text output and extracted resources
    pub output_dir: Option<PathBuf>,

    /// Password for encrypted documents
    pub password: Option<String>,
}

impl ExtractOptions {
    /// Create options with defaults (text to console, nothing extra).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable metadata recovery.
    pub fn with_metadata(mut self, extract: bool) -> Self {
        self.extract_metadata = extract;
        self
    }

    /// Enable embedded-resource recovery.
    pub fn with_resources(mut self, extract: bool) -> Self {
        self.extract_resources = extract;
        self
    }

    /// Route extracted text to the console stream.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Set the output directory for text and resources.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the document password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// The capability contract every container format satisfies.
///
/// Exactly two implementations exist, one per container kind; they share no
/// base implementation. The dispatcher hands out the interface only.
pub trait FormatAdapter: Send + Sync {
    /// The container kind this adapter handles.
    fn kind(&self) -> DocumentKind;

    /// Decode the raw container into a document tree. The decoder validates
    /// structure and password; any rejection surfaces as [`crate::Error::Decode`].
    fn decode(&self, path: &Path, options: &ExtractOptions) -> Result<Document>;

    /// Flatten the document into one string, in structural order.
    fn extract_text(&self, doc: &Document) -> Result<String>;

    /// Recover document properties. Total: absent properties stay `None`,
    /// never an error.
    fn extract_metadata(&self, doc: &Document) -> Metadata;

    /// Enumerate embedded resources. How they are reached is the adapter's
    /// business; `source` is available for formats that must re-read the
    /// raw file.
    fn extract_resources(&self, doc: &Document, source: &Path) -> Result<Vec<EmbeddedResource>>;
}

/// Select the adapter for a detected kind.
pub fn adapter_for(kind: DocumentKind) -> &'static dyn FormatAdapter {
    match kind {
        DocumentKind::Hwp => &HwpAdapter,
        DocumentKind::Hwpx => &HwpxAdapter,
    }
}

/// Outcome of one successful per-file extraction.
#[derive(Debug)]
pub struct FileOutcome {
    /// Source path
    pub path: PathBuf,

    /// The extracted text
    pub text: String,

    /// Where the extracted text went
    pub text_destination: TextDestination,

    /// Recovered properties, when requested
    pub metadata: Option<Metadata>,

    /// Resource extraction report, when requested and resources existed
    pub resources: Option<ResourceReport>,
}

/// Run the full pipeline for one file, writing console-mode text to stdout.
pub fn extract_file(path: &Path, options: &ExtractOptions) -> Result<FileOutcome> {
    let stdout = io::stdout();
    extract_with_console(path, options, &mut stdout.lock())
}

/// Run the full pipeline for one file with an injected console stream.
///
/// Order: dispatch, decode, text, routing, then resources. Resource
/// failures (per-item or whole-enumeration) are recorded in the outcome and
/// never invalidate text that was already routed.
pub fn extract_with_console<W: Write>(
    path: &Path,
    options: &ExtractOptions,
    console: &mut W,
) -> Result<FileOutcome> {
    let kind = detect::detect_kind(path)?;
    log::debug!("processing {} as {}", path.display(), kind);
    let adapter = adapter_for(kind);

    let doc = adapter.decode(path, options)?;

    let metadata = if options.extract_metadata {
        Some(adapter.extract_metadata(&doc))
    } else {
        None
    };

    let text = adapter.extract_text(&doc)?;
    let text_destination = output::route_text(&text, path, options, console)?;

    let resources = if options.extract_resources {
        match adapter.extract_resources(&doc, path) {
            Ok(items) if items.is_empty() => None,
            Ok(items) => {
                let dir = resources::resource_dir(path, options);
                Some(resources::write_resources(&dir, &items))
            }
            Err(e) => {
                log::warn!(
                    "embedded resource enumeration failed for '{}': {}",
                    path.display(),
                    e
                );
                Some(ResourceReport::enumeration_failure(path, &e))
            }
        }
    } else {
        None
    };

    Ok(FileOutcome {
        path: path.to_path_buf(),
        text,
        text_destination,
        metadata,
        resources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new()
            .with_metadata(true)
            .with_resources(true)
            .with_console(true)
            .with_password("secret")
            .with_output_dir("/tmp/out");

        assert!(options.extract_metadata);
        assert!(options.extract_resources);
        assert!(options.console);
        assert_eq!(options.password.as_deref(), Some("secret"));
        assert_eq!(options.output_dir.as_deref(), Some(Path::new("/tmp/out")));
    }

    #[test]
    fn test_adapter_dispatch_is_exhaustive() {
        assert_eq!(adapter_for(DocumentKind::Hwp).kind(), DocumentKind::Hwp);
        assert_eq!(adapter_for(DocumentKind::Hwpx).kind(), DocumentKind::Hwpx);
    }

    #[test]
    fn test_extract_unsupported_suffix_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();

        let options = ExtractOptions::new().with_output_dir(dir.path());
        let mut console = Vec::new();
        let result = extract_with_console(&path, &options, &mut console);

        assert!(matches!(
            result,
            Err(crate::Error::UnsupportedFormat(ref ext)) if ext == "txt"
        ));
        assert!(console.is_empty());
        // Only the source file exists; no .txt output, no _files dir.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
