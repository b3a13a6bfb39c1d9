//! Adapter for the legacy binary container.

use std::path::Path;

use super::{ExtractOptions, FormatAdapter};
use crate::detect::DocumentKind;
use crate::error::Result;
use crate::model::{Document, EmbeddedResource, Metadata};
use crate::parser::hwp;
use crate::render::{self, RenderOptions};

/// Adapter for `.hwp` documents.
///
/// Embedded resources are exposed through the decoded tree: the decoder
/// reads the container's binary-data storage up front, so enumeration here
/// never touches the source file again.
#[derive(Debug, Clone, Copy, Default)]
pub struct HwpAdapter;

impl FormatAdapter for HwpAdapter {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Hwp
    }

    fn decode(&self, path: &Path, options: &ExtractOptions) -> Result<Document> {
        hwp::decode_file(path, options.password.as_deref())
    }

    fn extract_text(&self, doc: &Document) -> Result<String> {
        render::to_text(doc, &RenderOptions::default())
    }

    fn extract_metadata(&self, doc: &Document) -> Metadata {
        doc.metadata.clone()
    }

    fn extract_resources(&self, doc: &Document, _source: &Path) -> Result<Vec<EmbeddedResource>> {
        Ok(doc.resources.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_come_from_the_tree() {
        let mut doc = Document::new();
        doc.resources
            .push(EmbeddedResource::named("BIN0001.jpg", vec![0xFF, 0xD8]));

        let adapter = HwpAdapter;
        // The source path is irrelevant for the tree-exposed variant.
        let resources = adapter
            .extract_resources(&doc, Path::new("does-not-exist.hwp"))
            .unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name.as_deref(), Some("BIN0001.jpg"));
    }

    #[test]
    fn test_metadata_is_total() {
        let adapter = HwpAdapter;
        let metadata = adapter.extract_metadata(&Document::new());
        assert!(metadata.is_empty());
    }
}
