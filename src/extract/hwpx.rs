//! Adapter for the package container.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{ExtractOptions, FormatAdapter};
use crate::detect::DocumentKind;
use crate::error::{Error, Result};
use crate::model::{Document, EmbeddedResource, Metadata};
use crate::parser::hwpx;
use crate::render::{self, RenderOptions};

/// Reserved archive directory holding embedded binary assets.
const BIN_DATA_PREFIX: &str = "BinData/";

/// Adapter for `.hwpx` documents.
///
/// The decoder does not surface embedded resources, so
/// [`FormatAdapter::extract_resources`] re-opens the source file as a ZIP
/// archive and enumerates the reserved `BinData/` directory itself. That
/// re-read stays behind the adapter boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct HwpxAdapter;

impl FormatAdapter for HwpxAdapter {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Hwpx
    }

    fn decode(&self, path: &Path, options: &ExtractOptions) -> Result<Document> {
        if options.password.is_some() {
            log::debug!("package containers take no password; ignoring it");
        }
        hwpx::decode_file(path)
    }

    fn extract_text(&self, doc: &Document) -> Result<String> {
        render::to_text(doc, &RenderOptions::default())
    }

    fn extract_metadata(&self, doc: &Document) -> Metadata {
        doc.metadata.clone()
    }

    fn extract_resources(&self, _doc: &Document, source: &Path) -> Result<Vec<EmbeddedResource>> {
        let file = File::open(source)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| Error::Decode(format!("cannot re-open package archive: {}", e)))?;

        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with(BIN_DATA_PREFIX) && !name.ends_with('/'))
            .map(String::from)
            .collect();
        names.sort();

        let mut resources = Vec::new();
        for name in names {
            let mut entry = match archive.by_name(&name) {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable archive entry '{}': {}", name, e);
                    continue;
                }
            };
            let mut data = Vec::new();
            if let Err(e) = entry.read_to_end(&mut data) {
                log::warn!("skipping archive entry '{}': {}", name, e);
                continue;
            }
            let stripped = name.trim_start_matches(BIN_DATA_PREFIX);
            if stripped.is_empty() {
                continue;
            }
            resources.push(EmbeddedResource::named(stripped, data));
        }

        log::debug!("enumerated {} embedded resource(s)", resources.len());
        Ok(resources)
    }
}
