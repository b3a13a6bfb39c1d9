//! Embedded-resource extraction.
//!
//! Writes are best-effort: each (name, bytes) pair is an independent file,
//! and one failed pair never stops the remaining pairs. The report carries
//! both the written names and the per-resource failures for the caller to
//! surface.

use std::fs;
use std::path::{Path, PathBuf};

use super::output::source_stem;
use super::ExtractOptions;
use crate::error::Error;
use crate::model::EmbeddedResource;

/// Result of writing one batch of embedded resources.
#[derive(Debug, Default)]
pub struct ResourceReport {
    /// Directory the resources were written to
    pub directory: PathBuf,

    /// Output names written successfully, in order
    pub written: Vec<String>,

    /// Per-resource failures, in order encountered
    pub failures: Vec<ResourceFailure>,
}

impl ResourceReport {
    /// Number of files written.
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    /// True when every resource was written.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Report for a failed enumeration: nothing written, one failure naming
    /// the source container.
    pub(crate) fn enumeration_failure(source: &Path, error: &Error) -> Self {
        Self {
            directory: PathBuf::new(),
            written: Vec::new(),
            failures: vec![ResourceFailure {
                name: source.display().to_string(),
                message: error.to_string(),
            }],
        }
    }
}

/// One resource that could not be written.
#[derive(Debug, Clone)]
pub struct ResourceFailure {
    /// Output name of the resource
    pub name: String,
    /// Failure detail
    pub message: String,
}

/// The deterministic resource directory for a source file:
/// `<outputDir-or-sourceDir>/<sourceStem>_files`.
pub fn resource_dir(source: &Path, options: &ExtractOptions) -> PathBuf {
    let base = options.output_dir.clone().unwrap_or_else(|| {
        source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join(format!("{}_files", source_stem(source)))
}

/// Write each resource into `dir` as an independent file.
pub fn write_resources(dir: &Path, resources: &[EmbeddedResource]) -> ResourceReport {
    let mut report = ResourceReport {
        directory: dir.to_path_buf(),
        ..Default::default()
    };

    if let Err(e) = fs::create_dir_all(dir) {
        report.failures.push(ResourceFailure {
            name: dir.display().to_string(),
            message: format!("cannot create directory: {}", e),
        });
        return report;
    }

    for (index, resource) in resources.iter().enumerate() {
        let name = sanitize_name(&resource.file_name(index));
        let target = dir.join(&name);
        match fs::write(&target, &resource.data) {
            Ok(()) => {
                log::debug!("extracted {} ({} bytes)", name, resource.size());
                report.written.push(name);
            }
            Err(e) => {
                let failure = Error::ResourceWrite {
                    name: name.clone(),
                    source: e,
                };
                log::warn!("{}", failure);
                report.failures.push(ResourceFailure {
                    name,
                    message: failure.to_string(),
                });
            }
        }
    }

    report
}

/// Keep resource writes inside the target directory.
fn sanitize_name(name: &str) -> String {
    let flat = name.replace(['/', '\\'], "_");
    let trimmed = flat.trim_matches(['.', ' ']);
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}
