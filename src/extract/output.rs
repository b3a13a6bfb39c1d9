//! Output routing for extracted text.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::ExtractOptions;
use crate::error::{Error, Result};

/// The single destination extracted text was routed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextDestination {
    /// Written to the console-like stream
    Console,
    /// Written to this file
    File(PathBuf),
}

/// Route extracted text to exactly one destination.
///
/// Console mode wins outright: it suppresses file output even when an
/// output directory is configured. With a directory and no console flag the
/// text lands in `<dir>/<sourceStem>.txt` (UTF-8, directories created
/// first). With neither, the console stream is used.
pub fn route_text<W: Write>(
    text: &str,
    source: &Path,
    options: &ExtractOptions,
    console: &mut W,
) -> Result<TextDestination> {
    match (&options.output_dir, options.console) {
        (Some(dir), false) => {
            fs::create_dir_all(dir).map_err(|e| Error::OutputWrite {
                path: dir.clone(),
                source: e,
            })?;
            let target = dir.join(format!("{}.txt", source_stem(source)));
            fs::write(&target, text.as_bytes()).map_err(|e| Error::OutputWrite {
                path: target.clone(),
                source: e,
            })?;
            log::debug!("text saved to {}", target.display());
            Ok(TextDestination::File(target))
        }
        _ => {
            writeln!(console, "{}", text).map_err(|e| Error::OutputWrite {
                path: PathBuf::from("<console>"),
                source: e,
            })?;
            Ok(TextDestination::Console)
        }
    }
}

/// The source file's name with its suffix removed.
pub(crate) fn source_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
