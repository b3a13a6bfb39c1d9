//! Document kind detection and dispatch preconditions.
//!
//! Dispatch is decided by file name suffix alone; the container magic
//! helpers exist so the decoders can reject mislabeled files early with a
//! clear message instead of a confusing low-level parse failure.

use crate::error::{Error, Result};
use std::path::Path;

/// CFB/OLE2 magic signature. The legacy binary container is a compound file
/// and always starts with these 8 bytes.
pub const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// ZIP local-file-header magic. The package container is a ZIP archive.
pub const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// The two recognized document container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Legacy binary container (.hwp), a CFB compound file.
    Hwp,
    /// Package container (.hwpx), a ZIP archive of XML parts.
    Hwpx,
}

impl DocumentKind {
    /// Map a file name suffix (without the dot) to a kind.
    ///
    /// Matching is case-insensitive; anything other than `hwp`/`hwpx`
    /// returns `None`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "hwp" => Some(Self::Hwp),
            "hwpx" => Some(Self::Hwpx),
            _ => None,
        }
    }

    /// The canonical suffix for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Hwp => "hwp",
            Self::Hwpx => "hwpx",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hwp => write!(f, "HWP"),
            Self::Hwpx => write!(f, "HWPX"),
        }
    }
}

/// Decide which adapter handles `path`.
///
/// Preconditions checked in order: the path must exist (`NotFound`), must be
/// a regular file (`NotAFile`), and must carry one of the two recognized
/// suffixes (`UnsupportedFormat` with the rejected suffix otherwise). No
/// file content is read here.
pub fn detect_kind<P: AsRef<Path>>(path: P) -> Result<DocumentKind> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    DocumentKind::from_extension(&ext).ok_or(Error::UnsupportedFormat(ext))
}

/// Sniff the container kind from leading bytes, independent of the suffix.
pub fn sniff_container(data: &[u8]) -> Option<DocumentKind> {
    if data.starts_with(&CFB_MAGIC) {
        Some(DocumentKind::Hwp)
    } else if data.starts_with(&ZIP_MAGIC) {
        Some(DocumentKind::Hwpx)
    } else {
        None
    }
}
