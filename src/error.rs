//! Error types for the unhwp library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unhwp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The target path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The target path exists but is not a regular file.
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The file name suffix is not one of the recognized document kinds.
    #[error("Unsupported file format: {0} (expected .hwp or .hwpx)")]
    UnsupportedFormat(String),

    /// The decoder rejected the container. Covers structural corruption and
    /// wrong or missing passwords alike.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A document property could not be read. Non-fatal; callers degrade to
    /// an explicit "unavailable" marker instead of failing the request.
    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// Writing one embedded resource failed. Non-fatal; aggregated into the
    /// resource report without stopping the remaining resources.
    #[error("Failed to write resource '{name}': {source}")]
    ResourceWrite {
        /// Output name of the resource that failed
        name: String,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// Writing the extracted text failed. Fatal for that file only.
    #[error("Failed to write output '{}': {}", .path.display(), .source)]
    OutputWrite {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedFormat("pdf".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported file format: pdf (expected .hwp or .hwpx)"
        );

        let err = Error::NotFound(PathBuf::from("missing.hwp"));
        assert_eq!(err.to_string(), "File not found: missing.hwp");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_resource_write_display() {
        let err = Error::ResourceWrite {
            name: "image1.png".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("image1.png"));
    }
}
