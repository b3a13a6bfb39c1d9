//! Plain-text rendering for decoded documents.

mod cleanup;
mod text;

pub use cleanup::{CleanupOptions, CleanupPipeline};
pub use text::to_text;

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Cleanup applied after flattening; `None` emits the raw flattened text
    pub cleanup: Option<CleanupOptions>,
}

impl RenderOptions {
    /// Create render options with the default cleanup pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cleanup configuration.
    pub fn with_cleanup(mut self, options: CleanupOptions) -> Self {
        self.cleanup = Some(options);
        self
    }

    /// Disable the cleanup pass entirely.
    pub fn raw(mut self) -> Self {
        self.cleanup = None;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cleanup: Some(CleanupOptions::default()),
        }
    }
}
