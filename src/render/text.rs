//! Plain text rendering.

use crate::error::Result;
use crate::model::Document;

use super::{CleanupPipeline, RenderOptions};

/// Flatten a document to one ordered string.
///
/// Sections and paragraphs are walked in document order; control text is
/// already interleaved at its structural position by the model walkers.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut output = doc.plain_text();

    if let Some(ref cleanup_options) = options.cleanup {
        let pipeline = CleanupPipeline::new(cleanup_options.clone());
        output = pipeline.process(&output);
    }

    Ok(output.trim_matches('\n').to_string())
}
