//! Document model types for decoded HWP/HWPX content.
//!
//! This module defines the in-memory representation produced by the two
//! container decoders. The model is container-agnostic: orchestration and
//! rendering never see which format a document came from.

mod document;
mod paragraph;
mod resource;
mod section;
mod table;

pub use document::{Document, Metadata};
pub use paragraph::{Control, ParaItem, Paragraph};
pub use resource::EmbeddedResource;
pub use section::Section;
pub use table::{Table, TableCell, TableRow};
