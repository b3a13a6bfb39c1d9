//! Embedded resource type.

use serde::{Deserialize, Serialize};

/// A binary asset stored inside a document container.
///
/// Ownership is transient: resources are written to disk and discarded with
/// the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedResource {
    /// Original name inside the container, if it carries one
    pub name: Option<String>,

    /// Raw bytes
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
}

impl EmbeddedResource {
    /// Create a resource without a name.
    pub fn new(data: Vec<u8>) -> Self {
        Self { name: None, data }
    }

    /// Create a named resource.
    pub fn named(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: Some(name.into()),
            data,
        }
    }

    /// Output file name: the stored name, or an index-based placeholder.
    pub fn file_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("embedded_{}", index),
        }
    }

    /// Size of the resource data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_prefers_stored_name() {
        let res = EmbeddedResource::named("chart.png", vec![1, 2, 3]);
        assert_eq!(res.file_name(0), "chart.png");
        assert_eq!(res.size(), 3);
    }

    #[test]
    fn test_file_name_placeholder() {
        let res = EmbeddedResource::new(vec![]);
        assert_eq!(res.file_name(4), "embedded_4");

        let blank = EmbeddedResource::named("", vec![]);
        assert_eq!(blank.file_name(0), "embedded_0");
    }
}
