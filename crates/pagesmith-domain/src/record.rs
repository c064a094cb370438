//! Record - the validated page design

use crate::Block;

/// Final, schema-validated page design
///
/// A record is built fresh for every pipeline run and never mutated after
/// it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Source document title (never empty)
    pub document_title: String,

    /// Title shown on the page (never empty)
    pub page_title: String,

    /// Layout identifier for the renderer (e.g. "grid-2-2")
    pub layout_hint: String,

    /// Ordered blocks; the count lies within the validated bounds
    pub items: Vec<Block>,
}

impl Record {
    /// Number of blocks
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the record has no blocks
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Bounds a record was validated against
///
/// Echoed into the persisted artifact as descriptive metadata; nothing
/// re-validates it on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    /// Minimum block count
    pub min_blocks: usize,

    /// Maximum block count
    pub max_blocks: usize,

    /// Maximum content length in characters
    pub max_content_len: usize,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_blocks: 3,
            max_blocks: 6,
            max_content_len: 50,
        }
    }
}
