//! Draft - an unvalidated candidate page

use crate::{Block, Record};

/// Raw title/content pair as proposed by a generator
///
/// Nothing about a draft block is guaranteed: fields may be empty, overlong,
/// or padded with whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftBlock {
    /// Proposed heading
    pub title: String,

    /// Proposed body text
    pub content: String,
}

impl DraftBlock {
    /// Create a draft block
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Unvalidated candidate record
///
/// Produced either by decoding a language model's JSON reply or by the
/// heuristic fallback generator. Every field is optional; the schema
/// validator fills in what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Document title proposed by the generator
    pub document_title: Option<String>,

    /// Page title proposed by the generator
    pub page_title: Option<String>,

    /// Layout hint proposed by the generator
    pub layout_hint: Option<String>,

    /// Candidate blocks in proposal order
    pub blocks: Vec<DraftBlock>,
}

impl Draft {
    /// Draft with only blocks set
    pub fn with_blocks(blocks: Vec<DraftBlock>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }
}

impl From<Block> for DraftBlock {
    fn from(block: Block) -> Self {
        Self {
            title: block.title,
            content: block.content,
        }
    }
}

impl From<Record> for Draft {
    /// Turn a validated record back into a draft (used to re-validate)
    fn from(record: Record) -> Self {
        Self {
            document_title: Some(record.document_title),
            page_title: Some(record.page_title),
            layout_hint: Some(record.layout_hint),
            blocks: record.items.into_iter().map(DraftBlock::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_draft_keeps_every_field() {
        let record = Record {
            document_title: "Doc".to_string(),
            page_title: "Page".to_string(),
            layout_hint: "grid-2-2".to_string(),
            items: vec![Block::new("a", "b")],
        };

        let draft = Draft::from(record);
        assert_eq!(draft.document_title.as_deref(), Some("Doc"));
        assert_eq!(draft.page_title.as_deref(), Some("Page"));
        assert_eq!(draft.layout_hint.as_deref(), Some("grid-2-2"));
        assert_eq!(draft.blocks, vec![DraftBlock::new("a", "b")]);
    }

    #[test]
    fn test_with_blocks_leaves_titles_empty() {
        let draft = Draft::with_blocks(vec![DraftBlock::new("t", "c")]);
        assert!(draft.document_title.is_none());
        assert!(draft.page_title.is_none());
        assert_eq!(draft.blocks.len(), 1);
    }
}
