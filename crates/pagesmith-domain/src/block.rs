//! Block - one title/content unit of a page

use crate::text::{char_len, collapse_whitespace, prefix};

/// One structural unit of a page design
///
/// Blocks inside a [`Record`](crate::Record) are always within the configured
/// title and content caps; that guarantee comes from the schema validator, not
/// from this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    /// Short heading
    pub title: String,

    /// Body text
    pub content: String,
}

impl Block {
    /// Create a block from anything string-like
    ///
    /// # Examples
    ///
    /// ```
    /// use pagesmith_domain::Block;
    ///
    /// let block = Block::new("核心能力", "统一模板库与自动排版");
    /// assert_eq!(block.title, "核心能力");
    /// ```
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// True when both fields are empty after trimming
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }

    /// Content length in characters
    pub fn content_len(&self) -> usize {
        char_len(&self.content)
    }

    /// Deduplication key: normalized title plus the first `prefix_len`
    /// characters of the content
    ///
    /// # Examples
    ///
    /// ```
    /// use pagesmith_domain::Block;
    ///
    /// let a = Block::new("Value", "Faster delivery for every team");
    /// let b = Block::new("value ", "Faster delivery, fewer handoffs");
    /// assert_eq!(a.dedup_key(7), b.dedup_key(7));
    /// assert_ne!(a.dedup_key(20), b.dedup_key(20));
    /// ```
    pub fn dedup_key(&self, prefix_len: usize) -> (String, String) {
        (
            collapse_whitespace(&self.title).to_lowercase(),
            prefix(&collapse_whitespace(&self.content), prefix_len),
        )
    }
}
