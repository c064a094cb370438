//! Gatekeeper configuration

use crate::GatekeeperError;
use pagesmith_domain::Constraints;
use serde::{Deserialize, Serialize};

/// Titles handed out to blocks that need one, in order
pub const DEFAULT_FALLBACK_TITLES: [&str; 6] = [
    "问题痛点",
    "解决思路",
    "核心能力",
    "落地路径",
    "预期价值",
    "风险与对策",
];

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum number of blocks in a record
    pub min_blocks: usize,

    /// Maximum number of blocks in a record
    pub max_blocks: usize,

    /// Maximum block content length (characters)
    pub max_content_len: usize,

    /// Maximum block title length (characters)
    pub title_max_len: usize,

    /// Maximum page title length (characters)
    pub page_title_max_len: usize,

    /// Number of content characters that take part in duplicate detection
    pub dedup_prefix_len: usize,

    /// Pool of titles for synthesized or untitled blocks
    pub fallback_titles: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_blocks: 3,
            max_blocks: 6,
            max_content_len: 50,
            title_max_len: 15,
            page_title_max_len: 24,
            dedup_prefix_len: 10,
            fallback_titles: DEFAULT_FALLBACK_TITLES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl ValidationConfig {
    /// Set block-count bounds
    pub fn with_block_bounds(mut self, min_blocks: usize, max_blocks: usize) -> Self {
        self.min_blocks = min_blocks;
        self.max_blocks = max_blocks;
        self
    }

    /// Set the content cap
    pub fn with_max_content_len(mut self, max_content_len: usize) -> Self {
        self.max_content_len = max_content_len;
        self
    }

    /// The bounds echoed into persisted artifacts
    pub fn constraints(&self) -> Constraints {
        Constraints {
            min_blocks: self.min_blocks,
            max_blocks: self.max_blocks,
            max_content_len: self.max_content_len,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.min_blocks == 0 {
            return Err(GatekeeperError::Config(
                "min_blocks must be at least 1".to_string(),
            ));
        }
        if self.min_blocks > self.max_blocks {
            return Err(GatekeeperError::Config(format!(
                "min_blocks ({}) must not exceed max_blocks ({})",
                self.min_blocks, self.max_blocks
            )));
        }
        if self.max_content_len == 0 || self.title_max_len == 0 || self.page_title_max_len == 0 {
            return Err(GatekeeperError::Config(
                "length caps must be at least 1".to_string(),
            ));
        }
        if self.fallback_titles.iter().all(|t| t.trim().is_empty()) {
            return Err(GatekeeperError::Config(
                "fallback_titles must contain at least one non-blank title".to_string(),
            ));
        }
        Ok(())
    }
}
