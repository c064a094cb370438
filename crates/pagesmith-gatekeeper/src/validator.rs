//! Draft normalization and record checking

use crate::{GatekeeperError, ValidationConfig};
use pagesmith_domain::text::{char_len, collapse_whitespace, dedup_by_key, prefix, truncate};
use pagesmith_domain::{Block, Constraints, Draft, Record};
use std::collections::HashSet;
use tracing::debug;

/// Suffix rounds tried before the title pool is considered exhausted
const MAX_SUFFIX_ROUNDS: usize = 1000;

/// Caller-side inputs to a normalization run
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    /// Title of the source document, used when the draft has none
    pub document_title: &'a str,

    /// Layout hint that overrides whatever the draft proposes
    pub layout_hint_override: Option<&'a str>,

    /// Layout hint used when neither caller nor draft provide one
    pub layout_hint_default: &'a str,
}

impl<'a> NormalizeContext<'a> {
    /// Context without a layout override
    pub fn new(document_title: &'a str, layout_hint_default: &'a str) -> Self {
        Self {
            document_title,
            layout_hint_override: None,
            layout_hint_default,
        }
    }

    /// Force a layout hint
    pub fn with_layout_override(mut self, layout_hint: Option<&'a str>) -> Self {
        self.layout_hint_override = layout_hint;
        self
    }
}

/// A structural rule a record breaks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Fewer blocks than the minimum
    TooFewBlocks {
        /// Actual count
        count: usize,
        /// Required minimum
        min: usize,
    },

    /// More blocks than the maximum
    TooManyBlocks {
        /// Actual count
        count: usize,
        /// Allowed maximum
        max: usize,
    },

    /// Document title is empty
    EmptyDocumentTitle,

    /// Page title is empty
    EmptyPageTitle,

    /// Page title exceeds its cap
    PageTitleTooLong(usize),

    /// Block at index has an empty title
    EmptyTitle(usize),

    /// Block at index has a title over the cap
    TitleTooLong(usize),

    /// Block at index has content over the cap
    ContentTooLong(usize),

    /// Block at index repeats the key of an earlier block
    DuplicateBlock(usize),
}

/// Validates drafts into records
///
/// # Examples
///
/// ```
/// use pagesmith_domain::{Draft, DraftBlock};
/// use pagesmith_gatekeeper::{NormalizeContext, SchemaValidator, ValidationConfig};
///
/// let config = ValidationConfig::default().with_block_bounds(1, 2);
/// let validator = SchemaValidator::new(config).unwrap();
///
/// let draft = Draft::with_blocks(vec![
///     DraftBlock::new("a", "short"),
///     DraftBlock::new("b", "the longest content"),
///     DraftBlock::new("c", "medium text"),
/// ]);
/// let record = validator.normalize(draft, &NormalizeContext::new("Doc", "grid-2-2")).unwrap();
///
/// let titles: Vec<_> = record.items.iter().map(|b| b.title.as_str()).collect();
/// assert_eq!(titles, vec!["b", "c"]);
/// ```
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    config: ValidationConfig,
}

impl SchemaValidator {
    /// Create a validator, rejecting an inconsistent configuration
    pub fn new(config: ValidationConfig) -> Result<Self, GatekeeperError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// The bounds records are validated against
    pub fn constraints(&self) -> Constraints {
        self.config.constraints()
    }

    /// Coerce a draft into a record that satisfies every bound
    ///
    /// Runs the block pipeline in a fixed order: truncate, drop blanks,
    /// deduplicate, keep the longest when over the maximum, pad from the
    /// title pool when under the minimum, title untitled blocks, and a final
    /// re-truncation.
    ///
    /// # Errors
    ///
    /// Fails only when neither the draft nor the context carry a non-blank
    /// document title.
    pub fn normalize(
        &self,
        draft: Draft,
        context: &NormalizeContext<'_>,
    ) -> Result<Record, GatekeeperError> {
        let cfg = &self.config;

        let document_title = non_empty(draft.document_title.as_deref().map(collapse_whitespace))
            .or_else(|| non_empty(Some(collapse_whitespace(context.document_title))))
            .ok_or(GatekeeperError::MissingDocumentTitle)?;

        let page_title = non_empty(
            draft
                .page_title
                .as_deref()
                .map(|t| truncate(t, cfg.page_title_max_len)),
        )
        .unwrap_or_else(|| self.derive_page_title(&document_title));

        let layout_hint = non_empty(context.layout_hint_override.map(collapse_whitespace))
            .or_else(|| non_empty(draft.layout_hint.as_deref().map(collapse_whitespace)))
            .unwrap_or_else(|| collapse_whitespace(context.layout_hint_default));

        let proposed = draft.blocks.len();

        // 1. Per-field truncation
        let blocks: Vec<Block> = draft
            .blocks
            .into_iter()
            .map(|b| self.truncate_block(Block::new(b.title, b.content)))
            // 2. Blank removal
            .filter(|b| !b.is_blank())
            .collect();

        // 3. Deduplication
        let prefix_len = cfg.dedup_prefix_len;
        let mut blocks = dedup_by_key(blocks, |b| b.dedup_key(prefix_len));

        // 4. Keep the longest when over the maximum
        if blocks.len() > cfg.max_blocks {
            blocks.sort_by_key(|b| std::cmp::Reverse(b.content_len()));
            blocks.truncate(cfg.max_blocks);
        }

        let mut used_titles: HashSet<String> = blocks
            .iter()
            .filter(|b| !b.title.is_empty())
            .map(|b| title_key(&b.title))
            .collect();

        // 5. Pad from the caller's title when under the minimum
        let padding = cfg.min_blocks.saturating_sub(blocks.len());
        let padding_source = non_empty(Some(collapse_whitespace(context.document_title)))
            .unwrap_or_else(|| document_title.clone());
        let padding_content = truncate(&padding_source, cfg.max_content_len);
        for _ in 0..padding {
            let title = self.next_unused_title(&mut used_titles);
            blocks.push(Block::new(title, padding_content.clone()));
        }

        // 6. Title untitled blocks
        for block in blocks.iter_mut().filter(|b| b.title.is_empty()) {
            block.title = self.next_unused_title(&mut used_titles);
        }

        // 7. Final pass
        let items: Vec<Block> = blocks
            .into_iter()
            .map(|b| self.truncate_block(b))
            .collect();

        debug!(
            "Normalized {} proposed blocks into {} ({} padded)",
            proposed,
            items.len(),
            padding
        );

        Ok(Record {
            document_title,
            page_title,
            layout_hint,
            items,
        })
    }

    /// List every rule a record breaks (empty for a valid record)
    pub fn check(&self, record: &Record) -> Vec<Violation> {
        let cfg = &self.config;
        let mut violations = Vec::new();

        if record.document_title.trim().is_empty() {
            violations.push(Violation::EmptyDocumentTitle);
        }
        if record.page_title.trim().is_empty() {
            violations.push(Violation::EmptyPageTitle);
        }
        let page_len = char_len(&record.page_title);
        if page_len > cfg.page_title_max_len {
            violations.push(Violation::PageTitleTooLong(page_len));
        }

        let count = record.items.len();
        if count < cfg.min_blocks {
            violations.push(Violation::TooFewBlocks {
                count,
                min: cfg.min_blocks,
            });
        }
        if count > cfg.max_blocks {
            violations.push(Violation::TooManyBlocks {
                count,
                max: cfg.max_blocks,
            });
        }

        let mut seen = HashSet::new();
        for (index, block) in record.items.iter().enumerate() {
            if block.title.trim().is_empty() {
                violations.push(Violation::EmptyTitle(index));
            }
            if char_len(&block.title) > cfg.title_max_len {
                violations.push(Violation::TitleTooLong(index));
            }
            if block.content_len() > cfg.max_content_len {
                violations.push(Violation::ContentTooLong(index));
            }
            if !seen.insert(block.dedup_key(cfg.dedup_prefix_len)) {
                violations.push(Violation::DuplicateBlock(index));
            }
        }

        violations
    }

    fn truncate_block(&self, block: Block) -> Block {
        Block {
            title: truncate(&block.title, self.config.title_max_len),
            content: truncate(&block.content, self.config.max_content_len),
        }
    }

    fn derive_page_title(&self, document_title: &str) -> String {
        let cap = self.config.page_title_max_len;
        let derived = truncate(document_title, cap);
        if derived.is_empty() {
            // Title made only of punctuation: keep it rather than go blank
            prefix(document_title, cap).trim_end().to_string()
        } else {
            derived
        }
    }

    /// Next pool title not yet used, cycling with numeric suffixes
    ///
    /// Suffixed titles are built to fit the title cap, so the suffix survives
    /// truncation.
    fn next_unused_title(&self, used: &mut HashSet<String>) -> String {
        let cap = self.config.title_max_len;
        let pool: Vec<&str> = self
            .config
            .fallback_titles
            .iter()
            .map(|t| t.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect();

        for round in 0..MAX_SUFFIX_ROUNDS {
            for entry in &pool {
                let candidate = if round == 0 {
                    truncate(entry, cap)
                } else {
                    let suffix = (round + 1).to_string();
                    let Some(room) = cap.checked_sub(suffix.len()) else {
                        continue;
                    };
                    format!("{}{}", truncate(entry, room), suffix)
                };

                if candidate.is_empty() {
                    continue;
                }
                if used.insert(title_key(&candidate)) {
                    return candidate;
                }
            }
        }

        // Only reachable with a tiny title cap and a huge block minimum
        truncate(pool.first().copied().unwrap_or("-"), cap)
    }
}

fn title_key(title: &str) -> String {
    collapse_whitespace(title).to_lowercase()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
