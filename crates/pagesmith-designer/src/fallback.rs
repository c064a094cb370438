//! Heuristic drafts for when the model gives nothing usable
//!
//! The raw page text is cut into sentence-like segments and each segment
//! becomes one block. This path needs no network and cannot fail.

use pagesmith_domain::text::truncate;
use pagesmith_domain::{Draft, DraftBlock};

const DELIMITERS: &[char] = &[
    '。', '.', '；', ';', '！', '!', '？', '?', '|', '，', ',', '、', '\n', '\r',
];

/// Derives a draft straight from the input text
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    title_max_len: usize,
    max_segments: usize,
    max_content_len: usize,
}

impl FallbackGenerator {
    /// Create a generator with its caps
    pub fn new(title_max_len: usize, max_segments: usize, max_content_len: usize) -> Self {
        Self {
            title_max_len,
            max_segments,
            max_content_len,
        }
    }

    /// Build a draft for `page_data`, falling back to the title itself
    ///
    /// # Examples
    ///
    /// ```
    /// use pagesmith_designer::FallbackGenerator;
    ///
    /// let generator = FallbackGenerator::new(8, 4, 10);
    /// let draft = generator.draft("区块测试", "A。B。C。D。E。", "grid-2-2");
    ///
    /// assert_eq!(draft.blocks.len(), 4);
    /// assert_eq!(draft.blocks[0].title, "A");
    /// ```
    pub fn draft(&self, document_title: &str, page_data: &str, layout_hint: &str) -> Draft {
        let mut segments = split_segments(page_data);
        segments.truncate(self.max_segments);
        if segments.is_empty() {
            segments.push(document_title.trim());
        }

        let blocks = segments
            .into_iter()
            .map(|segment| {
                DraftBlock::new(
                    truncate(segment, self.title_max_len),
                    truncate(segment, self.max_content_len),
                )
            })
            .collect();

        Draft {
            document_title: Some(document_title.to_string()),
            page_title: None,
            layout_hint: Some(layout_hint.to_string()),
            blocks,
        }
    }
}

/// Split on sentence and list punctuation, keeping decimals and thousands
/// separators (`3.5`, `1,000`) intact
pub fn split_segments(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut segments = Vec::new();
    let mut start = 0;

    for (i, &(offset, c)) in chars.iter().enumerate() {
        if !DELIMITERS.contains(&c) || is_numeric_separator(&chars, i) {
            continue;
        }
        push_segment(&mut segments, &text[start..offset]);
        start = offset + c.len_utf8();
    }
    push_segment(&mut segments, &text[start..]);
    segments
}

fn is_numeric_separator(chars: &[(usize, char)], i: usize) -> bool {
    let c = chars[i].1;
    if (c != '.' && c != ',') || i == 0 {
        return false;
    }
    let before = chars[i - 1].1;
    let after = chars.get(i + 1).map(|&(_, c)| c);
    before.is_ascii_digit() && after.is_some_and(|a| a.is_ascii_digit())
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, segment: &'a str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        segments.push(segment);
    }
}
