//! Text normalization primitives
//!
//! Every length in Pagesmith is measured in Unicode scalar values, so a
//! 10-character cap holds ten CJK characters just as it holds ten ASCII
//! letters.

use std::collections::HashSet;
use std::hash::Hash;

/// Punctuation removed from the end of a string that was cut short.
pub const TRAILING_PUNCTUATION: &[char] = &[
    '，', '、', '；', '。', '：', '！', '？', ',', '.', '!', ';', ':', '?',
];

/// Count characters (not bytes)
///
/// # Examples
///
/// ```
/// use pagesmith_domain::text::char_len;
///
/// assert_eq!(char_len("abc"), 3);
/// assert_eq!(char_len("区块测试"), 4);
/// ```
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Trim the string and collapse every internal whitespace run to one space
///
/// # Examples
///
/// ```
/// use pagesmith_domain::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize whitespace and cut the text to at most `limit` characters
///
/// Text that already fits is returned with only whitespace normalized.
/// Text that is cut loses any trailing punctuation at the cut point, so the
/// result never ends in a dangling comma or period.
///
/// The function is idempotent: `truncate(truncate(s, n), n) == truncate(s, n)`.
///
/// # Examples
///
/// ```
/// use pagesmith_domain::text::truncate;
///
/// assert_eq!(truncate("short", 10), "short");
/// assert_eq!(truncate("hello, world", 6), "hello");
/// assert_eq!(truncate("一二三，四五六", 4), "一二三");
/// ```
pub fn truncate(s: &str, limit: usize) -> String {
    let collapsed = collapse_whitespace(s);
    if char_len(&collapsed) <= limit {
        return collapsed;
    }

    let cut: String = collapsed.chars().take(limit).collect();
    cut.trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c.is_whitespace())
        .to_string()
}

/// First `n` characters of a string
pub fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Remove later items whose key was already seen, preserving first-seen order
///
/// # Examples
///
/// ```
/// use pagesmith_domain::text::dedup_by_key;
///
/// let words = vec!["a", "b", "a", "c", "b"];
/// assert_eq!(dedup_by_key(words, |w| *w), vec!["a", "b", "c"]);
/// ```
pub fn dedup_by_key<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len("区块"), 2);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace("   "), "");
        assert_eq!(collapse_whitespace("a  b\n\nc"), "a b c");
    }

    #[test]
    fn test_truncate_within_limit_is_unchanged() {
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("  abc  ", 3), "abc");
    }

    #[test]
    fn test_truncate_strips_trailing_punctuation() {
        assert_eq!(truncate("abc, def", 4), "abc");
        assert_eq!(truncate("数据驱动。自动排版", 5), "数据驱动");
        assert_eq!(truncate("a.!?;b", 5), "a");
    }

    #[test]
    fn test_truncate_keeps_punctuation_when_not_cut() {
        assert_eq!(truncate("done.", 5), "done.");
    }

    #[test]
    fn test_truncate_zero_limit() {
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    fn test_truncate_all_punctuation_becomes_empty() {
        assert_eq!(truncate("。。。。。。", 3), "");
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let samples = ["hello, world and more", "区块测试，第二段。", "  spaced   out  ", ""];
        for s in samples {
            for limit in 0..12 {
                let once = truncate(s, limit);
                assert_eq!(truncate(&once, limit), once, "input {:?} limit {}", s, limit);
                assert!(char_len(&once) <= limit);
            }
        }
    }

    #[test]
    fn test_prefix() {
        assert_eq!(prefix("abcdef", 3), "abc");
        assert_eq!(prefix("ab", 3), "ab");
        assert_eq!(prefix("区块测试", 2), "区块");
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let items = vec![(1, "x"), (2, "y"), (1, "z"), (3, "x")];
        let deduped = dedup_by_key(items, |(k, _)| *k);
        assert_eq!(deduped, vec![(1, "x"), (2, "y"), (3, "x")]);
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn truncate_fits_and_is_stable(s in "\\PC{0,40}", limit in 0usize..30) {
                let once = truncate(&s, limit);
                prop_assert!(char_len(&once) <= limit);
                prop_assert_eq!(truncate(&once, limit), once.clone());
                prop_assert_eq!(collapse_whitespace(&once), once);
            }
        }
    }
}
