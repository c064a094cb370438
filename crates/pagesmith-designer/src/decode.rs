//! Decode a parsed model reply into a draft
//!
//! Decoding is lenient: models rename keys, emit numbers where strings were
//! asked for, or mix junk into arrays. Whatever cannot be read is skipped
//! with a warning; the schema validator fills the gaps.

use pagesmith_domain::{Draft, DraftBlock};
use serde_json::{Map, Value};
use tracing::warn;

const BLOCK_LIST_KEYS: [&str; 3] = ["blocks", "items", "content_blocks"];
const TITLE_KEYS: [&str; 2] = ["title", "sub_heading"];
const CONTENT_KEYS: [&str; 2] = ["content", "point"];

/// Build a draft from a JSON object
///
/// # Examples
///
/// ```
/// use pagesmith_designer::decode_draft;
/// use serde_json::json;
///
/// let value = json!({"page_title": "Intro", "items": [{"sub_heading": "Why", "point": 3}]});
/// let draft = decode_draft(value.as_object().unwrap());
///
/// assert_eq!(draft.page_title.as_deref(), Some("Intro"));
/// assert_eq!(draft.blocks[0].title, "Why");
/// assert_eq!(draft.blocks[0].content, "3");
/// ```
pub fn decode_draft(object: &Map<String, Value>) -> Draft {
    let blocks = BLOCK_LIST_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
        .map(|entries| decode_blocks(entries))
        .unwrap_or_default();

    Draft {
        document_title: text_field(object, &["document_title"]),
        page_title: text_field(object, &["page_title"]),
        layout_hint: text_field(object, &["layout_hint"]),
        blocks,
    }
}

fn decode_blocks(entries: &[Value]) -> Vec<DraftBlock> {
    let mut blocks = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let Some(fields) = entry.as_object() else {
            warn!("Skipping block {}: not an object", idx);
            continue;
        };
        blocks.push(DraftBlock::new(
            text_field(fields, &TITLE_KEYS).unwrap_or_default(),
            text_field(fields, &CONTENT_KEYS).unwrap_or_default(),
        ));
    }
    blocks
}

/// First key holding a scalar, rendered as text
fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Draft {
        decode_draft(value.as_object().unwrap())
    }

    #[test]
    fn test_full_object() {
        let draft = decode(json!({
            "document_title": "Doc",
            "page_title": "Page",
            "layout_hint": "grid-2-2",
            "blocks": [{"title": "A", "content": "a"}, {"title": "B", "content": "b"}]
        }));

        assert_eq!(draft.document_title.as_deref(), Some("Doc"));
        assert_eq!(draft.layout_hint.as_deref(), Some("grid-2-2"));
        assert_eq!(draft.blocks, vec![DraftBlock::new("A", "a"), DraftBlock::new("B", "b")]);
    }

    #[test]
    fn test_alternate_block_keys() {
        let draft = decode(json!({"content_blocks": [{"sub_heading": "S", "point": "P"}]}));
        assert_eq!(draft.blocks, vec![DraftBlock::new("S", "P")]);
    }

    #[test]
    fn test_blocks_key_preferred_over_items() {
        let draft = decode(json!({
            "items": [{"title": "from items"}],
            "blocks": [{"title": "from blocks"}]
        }));
        assert_eq!(draft.blocks[0].title, "from blocks");
    }

    #[test]
    fn test_scalars_are_stringified() {
        let draft = decode(json!({"blocks": [{"title": 2024, "content": true}]}));
        assert_eq!(draft.blocks, vec![DraftBlock::new("2024", "true")]);
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let draft = decode(json!({"blocks": ["loose text", null, {"title": "kept"}]}));
        assert_eq!(draft.blocks, vec![DraftBlock::new("kept", "")]);
    }

    #[test]
    fn test_object_without_blocks() {
        let draft = decode(json!({"page_title": ["not", "text"], "note": "x"}));
        assert!(draft.blocks.is_empty());
        assert!(draft.page_title.is_none());
    }
}
