//! Extraction of the JSON payload from free-form model text.
//!
//! Models wrap their JSON in prose or code fences despite instructions not
//! to. The contract is: take everything from the first `{` to the last `}`
//! and try to parse that. Fences never contain braces, so they need no
//! special handling.

/// Returns the substring spanning the first `{` through the last `}`.
pub(crate) fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
