//! Pulls the JSON object out of free-form model text.
//!
//! Models wrap their answer in markdown fences, prepend "Sure, here is..." or
//! append an explanation. Extraction runs in two steps: strip the fences, then
//! take everything from the first `{` to the last `}` and parse that.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::MalformedModelOutput;

/// Removes surrounding whitespace and markdown code-fence markers, including a
/// `json` language tag directly after the opening fence.
pub fn strip_fences(raw: &str) -> &str {
    let text = raw.trim().trim_start_matches('`');
    let text = text.strip_prefix("json").unwrap_or(text);
    text.trim_end_matches('`').trim()
}

/// The candidate JSON document: first `{` through last `}`, across newlines.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Extracts and parses the JSON object embedded in `raw`.
pub fn parse_model_json(raw: &str) -> Result<Map<String, Value>, MalformedModelOutput> {
    let span = brace_span(strip_fences(raw)).ok_or_else(|| MalformedModelOutput::from_raw(raw))?;
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(MalformedModelOutput::from_raw(raw)),
    }
}

/// Extracts the embedded object and reads it as a stage output type.
pub fn parse_stage_output<T: DeserializeOwned>(raw: &str) -> Result<T, MalformedModelOutput> {
    let map = parse_model_json(raw)?;
    serde_json::from_value(Value::Object(map)).map_err(|_| MalformedModelOutput::from_raw(raw))
}
