//! Pull a JSON object out of a raw generation blob.
//!
//! The collaborator returns prose that is supposed to contain one JSON
//! object, usually inside a ```json fence. This is a best-effort heuristic,
//! not a parser: there is no bracket-depth matching, so a blob containing
//! several independent objects can extract an incorrect span. Accepted
//! limitation.

use std::sync::OnceLock;

use regex_lite::Regex;

use super::PipelineError;

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("hardcoded pattern is valid")
    })
}

/// Locate the JSON object inside `raw` and return its literal substring.
///
/// Tries a ```json fenced block first, then falls back to the span from the
/// first `{` to the last `}`. Trailing prose after a fence does not change
/// what is extracted.
pub fn extract_json_object(raw: &str) -> Result<&str, PipelineError> {
    if let Some(captures) = fenced_json().captures(raw) {
        if let Some(body) = captures.get(1) {
            return Ok(body.as_str());
        }
    }

    let start = raw.find('{');
    let end = raw.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(PipelineError::Extraction),
    }
}
