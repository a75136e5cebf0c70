//! The turn pipeline: extract -> repair -> synthesize.
//!
//! [`decode_scene`] turns a raw generation blob into a schema-compliant
//! [`Scene`]; [`synthesis::synthesize`] folds that scene into the persisted
//! session snapshot. Field-level problems never escalate - only total
//! failure to obtain a JSON object does.

pub mod extract;
pub mod repair;
pub mod synthesis;
pub mod textual;

use chrono::{DateTime, Utc};
use serde_json::Value;
use taleforge_domain::Scene;

/// Failure kinds for the decode half of the pipeline.
///
/// Neither kind is retried; both are converted into the deterministic
/// fallback scene by the turn endpoint.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// No JSON-shaped region found in the generation output.
    #[error("no JSON object found in generation output")]
    Extraction,
    /// A JSON-shaped region was found but stayed unparsable even after
    /// textual repair.
    #[error("generation output is not valid JSON: {0}")]
    Format(String),
}

/// Decode a raw generation blob into a schema-compliant scene.
///
/// Strict parse first; the textual repair pass only runs when that fails.
/// Structural repair always runs and is total, so any parsed object yields a
/// scene.
pub fn decode_scene(raw: &str, now: DateTime<Utc>) -> Result<Scene, PipelineError> {
    let json_str = extract::extract_json_object(raw)?;

    let value = match serde_json::from_str::<Value>(json_str) {
        Ok(value) => value,
        Err(first_err) => {
            tracing::debug!(error = %first_err, "strict parse failed, applying textual repair");
            let fixed = textual::fix_json_common_errors(json_str);
            serde_json::from_str::<Value>(&fixed).map_err(|e| {
                let snippet: String = fixed.chars().take(500).collect();
                PipelineError::Format(format!("{e}; problematic snippet: {snippet}"))
            })?
        }
    };

    if !value.is_object() {
        return Err(PipelineError::Format("top-level value is not an object".to_string()));
    }

    Ok(repair::repair_scene(&value, now))
}
