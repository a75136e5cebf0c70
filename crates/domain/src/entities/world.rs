//! World info entity - the setting the session plays out in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Description of the active world.
///
/// The historical timeline is an ordered list of period -> events groupings,
/// e.g. `[{"The Long Winter": ["The river froze", "The old keep fell"]}]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub name: String,
    pub theme: String,
    pub description: String,
    #[serde(default)]
    pub key_locations: Vec<String>,
    #[serde(default)]
    pub dominant_factions: Vec<String>,
    #[serde(default)]
    pub major_threats: Vec<String>,
    #[serde(default)]
    pub cultural_notes: Vec<String>,
    #[serde(default)]
    pub historical_timeline: Vec<BTreeMap<String, Vec<String>>>,
}
