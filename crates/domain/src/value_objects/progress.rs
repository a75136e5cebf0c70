//! Overall game progression context supplied by the caller.
//!
//! The engine trusts this bookkeeping rather than computing it: play time,
//! scene counters, and the knowledge/standing/preference maps flow from here
//! into the persisted snapshot unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Context about overall game progression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    pub scenes_completed: u32,
    pub play_time_minutes: u32,
    /// 1-10
    pub story_escalation_level: i32,
    /// 1-10
    pub tension_level: i32,
    #[serde(default)]
    pub major_story_beats: Vec<String>,
    #[serde(default)]
    pub active_themes: Vec<String>,
    #[serde(default)]
    pub world_knowledge: Map<String, serde_json::Value>,
    #[serde(default)]
    pub faction_standings: BTreeMap<String, String>,
    #[serde(default)]
    pub player_preferences: Map<String, serde_json::Value>,
    #[serde(default)]
    pub preferred_interaction_types: Vec<String>,
}

impl GameProgress {
    /// Read a list-of-strings entry out of the player preference map.
    ///
    /// The preference map is free-form; non-list values and non-string
    /// elements are ignored.
    pub fn preference_list(&self, key: &str) -> Vec<String> {
        self.player_preferences
            .get(key)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preference_list_filters_non_strings() {
        let mut progress = GameProgress::default();
        progress.player_preferences.insert(
            "unlocked_features".to_string(),
            json!(["map", 3, "journal", null]),
        );
        assert_eq!(
            progress.preference_list("unlocked_features"),
            vec!["map".to_string(), "journal".to_string()]
        );
        assert!(progress.preference_list("missing").is_empty());
    }
}
