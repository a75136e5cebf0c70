//! Session snapshot - the persisted, continuously-updated state for one
//! player session.
//!
//! A snapshot fully supersedes the previous one for read purposes while its
//! accumulating fields (history, discovered sets, lore, choice log) carry the
//! prior snapshot's content forward. Snapshots are keyed solely by session
//! id; concurrent writers race and the last write wins.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Map;

use super::character::Character;
use super::game_state::GameState;
use super::item::Item;
use super::lore::LoreEntry;
use super::scene::DialogueLine;
use super::scene_elements::{
    AmbientEvent, EnvironmentalDiscovery, InteractiveElement, LocationDetails, ThreatUpdate,
};
use super::world::WorldInfo;
use crate::value_objects::{ChoiceRecord, ResumeContext};

/// Rolling history log cap; oldest entries are evicted first.
pub const HISTORY_LOG_CAP: usize = 20;

/// Complete game state for save/load and scene continuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub last_updated: DateTime<Utc>,
    pub scene_tag: String,
    pub location: String,
    pub world: String,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub game_state: GameState,
    /// Rolling log, at most [`HISTORY_LOG_CAP`] entries, oldest first
    #[serde(default)]
    pub history: Vec<String>,
    pub current_scene: CurrentScene,
    pub play_time_minutes: u32,
    pub scenes_completed: u32,
    /// Accumulated set - never shrinks across turns
    #[serde(default)]
    pub discovered_locations: Vec<String>,
    /// Accumulated set - never shrinks across turns
    #[serde(default)]
    pub met_characters: Vec<String>,
    #[serde(default)]
    pub unlocked_features: Vec<String>,
    #[serde(default)]
    pub major_story_beats: Vec<String>,
    #[serde(default)]
    pub active_side_quests: Vec<String>,
    #[serde(default)]
    pub player_choices_history: Vec<ChoiceRecord>,
    #[serde(default)]
    pub world_knowledge: Map<String, serde_json::Value>,
    #[serde(default)]
    pub faction_standings: BTreeMap<String, String>,
    /// Accumulated set - deduplicated union across turns
    #[serde(default)]
    pub discovered_secrets: Vec<String>,
    #[serde(default)]
    pub triggered_events: Vec<String>,
    #[serde(default)]
    pub player_preferences: Map<String, serde_json::Value>,
    pub resume_context: ResumeContext,
    /// Append-only, not deduplicated by id
    #[serde(default)]
    pub lore_collection: Vec<LoreEntry>,
    #[serde(default)]
    pub world_info: WorldInfo,
}

/// The embedded current-scene detail persisted for reload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentScene {
    pub narration_text: String,
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub options: Vec<String>,
    pub mood_atmosphere: String,
    #[serde(default)]
    pub relationship_changes: BTreeMap<String, i32>,
    #[serde(default)]
    pub new_secrets: Vec<String>,
    #[serde(default)]
    pub interactive_elements: Vec<InteractiveElement>,
    #[serde(default)]
    pub environmental_discoveries: Vec<EnvironmentalDiscovery>,
    #[serde(default)]
    pub threat_updates: Vec<ThreatUpdate>,
    #[serde(default)]
    pub ambient_events: Vec<AmbientEvent>,
    #[serde(default)]
    pub discovered_lore: Vec<LoreEntry>,
    #[serde(default)]
    pub world_info: WorldInfo,
    #[serde(default)]
    pub location_details: LocationDetails,
}
