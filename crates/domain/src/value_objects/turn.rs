//! The inbound turn context bundle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::entities::{
    AmbientEvent, Character, DialogueLine, EnvironmentalDiscovery, GameState, InteractiveElement,
    Item, LocationDetails, LoreEntry, QuestObjective, ThreatUpdate, WorldInfo,
};
use super::interaction::PlayerInteraction;
use super::progress::GameProgress;

/// The caller's view of the scene the player is acting from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneContext {
    pub scene_tag: String,
    pub location: String,
    pub world: String,
    pub narration_text: String,
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub narrative_options: Vec<String>,
    #[serde(default)]
    pub interactive_elements: Vec<InteractiveElement>,
    #[serde(default)]
    pub environmental_discoveries: Vec<EnvironmentalDiscovery>,
    pub mood_atmosphere: String,
    #[serde(default)]
    pub threat_updates: Vec<ThreatUpdate>,
    #[serde(default)]
    pub ambient_events: Vec<AmbientEvent>,
    #[serde(default)]
    pub relationship_changes: BTreeMap<String, i32>,
    #[serde(default)]
    pub new_secrets: Vec<String>,
    #[serde(default)]
    pub new_objectives: Vec<QuestObjective>,
    #[serde(default)]
    pub discovered_lore: Vec<LoreEntry>,
    #[serde(default)]
    pub world_info: WorldInfo,
    #[serde(default)]
    pub location_details: LocationDetails,
}

/// Everything a turn submission carries.
///
/// Unknown fields are ignored so older callers keep working when the schema
/// grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub session_id: String,
    pub scenes_completed: u32,
    pub user_interaction: PlayerInteraction,
    /// Legacy free-text mirror of the interaction's choice text
    pub player_choice: String,
    pub current_location: String,
    pub current_world: String,
    #[serde(default)]
    pub scene_tag: Option<String>,
    #[serde(default)]
    pub present_characters: Vec<String>,
    #[serde(default)]
    pub current_scene: SceneContext,
    #[serde(default)]
    pub current_inventory: Vec<Item>,
    #[serde(default)]
    pub game_state: GameState,
    #[serde(default)]
    pub game_progress: GameProgress,
    #[serde(default)]
    pub recent_history: Vec<String>,
    #[serde(default)]
    pub agent_hints: Map<String, serde_json::Value>,
    #[serde(default)]
    pub emergency_flags: BTreeMap<String, bool>,
}
