//! Scene entity - one turn's complete generated narrative payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::character::Character;
use super::game_state::GameState;
use super::item::{InventoryChanges, Item};
use super::lore::LoreEntry;
use super::quest::QuestObjective;
use super::scene_elements::{
    AmbientEvent, EnvironmentalDiscovery, InteractiveElement, LocationDetails, ThreatUpdate,
};
use super::world::WorldInfo;

/// Narration length bounds, in characters.
pub const NARRATION_MIN: usize = 200;
pub const NARRATION_MAX: usize = 2000;

/// History entry length bounds, in characters.
pub const HISTORY_ENTRY_MIN: usize = 50;
pub const HISTORY_ENTRY_MAX: usize = 500;

/// Player option count bounds.
pub const OPTIONS_MIN: usize = 2;
pub const OPTIONS_MAX: usize = 6;

/// Options appended when the source supplies fewer than [`OPTIONS_MIN`].
pub const FILLER_OPTIONS: [&str; 2] = ["Continue", "Look around"];

/// One turn's generated content, schema-compliant after the repair pass.
///
/// Every list field defaults to empty (never absent, never null) and every
/// required scalar has a non-null default when missing from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_tag: String,
    pub location: String,
    pub world: String,
    /// 200-2000 characters
    pub narration_text: String,
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    #[serde(default)]
    pub characters: Vec<Character>,
    /// 2-6 entries
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub game_state: GameState,
    #[serde(default)]
    pub inventory_changes: InventoryChanges,
    #[serde(default)]
    pub current_inventory: Vec<Item>,
    pub mood_atmosphere: String,
    /// 50-500 characters
    pub history_entry: String,
    /// Character id -> delta, normalized to -10..10
    #[serde(default)]
    pub relationship_changes: BTreeMap<String, i32>,
    #[serde(default)]
    pub new_secrets: Vec<String>,
    #[serde(default)]
    pub new_objectives: Vec<QuestObjective>,
    #[serde(default)]
    pub completed_objectives_this_scene: Vec<String>,
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

/// One line of spoken or internal dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
    pub emotion: String,
    pub is_internal_thought: bool,
    #[serde(default)]
    pub audible_to: Vec<String>,
}
