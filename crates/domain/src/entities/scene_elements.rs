//! Interactive and environmental scene content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Map;

pub const SAFETY_MIN: i32 = 1;
pub const SAFETY_MAX: i32 = 10;
pub const SAFETY_DEFAULT: i32 = 5;

/// A structure or object the player can interact with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveElement {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub interaction_types: Vec<String>,
    #[serde(default)]
    pub requires_items: Vec<String>,
    #[serde(default)]
    pub unlocks_options: Vec<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub potential_outcomes: BTreeMap<String, String>,
    /// `None` when the element triggers no side quest - never an empty map.
    #[serde(default)]
    pub side_quest_trigger: Option<Map<String, serde_json::Value>>,
}

/// Something notable found in the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalDiscovery {
    pub name: String,
    pub description: String,
    pub significance: String,
    #[serde(default)]
    pub unlocks_content: Vec<String>,
}

/// Change in an active threat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatUpdate {
    pub threat_id: String,
    pub threat_name: String,
    /// 1-10
    pub escalation_level: i32,
    pub immediate_danger: bool,
    #[serde(default)]
    pub resolution_methods: Vec<String>,
    #[serde(default)]
    pub affects_npcs: Vec<String>,
}

/// Atmospheric event without direct player involvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientEvent {
    pub event_type: String,
    pub description: String,
    pub affects_mood: bool,
    #[serde(default)]
    pub creates_opportunities: Vec<String>,
}

/// Spatial detail of the current location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetails {
    #[serde(default)]
    pub exits: Vec<String>,
    #[serde(default)]
    pub hidden_areas: Vec<String>,
    #[serde(default)]
    pub resource_nodes: Vec<String>,
    /// 1-10
    pub safety_level: i32,
}

impl Default for LocationDetails {
    fn default() -> Self {
        Self {
            exits: Vec::new(),
            hidden_areas: Vec::new(),
            resource_nodes: Vec::new(),
            safety_level: SAFETY_DEFAULT,
        }
    }
}
