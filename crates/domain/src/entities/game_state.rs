//! Core persistent game state carried across turns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Map;

use super::quest::QuestObjective;

pub const HAZARD_MIN: i32 = 0;
pub const HAZARD_MAX: i32 = 10;

/// Core persistent game state.
///
/// Overwritten wholesale by each new scene ("last scene wins"); the
/// accumulating session fields live on [`super::SessionSnapshot`] instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Character id -> relationship level, normalized to -10..10
    #[serde(default)]
    pub relationships: BTreeMap<String, i32>,
    #[serde(default)]
    pub revealed_secrets: Vec<String>,
    #[serde(default)]
    pub completed_objectives: Vec<String>,
    #[serde(default)]
    pub failed_objectives: Vec<String>,
    #[serde(default)]
    pub active_objectives: Vec<QuestObjective>,
    #[serde(default)]
    pub location_flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub story_flags: Map<String, serde_json::Value>,
    /// Faction -> standing description
    #[serde(default)]
    pub reputation: BTreeMap<String, String>,
    #[serde(default)]
    pub major_events: Vec<String>,
    #[serde(default)]
    pub environmental_conditions: EnvironmentalConditions,
    #[serde(default)]
    pub resource_availability: ResourceAvailability,
}

/// Weather and hazard state for the current location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalConditions {
    pub weather: String,
    pub visibility: String,
    pub temperature: String,
    /// 0-10
    pub hazard_level: i32,
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        Self {
            weather: "clear".to_string(),
            visibility: "normal".to_string(),
            temperature: "comfortable".to_string(),
            hazard_level: 0,
        }
    }
}

/// Scarcity descriptors for survival resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAvailability {
    pub food: String,
    pub water: String,
    pub medical_supplies: String,
    pub shelter_materials: String,
    pub fuel: String,
    pub tools: String,
}

impl Default for ResourceAvailability {
    fn default() -> Self {
        Self {
            food: "moderate".to_string(),
            water: "moderate".to_string(),
            medical_supplies: "scarce".to_string(),
            shelter_materials: "moderate".to_string(),
            fuel: "scarce".to_string(),
            tools: "moderate".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environmental_defaults() {
        let conditions = EnvironmentalConditions::default();
        assert_eq!(conditions.weather, "clear");
        assert_eq!(conditions.visibility, "normal");
        assert_eq!(conditions.temperature, "comfortable");
        assert_eq!(conditions.hazard_level, 0);
    }

    #[test]
    fn test_resource_defaults() {
        let resources = ResourceAvailability::default();
        assert_eq!(resources.medical_supplies, "scarce");
        assert_eq!(resources.fuel, "scarce");
        assert_eq!(resources.food, "moderate");
    }
}
