//! Resume bookkeeping - the choice log and the reload context bundle.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Map;

use super::interaction::{InteractionKind, PlayerInteraction};
use super::progress::GameProgress;

/// One entry in the per-session choice log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub scene_tag: String,
    pub location: String,
    /// The literal choice text the player submitted
    pub choice: String,
    #[serde(rename = "interaction_type")]
    pub kind: InteractionKind,
    pub timestamp: DateTime<Utc>,
}

/// Bundle capturing the last interaction for reload purposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeContext {
    pub last_interaction: PlayerInteraction,
    pub game_progress: GameProgress,
    #[serde(default)]
    pub recent_history: Vec<String>,
    #[serde(default)]
    pub agent_hints: Map<String, serde_json::Value>,
    #[serde(default)]
    pub emergency_flags: BTreeMap<String, bool>,
    pub tension_level: i32,
    pub story_escalation_level: i32,
}
