//! Quest objective entity.

use serde::{Deserialize, Serialize};

pub const PROGRESS_MIN: i32 = 0;
pub const PROGRESS_MAX: i32 = 100;

/// Escalation, importance, tension, and safety levels share this range.
pub const LEVEL_MIN: i32 = 1;
pub const LEVEL_MAX: i32 = 10;

/// One objective the player can pursue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestObjective {
    pub id: String,
    pub description: String,
    pub quest_type: String,
    pub completed: bool,
    #[serde(default)]
    pub involves_npcs: Vec<String>,
    /// 0-100
    pub progress: i32,
    /// 1-10
    pub escalation_level: i32,
    /// `None` when the objective has no rewards - never an empty list.
    #[serde(default)]
    pub rewards: Option<Vec<String>>,
    /// `None` when untimed - never an empty string.
    #[serde(default)]
    pub time_limit: Option<String>,
}
