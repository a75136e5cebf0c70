//! Character entity - an NPC snapshot as it appears in one scene.

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Relationship and trust levels share the same bounded range.
pub const RELATIONSHIP_MIN: i32 = -10;
pub const RELATIONSHIP_MAX: i32 = 10;

/// Avatar reference assigned when the source gives none.
pub const DEFAULT_AVATAR: &str = "default_avatar.png";

/// An NPC present in a scene.
///
/// Optional fields are `None` when absent - never empty-string or empty-list
/// placeholders. The repair pass converts such placeholders to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Unique within a scene
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub interactable: bool,
    /// -10 to 10
    pub relationship_level: i32,
    pub current_mood: String,
    /// -10 to 10
    pub trust_level: i32,
    #[serde(default)]
    pub memories: Vec<String>,
    #[serde(default)]
    pub personal_objectives: Vec<String>,
    #[serde(default)]
    pub knowledge_flags: Map<String, serde_json::Value>,
    #[serde(default)]
    pub backstory: Option<String>,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub equipment: Option<Vec<String>>,
}
