//! Player interaction - the closed set of action categories plus the free
//! detail attached to each action.

use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::error::DomainError;

/// Closed set of player-action categories used to contextualize generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    #[default]
    NarrativeChoice,
    CharacterInteraction,
    ItemInteraction,
    LocationInteraction,
    QuestInteraction,
    EnvironmentalInteraction,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NarrativeChoice => "narrative_choice",
            Self::CharacterInteraction => "character_interaction",
            Self::ItemInteraction => "item_interaction",
            Self::LocationInteraction => "location_interaction",
            Self::QuestInteraction => "quest_interaction",
            Self::EnvironmentalInteraction => "environmental_interaction",
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InteractionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "narrative_choice" => Ok(Self::NarrativeChoice),
            "character_interaction" => Ok(Self::CharacterInteraction),
            "item_interaction" => Ok(Self::ItemInteraction),
            "location_interaction" => Ok(Self::LocationInteraction),
            "quest_interaction" => Ok(Self::QuestInteraction),
            "environmental_interaction" => Ok(Self::EnvironmentalInteraction),
            _ => Err(DomainError::parse(format!(
                "Invalid interaction kind '{s}'"
            ))),
        }
    }
}

/// The type and details of one player action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInteraction {
    #[serde(rename = "interaction_type")]
    pub kind: InteractionKind,
    pub choice_text: String,
    #[serde(default)]
    pub choice_index: Option<u32>,
    /// Target of the interaction, when one exists (character, item, ...)
    #[serde(default)]
    pub element_id: Option<String>,
    #[serde(default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub interaction_context: Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            InteractionKind::NarrativeChoice,
            InteractionKind::CharacterInteraction,
            InteractionKind::ItemInteraction,
            InteractionKind::LocationInteraction,
            InteractionKind::QuestInteraction,
            InteractionKind::EnvironmentalInteraction,
        ] {
            assert_eq!(kind.as_str().parse::<InteractionKind>().unwrap(), kind);
        }
        assert!("dance".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&InteractionKind::CharacterInteraction).unwrap();
        assert_eq!(json, "\"character_interaction\"");
    }
}
