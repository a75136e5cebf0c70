//! Lore entity - world knowledge discovered during play.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const IMPORTANCE_MIN: i32 = 1;
pub const IMPORTANCE_MAX: i32 = 10;

/// One discovered piece of world knowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoreEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: LoreCategory,
    /// ISO-8601 discovery timestamp
    pub discovered_at: String,
    #[serde(default)]
    pub related_entries: Vec<String>,
    /// 1-10
    pub importance_level: i32,
}

/// Category of lore. Unrecognized categories snap to [`LoreCategory::first`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoreCategory {
    #[default]
    History,
    Character,
    Location,
    Faction,
    Event,
    Artifact,
}

impl LoreCategory {
    pub fn all() -> &'static [LoreCategory] {
        &[
            LoreCategory::History,
            LoreCategory::Character,
            LoreCategory::Location,
            LoreCategory::Faction,
            LoreCategory::Event,
            LoreCategory::Artifact,
        ]
    }

    /// First enumeration value - the snap-to default for unknown input.
    pub fn first() -> Self {
        LoreCategory::History
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoreCategory::History => "history",
            LoreCategory::Character => "character",
            LoreCategory::Location => "location",
            LoreCategory::Faction => "faction",
            LoreCategory::Event => "event",
            LoreCategory::Artifact => "artifact",
        }
    }
}

impl std::fmt::Display for LoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoreCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "history" => Ok(LoreCategory::History),
            "character" => Ok(LoreCategory::Character),
            "location" => Ok(LoreCategory::Location),
            "faction" => Ok(LoreCategory::Faction),
            "event" => Ok(LoreCategory::Event),
            "artifact" => Ok(LoreCategory::Artifact),
            _ => Err(DomainError::parse(format!(
                "Invalid lore category '{}'. Valid categories: history, character, location, faction, event, artifact",
                s
            ))),
        }
    }
}
