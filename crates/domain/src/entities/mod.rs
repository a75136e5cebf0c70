//! Entity types for the turn schema and the persisted session state.
//!
//! Bound constants live next to the types they constrain (e.g.
//! [`scene::NARRATION_MIN`], [`character::RELATIONSHIP_MAX`]).

pub mod character;
pub mod game_state;
pub mod item;
pub mod lore;
pub mod quest;
pub mod scene;
pub mod scene_elements;
pub mod session;
pub mod world;

pub use character::Character;
pub use game_state::{EnvironmentalConditions, GameState, ResourceAvailability};
pub use item::{InventoryChanges, Item};
pub use lore::{LoreCategory, LoreEntry};
pub use quest::QuestObjective;
pub use scene::{DialogueLine, Scene};
pub use scene_elements::{
    AmbientEvent, EnvironmentalDiscovery, InteractiveElement, LocationDetails, ThreatUpdate,
};
pub use session::{CurrentScene, SessionSnapshot};
pub use world::WorldInfo;
