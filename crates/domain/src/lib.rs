//! Taleforge domain types.
//!
//! The canonical shape of a generated turn (scene, characters, inventory,
//! quests, world info) together with the persisted session snapshot and the
//! inbound turn context. Pure data: everything here is serde-serializable
//! and does no I/O.

pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{
    AmbientEvent, Character, CurrentScene, DialogueLine, EnvironmentalConditions,
    EnvironmentalDiscovery, GameState, InteractiveElement, InventoryChanges, Item, LocationDetails,
    LoreCategory, LoreEntry, QuestObjective, ResourceAvailability, Scene, SessionSnapshot,
    ThreatUpdate, WorldInfo,
};
pub use error::DomainError;
pub use value_objects::{
    ChoiceRecord, GameProgress, InteractionKind, PlayerInteraction, ResumeContext, SceneContext,
    TurnRequest,
};
