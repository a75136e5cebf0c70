//! Item entity - objects carried, gained, lost, or modified during a turn.
//!
//! Items appear in four contexts: the current inventory snapshot and the
//! three delta lists of [`InventoryChanges`]. The generation collaborator may
//! emit a bare item name; the repair pass upgrades it to a full `Item`.

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Durability is a percentage of the item's intact state.
pub const DURABILITY_MIN: i32 = 0;
pub const DURABILITY_MAX: i32 = 100;

/// Item type assigned when the source gives none.
pub const DEFAULT_ITEM_TYPE: &str = "misc";

/// An object that can be possessed or interacted with.
///
/// A data-carrying struct with no invariants to protect beyond the durability
/// range, which the repair pass enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: i64,
    pub description: String,
    /// 0-100
    pub durability: i32,
    pub item_type: String,
    /// Item-specific properties (free-form)
    #[serde(default)]
    pub properties: Map<String, serde_json::Value>,
}

impl Item {
    /// Build the full item a bare name string upgrades to.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("A mysterious item named {name}."),
            name,
            quantity: 1,
            durability: DURABILITY_MAX,
            item_type: DEFAULT_ITEM_TYPE.to_string(),
            properties: Map::new(),
        }
    }
}

/// Inventory deltas for one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryChanges {
    #[serde(default)]
    pub added_items: Vec<Item>,
    #[serde(default)]
    pub removed_items: Vec<Item>,
    #[serde(default)]
    pub modified_items: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_name() {
        let item = Item::from_name("rusty key");
        assert_eq!(item.name, "rusty key");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.durability, DURABILITY_MAX);
        assert_eq!(item.item_type, DEFAULT_ITEM_TYPE);
        assert!(item.description.contains("rusty key"));
        assert!(item.properties.is_empty());
    }
}
