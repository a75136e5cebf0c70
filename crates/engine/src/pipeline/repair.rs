//! Structural repair: coerce an arbitrary decoded JSON object into a
//! schema-compliant [`Scene`].
//!
//! This is a total function. Every schema field declares the source
//! representations it accepts (string, number, object, list) and a pure
//! coercion per representation; anything else falls back to the field's
//! documented default. Missing fields default, out-of-range numerics clamp,
//! bounded strings pad to placeholder or truncate with an ellipsis marker,
//! and optional fields expressed as empty strings/lists/maps become `None`.
//! Field-level substitutions are never surfaced to the caller - only traced.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use taleforge_domain::entities::character::{
    Character, DEFAULT_AVATAR, RELATIONSHIP_MAX, RELATIONSHIP_MIN,
};
use taleforge_domain::entities::game_state::{
    EnvironmentalConditions, GameState, ResourceAvailability, HAZARD_MAX, HAZARD_MIN,
};
use taleforge_domain::entities::item::{Item, InventoryChanges, DURABILITY_MAX, DURABILITY_MIN};
use taleforge_domain::entities::lore::{LoreCategory, LoreEntry, IMPORTANCE_MAX, IMPORTANCE_MIN};
use taleforge_domain::entities::quest::{
    QuestObjective, LEVEL_MAX, LEVEL_MIN, PROGRESS_MAX, PROGRESS_MIN,
};
use taleforge_domain::entities::scene::{
    DialogueLine, Scene, FILLER_OPTIONS, HISTORY_ENTRY_MAX, HISTORY_ENTRY_MIN, NARRATION_MAX,
    NARRATION_MIN, OPTIONS_MAX, OPTIONS_MIN,
};
use taleforge_domain::entities::scene_elements::{
    AmbientEvent, EnvironmentalDiscovery, InteractiveElement, LocationDetails, ThreatUpdate,
    SAFETY_DEFAULT, SAFETY_MAX, SAFETY_MIN,
};
use taleforge_domain::entities::world::WorldInfo;

/// Repair an arbitrary decoded JSON value into a schema-compliant scene.
///
/// `now` stamps lore entries that arrive without a discovery timestamp.
pub fn repair_scene(value: &Value, now: DateTime<Utc>) -> Scene {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);

    Scene {
        scene_tag: required_string(obj.get("scene_tag"), "default_scene_tag"),
        location: required_string(obj.get("location"), "default_location"),
        world: required_string(obj.get("world"), "default_world"),
        narration_text: bounded_text(
            obj.get("narration_text"),
            NARRATION_MIN,
            NARRATION_MAX,
            "narration",
        ),
        dialogue: object_entries(obj.get("dialogue"))
            .into_iter()
            .map(dialogue_from_obj)
            .collect(),
        characters: object_entries(obj.get("characters"))
            .into_iter()
            .map(character_from_obj)
            .collect(),
        options: repair_options(obj.get("options")),
        game_state: game_state_from_value(obj.get("game_state")),
        inventory_changes: inventory_changes_from_value(obj.get("inventory_changes")),
        current_inventory: item_list(obj.get("current_inventory")),
        mood_atmosphere: required_string(obj.get("mood_atmosphere"), "neutral"),
        history_entry: bounded_text(
            obj.get("history_entry"),
            HISTORY_ENTRY_MIN,
            HISTORY_ENTRY_MAX,
            "history entry",
        ),
        relationship_changes: relationship_map(obj.get("relationship_changes")),
        new_secrets: string_list(obj.get("new_secrets")),
        new_objectives: object_entries(obj.get("new_objectives"))
            .into_iter()
            .map(quest_from_obj)
            .collect(),
        completed_objectives_this_scene: string_list(obj.get("completed_objectives_this_scene")),
        interactive_elements: object_entries(obj.get("interactive_elements"))
            .into_iter()
            .map(interactive_element_from_obj)
            .collect(),
        environmental_discoveries: object_entries(obj.get("environmental_discoveries"))
            .into_iter()
            .map(discovery_from_obj)
            .collect(),
        threat_updates: object_entries(obj.get("threat_updates"))
            .into_iter()
            .map(threat_from_obj)
            .collect(),
        ambient_events: object_entries(obj.get("ambient_events"))
            .into_iter()
            .map(ambient_from_obj)
            .collect(),
        discovered_lore: object_entries(obj.get("discovered_lore"))
            .into_iter()
            .map(|lore| lore_from_obj(lore, now))
            .collect(),
        world_info: world_info_from_value(obj.get("world_info")),
        location_details: location_details_from_value(obj.get("location_details")),
    }
}

// =============================================================================
// Scalar coercions
// =============================================================================

/// Numeric coercion across accepted representations: integers, floats,
/// numeric strings, and "N/M" strings (the numerator is taken).
fn coerce_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<i64>() {
                Some(v)
            } else if let Some((numerator, _)) = s.split_once('/') {
                numerator.trim().parse::<i64>().ok()
            } else {
                s.parse::<f64>().ok().map(|f| f as i64)
            }
        }
        _ => None,
    }
}

/// Clamp into `[lo, hi]`, substituting `default` when no coercion applies.
fn bounded_int(value: Option<&Value>, lo: i32, hi: i32, default: i32) -> i32 {
    match coerce_int(value) {
        Some(v) => v.clamp(lo as i64, hi as i64) as i32,
        None => default,
    }
}

/// Required string: scalars stringify, anything else takes the default.
fn required_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

fn coerce_bool(value: Option<&Value>, default: bool) -> bool {
    value.and_then(Value::as_bool).unwrap_or(default)
}

/// Length-bounded string: short or missing values substitute placeholder
/// text meeting the minimum, long values truncate with an ellipsis marker.
fn bounded_text(value: Option<&Value>, min: usize, max: usize, label: &str) -> String {
    let text = match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    let len = text.chars().count();
    if len < min {
        tracing::trace!(field = label, length = len, minimum = min, "padding to placeholder");
        return placeholder_text(label, min);
    }
    if len > max {
        tracing::trace!(field = label, length = len, maximum = max, "truncating");
        let mut truncated: String = text.chars().take(max - 3).collect();
        truncated.push_str("...");
        return truncated;
    }
    text
}

/// Deterministic placeholder of at least `min` characters.
fn placeholder_text(label: &str, min: usize) -> String {
    let base = format!("Default {label} content to meet minimum length requirement.");
    let mut out = base.clone();
    while out.chars().count() < min {
        out.push(' ');
        out.push_str(&base);
    }
    out
}

/// Optional string: empty strings are explicit "no data" and become `None`.
fn optional_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn display_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// =============================================================================
// Collection coercions
// =============================================================================

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(display_string).collect())
        .unwrap_or_default()
}

/// Optional list: empty and non-list inputs are "no data" and become `None`.
fn optional_string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value.and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {
            Some(items.iter().filter_map(display_string).collect())
        }
        _ => None,
    }
}

fn object_entries(value: Option<&Value>) -> Vec<&Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

fn json_map(value: Option<&Value>) -> Map<String, Value> {
    value.and_then(Value::as_object).cloned().unwrap_or_default()
}

fn bool_map(value: Option<&Value>) -> BTreeMap<String, bool> {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                .collect()
        })
        .unwrap_or_default()
}

fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| display_string(v).map(|s| (k.clone(), s)))
                .collect()
        })
        .unwrap_or_default()
}

/// Dedicated normalization for relationship maps: every value becomes an
/// integer in `[-10, 10]`. Accepts plain numbers, "N/M" strings (N is
/// taken), and objects carrying a `relationship_level`; everything else is 0.
fn relationship_map(value: Option<&Value>) -> BTreeMap<String, i32> {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| {
                    let level = match v {
                        Value::Object(inner) => {
                            bounded_int(inner.get("relationship_level"), RELATIONSHIP_MIN, RELATIONSHIP_MAX, 0)
                        }
                        other => bounded_int(Some(other), RELATIONSHIP_MIN, RELATIONSHIP_MAX, 0),
                    };
                    (k.clone(), level)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Item-like entries accept a bare name string or a structured object;
/// anything else is dropped.
fn item_list(value: Option<&Value>) -> Vec<Item> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(item_from_value).collect())
        .unwrap_or_default()
}

fn item_from_value(value: &Value) -> Option<Item> {
    match value {
        Value::String(name) => Some(Item::from_name(name.clone())),
        Value::Object(obj) => {
            let name = required_string(obj.get("name"), "unknown_item");
            Some(Item {
                quantity: coerce_int(obj.get("quantity")).unwrap_or(1),
                description: match optional_string(obj.get("description")) {
                    Some(description) => description,
                    None => format!("No description for {name}"),
                },
                durability: bounded_int(
                    obj.get("durability"),
                    DURABILITY_MIN,
                    DURABILITY_MAX,
                    DURABILITY_MAX,
                ),
                item_type: required_string(obj.get("item_type"), "misc"),
                properties: json_map(obj.get("properties")),
                name,
            })
        }
        _ => None,
    }
}

// =============================================================================
// Nested structure builders
// =============================================================================

fn dialogue_from_obj(obj: &Map<String, Value>) -> DialogueLine {
    DialogueLine {
        speaker: required_string(obj.get("speaker"), "unknown"),
        text: required_string(obj.get("text"), ""),
        emotion: required_string(obj.get("emotion"), "neutral"),
        is_internal_thought: coerce_bool(obj.get("is_internal_thought"), false),
        audible_to: string_list(obj.get("audible_to")),
    }
}

fn character_from_obj(obj: &Map<String, Value>) -> Character {
    let avatar = match optional_string(obj.get("avatar")) {
        Some(avatar) => avatar,
        None => DEFAULT_AVATAR.to_string(),
    };

    Character {
        id: required_string(obj.get("id"), "default_id"),
        name: required_string(obj.get("name"), "default_name"),
        avatar,
        interactable: coerce_bool(obj.get("interactable"), true),
        relationship_level: bounded_int(
            obj.get("relationship_level"),
            RELATIONSHIP_MIN,
            RELATIONSHIP_MAX,
            0,
        ),
        current_mood: required_string(obj.get("current_mood"), "default_current_mood"),
        trust_level: bounded_int(obj.get("trust_level"), RELATIONSHIP_MIN, RELATIONSHIP_MAX, 0),
        memories: string_list(obj.get("memories")),
        personal_objectives: string_list(obj.get("personal_objectives")),
        knowledge_flags: json_map(obj.get("knowledge_flags")),
        backstory: optional_string(obj.get("backstory")),
        faction: optional_string(obj.get("faction")),
        skills: optional_string_list(obj.get("skills")),
        equipment: optional_string_list(obj.get("equipment")),
    }
}

fn quest_from_obj(obj: &Map<String, Value>) -> QuestObjective {
    let time_limit = optional_string(obj.get("time_limit")).filter(|s| s != "None");

    QuestObjective {
        id: required_string(obj.get("id"), "default_id"),
        description: required_string(obj.get("description"), "default_description"),
        quest_type: required_string(obj.get("quest_type"), "default_quest_type"),
        completed: coerce_bool(obj.get("completed"), false),
        involves_npcs: string_list(obj.get("involves_npcs")),
        progress: bounded_int(obj.get("progress"), PROGRESS_MIN, PROGRESS_MAX, 0),
        escalation_level: bounded_int(obj.get("escalation_level"), LEVEL_MIN, LEVEL_MAX, 1),
        rewards: optional_string_list(obj.get("rewards")),
        time_limit,
    }
}

fn lore_from_obj(obj: &Map<String, Value>, now: DateTime<Utc>) -> LoreEntry {
    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<LoreCategory>().ok())
        .unwrap_or_else(LoreCategory::first);

    let discovered_at = match optional_string(obj.get("discovered_at")) {
        Some(at) => at,
        None => now.to_rfc3339(),
    };

    LoreEntry {
        id: required_string(obj.get("id"), "default_id"),
        title: required_string(obj.get("title"), "default_title"),
        content: required_string(obj.get("content"), "default_content"),
        category,
        discovered_at,
        related_entries: string_list(obj.get("related_entries")),
        importance_level: bounded_int(
            obj.get("importance_level"),
            IMPORTANCE_MIN,
            IMPORTANCE_MAX,
            1,
        ),
    }
}

fn threat_from_obj(obj: &Map<String, Value>) -> ThreatUpdate {
    ThreatUpdate {
        threat_id: required_string(obj.get("threat_id"), "default_threat_id"),
        threat_name: required_string(obj.get("threat_name"), "default_threat_name"),
        escalation_level: bounded_int(obj.get("escalation_level"), LEVEL_MIN, LEVEL_MAX, 1),
        immediate_danger: coerce_bool(obj.get("immediate_danger"), false),
        resolution_methods: string_list(obj.get("resolution_methods")),
        affects_npcs: string_list(obj.get("affects_npcs")),
    }
}

fn ambient_from_obj(obj: &Map<String, Value>) -> AmbientEvent {
    AmbientEvent {
        event_type: required_string(obj.get("event_type"), "default_event_type"),
        description: required_string(obj.get("description"), "default_description"),
        affects_mood: coerce_bool(obj.get("affects_mood"), false),
        creates_opportunities: string_list(obj.get("creates_opportunities")),
    }
}

fn discovery_from_obj(obj: &Map<String, Value>) -> EnvironmentalDiscovery {
    EnvironmentalDiscovery {
        name: required_string(obj.get("name"), "default_name"),
        description: required_string(obj.get("description"), "default_description"),
        significance: required_string(obj.get("significance"), "default_significance"),
        unlocks_content: string_list(obj.get("unlocks_content")),
    }
}

fn interactive_element_from_obj(obj: &Map<String, Value>) -> InteractiveElement {
    // Empty map or empty string both mean "no side quest"
    let side_quest_trigger = obj
        .get("side_quest_trigger")
        .and_then(Value::as_object)
        .filter(|m| !m.is_empty())
        .cloned();

    InteractiveElement {
        id: required_string(obj.get("id"), "default_id"),
        name: required_string(obj.get("name"), "default_name"),
        description: required_string(obj.get("description"), "default_description"),
        interaction_types: string_list(obj.get("interaction_types")),
        requires_items: string_list(obj.get("requires_items")),
        unlocks_options: string_list(obj.get("unlocks_options")),
        options: string_list(obj.get("options")),
        potential_outcomes: string_map(obj.get("potential_outcomes")),
        side_quest_trigger,
    }
}

fn inventory_changes_from_value(value: Option<&Value>) -> InventoryChanges {
    let empty = Map::new();
    let obj = value.and_then(Value::as_object).unwrap_or(&empty);

    InventoryChanges {
        added_items: item_list(obj.get("added_items")),
        removed_items: item_list(obj.get("removed_items")),
        modified_items: item_list(obj.get("modified_items")),
    }
}

fn environmental_conditions_from_value(value: Option<&Value>) -> EnvironmentalConditions {
    let defaults = EnvironmentalConditions::default();
    let empty = Map::new();
    let obj = value.and_then(Value::as_object).unwrap_or(&empty);

    EnvironmentalConditions {
        weather: required_string(obj.get("weather"), &defaults.weather),
        visibility: required_string(obj.get("visibility"), &defaults.visibility),
        temperature: required_string(obj.get("temperature"), &defaults.temperature),
        hazard_level: bounded_int(obj.get("hazard_level"), HAZARD_MIN, HAZARD_MAX, 0),
    }
}

fn resource_availability_from_value(value: Option<&Value>) -> ResourceAvailability {
    let defaults = ResourceAvailability::default();
    let empty = Map::new();
    let obj = value.and_then(Value::as_object).unwrap_or(&empty);

    ResourceAvailability {
        food: required_string(obj.get("food"), &defaults.food),
        water: required_string(obj.get("water"), &defaults.water),
        medical_supplies: required_string(obj.get("medical_supplies"), &defaults.medical_supplies),
        shelter_materials: required_string(
            obj.get("shelter_materials"),
            &defaults.shelter_materials,
        ),
        fuel: required_string(obj.get("fuel"), &defaults.fuel),
        tools: required_string(obj.get("tools"), &defaults.tools),
    }
}

fn game_state_from_value(value: Option<&Value>) -> GameState {
    let empty = Map::new();
    let obj = value.and_then(Value::as_object).unwrap_or(&empty);

    GameState {
        relationships: relationship_map(obj.get("relationships")),
        revealed_secrets: string_list(obj.get("revealed_secrets")),
        completed_objectives: string_list(obj.get("completed_objectives")),
        failed_objectives: string_list(obj.get("failed_objectives")),
        active_objectives: object_entries(obj.get("active_objectives"))
            .into_iter()
            .map(quest_from_obj)
            .collect(),
        location_flags: bool_map(obj.get("location_flags")),
        story_flags: json_map(obj.get("story_flags")),
        reputation: string_map(obj.get("reputation")),
        major_events: string_list(obj.get("major_events")),
        environmental_conditions: environmental_conditions_from_value(
            obj.get("environmental_conditions"),
        ),
        resource_availability: resource_availability_from_value(obj.get("resource_availability")),
    }
}

/// World-info name lists accept objects carrying a `name`; other non-string
/// entries stringify rather than drop.
fn name_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::Object(obj) => match obj.get("name").and_then(Value::as_str) {
                        Some(name) => name.to_string(),
                        None => item.to_string(),
                    },
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn world_info_from_value(value: Option<&Value>) -> WorldInfo {
    let empty = Map::new();
    let obj = value.and_then(Value::as_object).unwrap_or(&empty);

    WorldInfo {
        name: required_string(obj.get("name"), "Default name"),
        theme: required_string(obj.get("theme"), "Default theme"),
        description: required_string(obj.get("description"), "Default description"),
        key_locations: name_list(obj.get("key_locations")),
        dominant_factions: name_list(obj.get("dominant_factions")),
        major_threats: name_list(obj.get("major_threats")),
        cultural_notes: string_list(obj.get("cultural_notes")),
        historical_timeline: timeline_from_value(obj.get("historical_timeline")),
    }
}

/// The timeline is a list of period -> events groupings; a single grouping
/// arriving as a bare map is wrapped into a one-element list.
fn timeline_from_value(value: Option<&Value>) -> Vec<BTreeMap<String, Vec<String>>> {
    let entry_from_obj = |obj: &Map<String, Value>| -> BTreeMap<String, Vec<String>> {
        obj.iter()
            .map(|(period, events)| (period.clone(), string_list(Some(events))))
            .collect()
    };

    match value {
        Some(Value::Object(obj)) => vec![entry_from_obj(obj)],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(entry_from_obj)
            .collect(),
        _ => Vec::new(),
    }
}

fn location_details_from_value(value: Option<&Value>) -> LocationDetails {
    let empty = Map::new();
    let obj = value.and_then(Value::as_object).unwrap_or(&empty);

    LocationDetails {
        exits: string_list(obj.get("exits")),
        hidden_areas: string_list(obj.get("hidden_areas")),
        resource_nodes: string_list(obj.get("resource_nodes")),
        safety_level: bounded_int(obj.get("safety_level"), SAFETY_MIN, SAFETY_MAX, SAFETY_DEFAULT),
    }
}

fn repair_options(value: Option<&Value>) -> Vec<String> {
    let mut options = match value.and_then(Value::as_array) {
        Some(items) => items.iter().filter_map(display_string).collect(),
        None => Vec::new(),
    };

    if options.len() < OPTIONS_MIN {
        let missing = OPTIONS_MIN - options.len();
        tracing::trace!(count = options.len(), "filling player options to minimum");
        options.extend(FILLER_OPTIONS.iter().take(missing).map(|s| s.to_string()));
    }
    options.truncate(OPTIONS_MAX);
    options
}
