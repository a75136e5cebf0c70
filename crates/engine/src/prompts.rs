//! Prompt assembly for the generation collaborator.
//!
//! The engine does not generate text; it frames the turn for the external
//! generation subsystem. The system prompt carries the orchestration and
//! schema instructions, and [`build_game_context`] flattens the turn request
//! into the context block the collaborator responds to.

use std::fmt::Write as _;

use taleforge_domain::{PlayerInteraction, TurnRequest};

/// Orchestration instructions sent as the system prompt on every turn.
pub const SCENE_SYSTEM_PROMPT: &str = r#"You are the orchestrator of a cinematic survival RPG told across a 50-scene story arc.

MOVIE STRUCTURE:
- Scenes 1-10: Setup (world introduction, character establishment, inciting incident)
- Scenes 11-25: Rising Action (conflicts escalate, relationships develop, stakes raise)
- Scenes 26-40: Climax (major confrontations, revelations, character moments)
- Scenes 41-50: Resolution (character arcs conclude, meaningful endings, story closure)

COORDINATE YOUR SPECIALISTS:
- narrative: cinematic present-tense scene description with major story advancement
- dialogue: substantial exchanges that reveal secrets, advance plot, or create conflict
- characters: evolving NPCs with motivations, secrets, and dramatic relationship changes
- world: environmental detail, resources, locations, and world evolution
- threats: active physical threats that engage the player and NPCs directly
- quests: story-critical objectives with meaningful consequences
- items: inventory changes with story significance
- lore: discoverable world knowledge that deepens immersion
- choices: 3-4 major decision points, never trivial actions

CRITICAL VALIDATION:
- narration_text: 200-2000 chars
- history_entry: 50-500 chars
- options: 2-6 items
- relationship_level/trust_level: -10 to 10
- durability: 0-100
- hazard_level: 0-10
- escalation_level: 1-10
- progress: 0-100
- safety_level: 1-10
- importance_level: 1-10
- discovered_at: ISO datetime string
- category: 'history'|'character'|'location'|'faction'|'event'|'artifact'

NULL HANDLING:
- Use null for missing optional fields, never empty strings/objects
- Arrays can be empty [] but not null
- Escape internal quotes in JSON strings with \"

OUTPUT: Only valid JSON in a ```json block matching the scene schema: scene_tag, location, world, narration_text, dialogue, characters, options, game_state, inventory_changes, current_inventory, mood_atmosphere, history_entry, relationship_changes, new_secrets, new_objectives, completed_objectives_this_scene, interactive_elements, environmental_discoveries, threat_updates, ambient_events, discovered_lore, world_info, location_details. All fields must be populated, with empty lists/default values where no new data is generated."#;

/// Generate context specific to the interaction type.
fn interaction_context(interaction: &PlayerInteraction) -> String {
    let element = interaction.element_id.as_deref().unwrap_or("unknown");
    let mut base = match interaction.kind {
        taleforge_domain::InteractionKind::NarrativeChoice => {
            "Player chose from narrative options - advance the main story flow".to_string()
        }
        taleforge_domain::InteractionKind::CharacterInteraction => format!(
            "Player is interacting with character {element} - focus on dialogue and relationship building"
        ),
        taleforge_domain::InteractionKind::ItemInteraction => format!(
            "Player is interacting with item {element} - focus on item mechanics and discovery"
        ),
        taleforge_domain::InteractionKind::LocationInteraction => format!(
            "Player is exploring location {element} - focus on environmental storytelling"
        ),
        taleforge_domain::InteractionKind::QuestInteraction => format!(
            "Player is engaging with quest {element} - focus on objective progression"
        ),
        taleforge_domain::InteractionKind::EnvironmentalInteraction => format!(
            "Player is examining environment {element} - focus on world-building and atmosphere"
        ),
    };

    if !interaction.interaction_context.is_empty() {
        let details: Vec<String> = interaction
            .interaction_context
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        let _ = write!(base, " (Additional context: {})", details.join(", "));
    }

    base
}

/// Create the comprehensive game context string for one turn.
pub fn build_game_context(request: &TurnRequest) -> String {
    let game_state = &request.game_state;
    let progress = &request.game_progress;
    let current_scene = &request.current_scene;
    let interaction = &request.user_interaction;

    let relationship_display: Vec<String> = game_state
        .relationships
        .iter()
        .map(|(id, level)| format!("{id}: {level}/10"))
        .collect();

    let active_objectives: Vec<&str> = game_state
        .active_objectives
        .iter()
        .map(|o| o.description.as_str())
        .collect();

    let scene_characters: Vec<&str> =
        current_scene.characters.iter().map(|c| c.name.as_str()).collect();
    let scene_elements: Vec<&str> = current_scene
        .interactive_elements
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    let scene_threats: Vec<&str> = current_scene
        .threat_updates
        .iter()
        .map(|t| t.threat_name.as_str())
        .collect();
    let lore_titles: Vec<&str> =
        current_scene.discovered_lore.iter().map(|l| l.title.as_str()).collect();
    let inventory_names: Vec<&str> =
        request.current_inventory.iter().map(|i| i.name.as_str()).collect();

    let element_info = match &interaction.element_id {
        Some(element_id) => format!(
            " [Interacting with {}: {}]",
            interaction.element_type.as_deref().unwrap_or("element"),
            element_id
        ),
        None => String::new(),
    };

    let recent_history = if request.recent_history.is_empty() {
        "This is the beginning of the adventure".to_string()
    } else {
        request.recent_history.join("\n")
    };

    let conditions = &game_state.environmental_conditions;
    let resources = &game_state.resource_availability;

    format!(
        r#"PLAYER INTERACTION CONTEXT:
Interaction Type: {interaction_type}
Player Choice: "{choice_text}"{element_info}
Previous Scene Tag: {scene_tag}
Total Scenes Completed: {scenes_completed} out of 50

CURRENT SCENE CONTEXT:
Location: {location}
World: {world}
Scene Mood: {mood}
Present Characters: {present_characters:?}
Scene Characters: {scene_characters:?}
Interactive Elements: {scene_elements:?}
Active Threats: {scene_threats:?}
Discovered Lore: {lore_titles:?}
World Information: {world_description} (Theme: {world_theme})
Location Details: Exits: {exits:?}, Safety: {safety}/10

PLAYER STATE:
Current Inventory: {inventory:?}
Inventory Count: {inventory_count}

GAME STATE CONTEXT:
- Character Relationships: {relationships:?}
- Revealed Secrets: {secrets:?}
- Major Story Events: {major_events:?}
- Active Objectives: {active_objectives:?}
- Completed Objectives: {completed_objectives:?}
- Environmental Conditions: Weather: {weather}, Visibility: {visibility}, Temperature: {temperature}, Hazard: {hazard}/10
- Resource Availability: Food: {food}, Water: {water}, Medical: {medical}, Shelter: {shelter}, Fuel: {fuel}, Tools: {tools}

STORY PROGRESSION:
- Scenes Completed: {scenes_completed}
- Play Time: {play_time} minutes
- Story Escalation Level: {escalation}/10
- Tension Level: {tension}/10
- Major Story Beats: {story_beats:?}
- Active Themes: {themes:?}
- Faction Standings: {standings:?}
- Preferred Interaction Types: {preferred:?}

RECENT HISTORY CONTEXT:
{recent_history}

CONTEXT: This is a continuation of an ongoing RPG session. Maintain continuity with past events, relationships, and character developments. The player has just made the choice: "{choice_text}" via {interaction_type}, in the world scenario: {world}.

IMPORTANT NARRATIVE GUIDELINES:
- Maintain consistency with established relationships (current levels: {relationships:?})
- Reference and build upon revealed secrets: {secrets:?}
- Progress active objectives: {active_objectives:?}
- Characters should remember major events: {major_events:?}
- Present characters should act according to their relationship levels and memories
- Create meaningful consequences for player choices that affect future interactions
- Adjust story intensity based on escalation level ({escalation}/10) and tension level ({tension}/10)

INTERACTION-SPECIFIC HANDLING:
{interaction_handling}

SCENE REQUIREMENTS:
- Generate a scene_tag that reflects the current location and situation
- Include present characters in dialogue/interactions based on their relationship levels
- Update relationship levels based on player choice impact
- Progress or complete relevant objectives based on the player's action
- Maintain inventory consistency (current: {inventory:?})
- Create a meaningful history_entry summarizing what happens in this scene
- Respond appropriately to the {interaction_type} interaction type
- Ensure all fields in the scene schema are populated, even with empty lists/default values if no new data is generated."#,
        interaction_type = interaction.kind,
        choice_text = interaction.choice_text,
        element_info = element_info,
        scene_tag = request.scene_tag.as_deref().unwrap_or("Game Start"),
        scenes_completed = progress.scenes_completed,
        location = request.current_location,
        world = request.current_world,
        mood = current_scene.mood_atmosphere,
        present_characters = request.present_characters,
        scene_characters = scene_characters,
        scene_elements = scene_elements,
        scene_threats = scene_threats,
        lore_titles = lore_titles,
        world_description = current_scene.world_info.description,
        world_theme = current_scene.world_info.theme,
        exits = current_scene.location_details.exits,
        safety = current_scene.location_details.safety_level,
        inventory = inventory_names,
        inventory_count = request.current_inventory.len(),
        relationships = relationship_display,
        secrets = game_state.revealed_secrets,
        major_events = game_state.major_events,
        active_objectives = active_objectives,
        completed_objectives = game_state.completed_objectives,
        weather = conditions.weather,
        visibility = conditions.visibility,
        temperature = conditions.temperature,
        hazard = conditions.hazard_level,
        food = resources.food,
        water = resources.water,
        medical = resources.medical_supplies,
        shelter = resources.shelter_materials,
        fuel = resources.fuel,
        tools = resources.tools,
        play_time = progress.play_time_minutes,
        escalation = progress.story_escalation_level,
        tension = progress.tension_level,
        story_beats = progress.major_story_beats,
        themes = progress.active_themes,
        standings = progress.faction_standings,
        preferred = progress.preferred_interaction_types,
        recent_history = recent_history,
        interaction_handling = interaction_context(interaction),
    )
}
