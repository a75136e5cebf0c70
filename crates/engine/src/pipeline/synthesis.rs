//! Turn synthesis: fold a freshly repaired scene into the session snapshot.
//!
//! Accumulating fields (history, discovery sets, lore, choice log) carry the
//! prior snapshot forward; counters and the knowledge/standing/preference
//! maps are trusted from the caller's progress context; everything else is
//! overwritten wholesale from the new scene - "last scene wins".

use chrono::{DateTime, Utc};

use taleforge_domain::entities::session::HISTORY_LOG_CAP;
use taleforge_domain::{
    ChoiceRecord, CurrentScene, ResumeContext, Scene, SessionSnapshot, TurnRequest,
};

/// Produce the next session snapshot.
///
/// `prior` is the last persisted snapshot, or `None` for a new session; in
/// that case the caller-supplied recent history seeds the log.
pub fn synthesize(
    prior: Option<&SessionSnapshot>,
    request: &TurnRequest,
    scene: &Scene,
    now: DateTime<Utc>,
) -> SessionSnapshot {
    let progress = &request.game_progress;

    // History log: append one formatted entry, FIFO-evict past the cap
    let mut history = match prior {
        Some(prior) => prior.history.clone(),
        None => request.recent_history.clone(),
    };
    history.push(format!("[{}] {}", scene.location, scene.history_entry));
    if history.len() > HISTORY_LOG_CAP {
        history.drain(..history.len() - HISTORY_LOG_CAP);
    }

    // Discovery sets: dedup union, never shrinking
    let mut discovered_locations = prior
        .map(|p| p.discovered_locations.clone())
        .unwrap_or_default();
    push_unique(&mut discovered_locations, scene.location.clone());

    let mut met_characters = prior.map(|p| p.met_characters.clone()).unwrap_or_default();
    for character in &scene.characters {
        push_unique(&mut met_characters, character.id.clone());
    }

    let mut discovered_secrets = prior
        .map(|p| p.discovered_secrets.clone())
        .unwrap_or_default();
    for secret in request
        .game_state
        .revealed_secrets
        .iter()
        .chain(&scene.new_secrets)
    {
        push_unique(&mut discovered_secrets, secret.clone());
    }

    // Lore: append-only, duplicates across turns are accepted as-is
    let mut lore_collection = prior.map(|p| p.lore_collection.clone()).unwrap_or_default();
    lore_collection.extend(scene.discovered_lore.iter().cloned());

    // Choice log: one record per turn
    let mut player_choices_history = prior
        .map(|p| p.player_choices_history.clone())
        .unwrap_or_default();
    player_choices_history.push(ChoiceRecord {
        scene_tag: scene.scene_tag.clone(),
        location: scene.location.clone(),
        choice: request.player_choice.clone(),
        kind: request.user_interaction.kind,
        timestamp: now,
    });

    SessionSnapshot {
        session_id: request.session_id.clone(),
        last_updated: now,
        scene_tag: scene.scene_tag.clone(),
        location: scene.location.clone(),
        world: scene.world.clone(),
        inventory: scene.current_inventory.clone(),
        game_state: scene.game_state.clone(),
        history,
        current_scene: current_scene_detail(scene),
        // Counters come from the caller's bookkeeping, not ours
        play_time_minutes: progress.play_time_minutes,
        scenes_completed: progress.scenes_completed,
        discovered_locations,
        met_characters,
        unlocked_features: progress.preference_list("unlocked_features"),
        major_story_beats: progress.major_story_beats.clone(),
        active_side_quests: progress.preference_list("active_side_quests"),
        player_choices_history,
        world_knowledge: progress.world_knowledge.clone(),
        faction_standings: progress.faction_standings.clone(),
        discovered_secrets,
        triggered_events: progress.preference_list("triggered_events"),
        player_preferences: progress.player_preferences.clone(),
        resume_context: ResumeContext {
            last_interaction: request.user_interaction.clone(),
            game_progress: progress.clone(),
            recent_history: request.recent_history.clone(),
            agent_hints: request.agent_hints.clone(),
            emergency_flags: request.emergency_flags.clone(),
            tension_level: progress.tension_level,
            story_escalation_level: progress.story_escalation_level,
        },
        lore_collection,
        world_info: scene.world_info.clone(),
    }
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn current_scene_detail(scene: &Scene) -> CurrentScene {
    CurrentScene {
        narration_text: scene.narration_text.clone(),
        dialogue: scene.dialogue.clone(),
        characters: scene.characters.clone(),
        options: scene.options.clone(),
        mood_atmosphere: scene.mood_atmosphere.clone(),
        relationship_changes: scene.relationship_changes.clone(),
        new_secrets: scene.new_secrets.clone(),
        interactive_elements: scene.interactive_elements.clone(),
        environmental_discoveries: scene.environmental_discoveries.clone(),
        threat_updates: scene.threat_updates.clone(),
        ambient_events: scene.ambient_events.clone(),
        discovered_lore: scene.discovered_lore.clone(),
        world_info: scene.world_info.clone(),
        location_details: scene.location_details.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use taleforge_domain::entities::lore::LoreEntry;
    use taleforge_domain::{InteractionKind, LoreCategory};

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn scene(location: &str, tag: &str) -> Scene {
        crate::pipeline::repair::repair_scene(
            &json!({"scene_tag": tag, "location": location, "world": "ashfall"}),
            fixed_now(),
        )
    }

    fn request(session_id: &str) -> TurnRequest {
        TurnRequest {
            session_id: session_id.to_string(),
            player_choice: "Press on".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_history_appends_formatted_entry() {
        let scene = scene("ridge", "ridge_01");
        let snapshot = synthesize(None, &request("s1"), &scene, fixed_now());

        assert_eq!(snapshot.history.len(), 1);
        assert!(snapshot.history[0].starts_with("[ridge] "));
    }

    #[test]
    fn test_history_caps_at_twenty_oldest_first_out() {
        let mut prior: Option<SessionSnapshot> = None;
        for turn in 0..25 {
            let scene = scene(&format!("loc{turn}"), &format!("tag{turn}"));
            let next = synthesize(prior.as_ref(), &request("s1"), &scene, fixed_now());
            assert_eq!(next.history.len(), (turn + 1).min(HISTORY_LOG_CAP));
            prior = Some(next);
        }

        let history = prior.map(|p| p.history).unwrap_or_default();
        assert_eq!(history.len(), HISTORY_LOG_CAP);
        // Oldest-first ordering with the newest appended entry last
        assert!(history[0].starts_with("[loc5] "));
        assert!(history[HISTORY_LOG_CAP - 1].starts_with("[loc24] "));
    }

    #[test]
    fn test_fresh_session_seeds_history_from_request() {
        let mut request = request("s1");
        request.recent_history = vec!["[camp] The fire burned low.".to_string()];
        let scene = scene("ridge", "ridge_01");

        let snapshot = synthesize(None, &request, &scene, fixed_now());
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[0], "[camp] The fire burned low.");
    }

    #[test]
    fn test_discovery_sets_grow_monotonically_and_dedup() {
        let first = synthesize(None, &request("s1"), &scene("ridge", "t1"), fixed_now());
        let second = synthesize(Some(&first), &request("s1"), &scene("ridge", "t2"), fixed_now());
        let third = synthesize(Some(&second), &request("s1"), &scene("valley", "t3"), fixed_now());

        assert_eq!(second.discovered_locations, vec!["ridge".to_string()]);
        assert_eq!(
            third.discovered_locations,
            vec!["ridge".to_string(), "valley".to_string()]
        );
        assert!(third.discovered_locations.len() >= second.discovered_locations.len());
    }

    #[test]
    fn test_met_characters_accumulate() {
        let mut scene_a = scene("ridge", "t1");
        scene_a.characters = vec![character("sara"), character("brix")];
        let mut scene_b = scene("ridge", "t2");
        scene_b.characters = vec![character("sara"), character("moth")];

        let first = synthesize(None, &request("s1"), &scene_a, fixed_now());
        let second = synthesize(Some(&first), &request("s1"), &scene_b, fixed_now());

        assert_eq!(
            second.met_characters,
            vec!["sara".to_string(), "brix".to_string(), "moth".to_string()]
        );
    }

    #[test]
    fn test_secrets_union_deduplicated() {
        let mut scene_a = scene("ridge", "t1");
        scene_a.new_secrets = vec!["the well is poisoned".to_string()];
        let mut scene_b = scene("ridge", "t2");
        scene_b.new_secrets = vec![
            "the well is poisoned".to_string(),
            "brix has the key".to_string(),
        ];

        let first = synthesize(None, &request("s1"), &scene_a, fixed_now());
        let second = synthesize(Some(&first), &request("s1"), &scene_b, fixed_now());

        assert_eq!(second.discovered_secrets.len(), 2);
    }

    #[test]
    fn test_lore_appends_without_dedup() {
        let lore = LoreEntry {
            id: "l1".to_string(),
            title: "The Fall".to_string(),
            content: "It fell.".to_string(),
            category: LoreCategory::History,
            discovered_at: fixed_now().to_rfc3339(),
            related_entries: Vec::new(),
            importance_level: 5,
        };

        let mut scene_a = scene("ridge", "t1");
        scene_a.discovered_lore = vec![lore.clone()];
        let mut scene_b = scene("ridge", "t2");
        scene_b.discovered_lore = vec![lore];

        let first = synthesize(None, &request("s1"), &scene_a, fixed_now());
        let second = synthesize(Some(&first), &request("s1"), &scene_b, fixed_now());

        // Same id twice - duplicates across turns are accepted as-is
        assert_eq!(second.lore_collection.len(), 2);
    }

    #[test]
    fn test_choice_log_records_turn() {
        let mut request = request("s1");
        request.user_interaction.kind = InteractionKind::CharacterInteraction;
        request.player_choice = "Ask about the key".to_string();

        let scene = scene("ridge", "ridge_01");
        let snapshot = synthesize(None, &request, &scene, fixed_now());

        assert_eq!(snapshot.player_choices_history.len(), 1);
        let record = &snapshot.player_choices_history[0];
        assert_eq!(record.choice, "Ask about the key");
        assert_eq!(record.kind, InteractionKind::CharacterInteraction);
        assert_eq!(record.location, "ridge");
        assert_eq!(record.timestamp, fixed_now());
    }

    #[test]
    fn test_counters_trusted_from_progress_context() {
        let mut request = request("s1");
        request.game_progress.play_time_minutes = 93;
        request.game_progress.scenes_completed = 12;

        let snapshot = synthesize(None, &request, &scene("ridge", "t1"), fixed_now());
        assert_eq!(snapshot.play_time_minutes, 93);
        assert_eq!(snapshot.scenes_completed, 12);
    }

    #[test]
    fn test_non_accumulating_fields_overwrite_wholesale() {
        let mut prior_scene = scene("ridge", "t1");
        prior_scene.game_state.major_events = vec!["old event".to_string()];
        let prior = synthesize(None, &request("s1"), &prior_scene, fixed_now());

        let mut next_scene = scene("valley", "t2");
        next_scene.game_state.major_events = vec!["new event".to_string()];
        next_scene.current_inventory = vec![taleforge_domain::Item::from_name("rope")];

        let next = synthesize(Some(&prior), &request("s1"), &next_scene, fixed_now());
        assert_eq!(next.game_state.major_events, vec!["new event".to_string()]);
        assert_eq!(next.inventory.len(), 1);
        assert_eq!(next.location, "valley");
    }

    fn character(id: &str) -> taleforge_domain::Character {
        crate::pipeline::repair::repair_scene(
            &json!({"characters": [{"id": id, "name": id}]}),
            fixed_now(),
        )
        .characters
        .remove(0)
    }
}
