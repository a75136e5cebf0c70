//! Session store backends and backend selection.
//!
//! Two interchangeable backends satisfy the [`SessionStore`] contract:
//! SQLite for durable storage and an in-memory document store for
//! development. Selection is configuration, not code: `STORAGE_BACKEND`
//! picks one, and a failed SQLite initialization falls back to the
//! in-memory store with a logged warning rather than refusing to boot.

use std::sync::Arc;

mod memory;
mod sqlite;

pub use memory::InMemorySessionStore;
pub use sqlite::SqliteSessionStore;

use crate::infrastructure::ports::SessionStore;

/// Which backend to run the session store on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl StorageBackend {
    /// Parse `STORAGE_BACKEND`-style values. Unknown values select SQLite.
    pub fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Self::Memory,
            _ => Self::Sqlite,
        }
    }
}

/// Build the configured session store.
pub async fn build(backend: StorageBackend, sqlite_path: &str) -> Arc<dyn SessionStore> {
    match backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory session store");
            Arc::new(InMemorySessionStore::new())
        }
        StorageBackend::Sqlite => match SqliteSessionStore::new(sqlite_path).await {
            Ok(store) => {
                tracing::info!(path = sqlite_path, "Using SQLite session store");
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = sqlite_path,
                    "Failed to initialize SQLite session store, falling back to in-memory"
                );
                Arc::new(InMemorySessionStore::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::SessionRecord;
    use chrono::{Duration, TimeZone, Utc};
    use taleforge_domain::SessionSnapshot;

    fn snapshot(session_id: &str) -> SessionSnapshot {
        SessionSnapshot {
            session_id: session_id.to_string(),
            last_updated: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            scene_tag: "tag".into(),
            location: "loc".into(),
            world: "world".into(),
            inventory: Vec::new(),
            game_state: Default::default(),
            history: Vec::new(),
            current_scene: Default::default(),
            play_time_minutes: 0,
            scenes_completed: 0,
            discovered_locations: Vec::new(),
            met_characters: Vec::new(),
            unlocked_features: Vec::new(),
            major_story_beats: Vec::new(),
            active_side_quests: Vec::new(),
            player_choices_history: Vec::new(),
            world_knowledge: Default::default(),
            faction_standings: Default::default(),
            discovered_secrets: Vec::new(),
            triggered_events: Vec::new(),
            player_preferences: Default::default(),
            resume_context: Default::default(),
            lore_collection: Vec::new(),
            world_info: Default::default(),
        }
    }

    fn record(session_id: &str, offset_secs: i64) -> SessionRecord {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(offset_secs);
        SessionRecord::new(snapshot(session_id), at)
    }

    /// Contract test run against both backends.
    async fn exercise_store_contract(store: &dyn crate::infrastructure::ports::SessionStore) {
        let first = record("alpha", 0);
        let second = record("alpha", 10);
        let other = record("beta", 5);

        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();
        store.insert(&other).await.unwrap();

        // Newest first
        let records = store.read("alpha", None).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, second.id);
        assert_eq!(records[1].id, first.id);

        // Limit applies after ordering
        let records = store.read("alpha", Some(1)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, second.id);

        // Latest matches the head of read
        let latest = store.latest("alpha").await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);

        // Upsert replaces by id
        let mut replacement = second.clone();
        replacement.snapshot.location = "elsewhere".into();
        store.upsert(&replacement).await.unwrap();
        let latest = store.latest("alpha").await.unwrap().unwrap();
        assert_eq!(latest.snapshot.location, "elsewhere");
        assert_eq!(store.read("alpha", None).await.unwrap().len(), 2);

        // Delete by id
        assert!(store.delete(first.id).await.unwrap());
        assert!(!store.delete(first.id).await.unwrap());
        assert_eq!(store.read("alpha", None).await.unwrap().len(), 1);

        // Clear one session leaves the other intact
        store.clear(Some("alpha")).await.unwrap();
        assert!(store.latest("alpha").await.unwrap().is_none());
        assert!(store.latest("beta").await.unwrap().is_some());

        // Clear everything
        store.clear(None).await.unwrap();
        assert!(store.latest("beta").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_contract() {
        let store = InMemorySessionStore::new();
        exercise_store_contract(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_store_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.db");
        let store = SqliteSessionStore::new(path.to_str().unwrap()).await.unwrap();
        exercise_store_contract(&store).await;
    }

    #[tokio::test]
    async fn test_last_write_wins_no_hybrid_state() {
        let store = InMemorySessionStore::new();

        let mut a = record("alpha", 0);
        a.snapshot.location = "camp".into();
        let mut b = record("alpha", 0);
        b.snapshot.location = "ridge".into();

        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();

        // Same timestamp: the later write wins, and the surviving head is one
        // of the two candidates wholesale, never a blend.
        let latest = store.latest("alpha").await.unwrap().unwrap();
        assert_eq!(latest.id, b.id);
        assert_eq!(latest.snapshot, b.snapshot);
    }

    #[test]
    fn test_backend_from_env_value() {
        assert_eq!(StorageBackend::from_env_value("memory"), StorageBackend::Memory);
        assert_eq!(StorageBackend::from_env_value("SQLite"), StorageBackend::Sqlite);
        assert_eq!(StorageBackend::from_env_value("anything"), StorageBackend::Sqlite);
    }
}
