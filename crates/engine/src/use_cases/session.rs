//! Session lifecycle: start-new, load-existing, memory summary, clear.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use taleforge_domain::SessionSnapshot;

use crate::infrastructure::ports::{SessionRecord, SessionStore, StoreError};

/// One stored record rendered for the caller: the serialized snapshot plus
/// its timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryRecordSummary {
    pub memory: String,
    pub last_updated: DateTime<Utc>,
}

/// Everything the memory endpoint reports for one session.
#[derive(Debug, Clone, Serialize)]
pub struct MemorySummary {
    pub memory_count: usize,
    /// Concatenated textual summary of all stored records
    pub memory_summary: String,
    pub memories: Vec<MemoryRecordSummary>,
}

/// Result of loading an existing session.
#[derive(Debug, Clone)]
pub enum LoadResult {
    Loaded {
        latest: Box<SessionSnapshot>,
        memories: Vec<MemoryRecordSummary>,
    },
    NoMemory,
}

/// Session lifecycle operations over the session store.
pub struct SessionOps {
    store: Arc<dyn SessionStore>,
}

impl SessionOps {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Start a new game: clear all stored records for the session id.
    pub async fn start_new(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.clear(Some(session_id)).await?;
        tracing::info!(session_id, "Cleared session memory for new game");
        Ok(())
    }

    /// Load the latest snapshot, or report that no memory exists.
    pub async fn load(&self, session_id: &str) -> Result<LoadResult, StoreError> {
        let records = self.store.read(session_id, None).await?;
        let Some(latest) = records.first() else {
            return Ok(LoadResult::NoMemory);
        };

        Ok(LoadResult::Loaded {
            latest: Box::new(latest.snapshot.clone()),
            memories: summaries(&records)?,
        })
    }

    /// Combined textual summary of all stored records for a session.
    pub async fn memory_summary(&self, session_id: &str) -> Result<Option<MemorySummary>, StoreError> {
        let records = self.store.read(session_id, None).await?;
        if records.is_empty() {
            return Ok(None);
        }

        let memories = summaries(&records)?;
        let memory_summary = memories
            .iter()
            .map(|m| m.memory.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(Some(MemorySummary {
            memory_count: records.len(),
            memory_summary,
            memories,
        }))
    }

    /// Explicit deletion of one session's memory.
    pub async fn clear(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.clear(Some(session_id)).await?;
        tracing::info!(session_id, "Cleared session memory");
        Ok(())
    }
}

fn summaries(records: &[SessionRecord]) -> Result<Vec<MemoryRecordSummary>, StoreError> {
    records
        .iter()
        .map(|record| {
            let memory = serde_json::to_string(&record.snapshot)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Ok(MemoryRecordSummary {
                memory,
                last_updated: record.snapshot.last_updated,
            })
        })
        .collect()
}
