//! In-memory document store for session memory.
//!
//! Keeps whole records per session id in a concurrent map. Used for
//! development and tests, and as the fallback when SQLite initialization
//! fails. Contents die with the process.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::infrastructure::ports::{SessionRecord, SessionStore, StoreError};

/// Dashmap-backed session store. Satisfies the same contract as the SQLite
/// backend, including newest-first reads.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Vec<SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_newest_first(records: Vec<SessionRecord>) -> Vec<SessionRecord> {
        // Insertion order breaks timestamp ties: the later insert is newer.
        let mut indexed: Vec<(usize, SessionRecord)> = records.into_iter().enumerate().collect();
        indexed.sort_by(|(ai, a), (bi, b)| b.created_at.cmp(&a.created_at).then(bi.cmp(ai)));
        indexed.into_iter().map(|(_, record)| record).collect()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.sessions
            .entry(record.session_id.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn upsert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let mut records = self.sessions.entry(record.session_id.clone()).or_default();
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn read(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SessionRecord>, StoreError> {
        let records = self
            .sessions
            .get(session_id)
            .map(|r| r.value().clone())
            .unwrap_or_default();

        let mut records = Self::sorted_newest_first(records);
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        for mut entry in self.sessions.iter_mut() {
            let before = entry.len();
            entry.retain(|r| r.id != id);
            if entry.len() < before {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn clear<'a>(&self, session_id: Option<&'a str>) -> Result<(), StoreError> {
        match session_id {
            Some(session_id) => {
                self.sessions.remove(session_id);
            }
            None => self.sessions.clear(),
        }
        Ok(())
    }

    async fn latest(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let mut records = self.read(session_id, Some(1)).await?;
        Ok(records.pop())
    }
}
