//! SQLite-backed session memory.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::infrastructure::ports::{SessionRecord, SessionStore, StoreError};

/// SQLite implementation of the session store.
///
/// Snapshots are stored as JSON text; ordering comes from the creation
/// timestamp with the rowid as a tiebreak, so `read` returns newest first
/// even for records written within the same millisecond.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| StoreError::database("session_memory", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session_memory (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                snapshot_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::database("session_memory", e))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_session_memory_session
            ON session_memory (session_id, created_at DESC)
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::database("session_memory", e))?;

        Ok(Self { pool })
    }

    fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SessionRecord, StoreError> {
        let id: String = row.get("id");
        let session_id: String = row.get("session_id");
        let snapshot_json: String = row.get("snapshot_json");
        let created_at: String = row.get("created_at");

        let id = Uuid::parse_str(&id).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let snapshot = serde_json::from_str(&snapshot_json)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::Serialization(e.to_string()))?
            .with_timezone(&chrono::Utc);

        Ok(SessionRecord {
            id,
            session_id,
            snapshot,
            created_at,
        })
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let snapshot_json = serde_json::to_string(&record.snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO session_memory (id, session_id, snapshot_json, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.session_id)
        .bind(snapshot_json)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database("session_memory", e))?;

        Ok(())
    }

    async fn upsert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let snapshot_json = serde_json::to_string(&record.snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO session_memory (id, session_id, snapshot_json, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                session_id = excluded.session_id,
                snapshot_json = excluded.snapshot_json,
                created_at = excluded.created_at
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.session_id)
        .bind(snapshot_json)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database("session_memory", e))?;

        Ok(())
    }

    async fn read(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SessionRecord>, StoreError> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let rows = sqlx::query(
            r#"
            SELECT id, session_id, snapshot_json, created_at
            FROM session_memory
            WHERE session_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database("session_memory", e))?;

        rows.iter().map(Self::record_from_row).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM session_memory WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::database("session_memory", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear<'a>(&self, session_id: Option<&'a str>) -> Result<(), StoreError> {
        match session_id {
            Some(session_id) => {
                sqlx::query("DELETE FROM session_memory WHERE session_id = ?")
                    .bind(session_id)
                    .execute(&self.pool)
                    .await
            }
            None => sqlx::query("DELETE FROM session_memory").execute(&self.pool).await,
        }
        .map_err(|e| StoreError::database("session_memory", e))?;

        Ok(())
    }

    async fn latest(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let mut records = self.read(session_id, Some(1)).await?;
        Ok(records.pop())
    }
}
