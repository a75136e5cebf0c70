//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Generation calls (could swap Ollama -> any OpenAI-compatible service)
//! - Session memory (could swap SQLite -> a document store)
//! - Clock (for testing)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use taleforge_domain::SessionSnapshot;

#[cfg(test)]
use mockall::automock;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store error in {context}: {message}")]
    Database { context: &'static str, message: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn database(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Database {
            context,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Generation Port
// =============================================================================

/// A request to the generation collaborator.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Orchestration instructions for the generation subsystem
    pub system_prompt: Option<String>,
    /// The assembled game context for this turn
    pub context: String,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            context: context.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// External text-generation collaborator.
///
/// The narrow contract the turn pipeline depends on: a context string in, a
/// block of text purporting to contain JSON out. The hosting process owns the
/// client's lifecycle; the pipeline never constructs one.
#[async_trait]
pub trait GenerationPort: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

// =============================================================================
// Session Store Port
// =============================================================================

/// One stored memory record: a session snapshot plus storage metadata.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub session_id: String,
    pub snapshot: SessionSnapshot,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(snapshot: SessionSnapshot, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: snapshot.session_id.clone(),
            snapshot,
            created_at,
        }
    }
}

/// Append-and-overwrite keyed storage for per-session snapshots.
///
/// Two interchangeable backends satisfy this contract identically; callers
/// must not depend on backend-specific behavior beyond it. There is no
/// cross-writer isolation: concurrent writes for the same session race and
/// the last write wins.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append a new record.
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// Create-or-replace keyed by the record id. Idempotent.
    async fn upsert(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// Records for one session, newest first.
    async fn read(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SessionRecord>, StoreError>;

    /// Delete one record by id. Returns whether a record existed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Clear one session's records, or the entire store when no session is
    /// given. Destructive - used for "new game".
    async fn clear<'a>(&self, session_id: Option<&'a str>) -> Result<(), StoreError>;

    /// The most recent record for a session, if any.
    async fn latest(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError>;
}

// =============================================================================
// Testability Ports
// =============================================================================

pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
