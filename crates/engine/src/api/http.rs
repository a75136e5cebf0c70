//! HTTP routes.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use taleforge_domain::{Scene, SessionSnapshot, TurnRequest};

use crate::app::App;
use crate::use_cases::{LoadResult, MemoryRecordSummary};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/interact", post(interact))
        .route("/api/init", post(init_game))
        .route(
            "/api/memory/{session_id}",
            get(get_session_memory).delete(clear_session_memory),
        )
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        agents: "ready",
    })
}

/// Main interaction endpoint for the RPG system.
///
/// Never hard-fails on expected error paths: generation and decode failures
/// already degraded to the fallback scene inside the use case, and a store
/// failure still returns the generated scene.
async fn interact(
    State(app): State<Arc<App>>,
    Json(request): Json<TurnRequest>,
) -> Json<Scene> {
    let outcome = app.use_cases.turn.execute(request).await;
    if !outcome.memory_saved {
        tracing::warn!("Turn completed but session memory was not saved");
    }
    Json(outcome.scene)
}

/// Initialize or load a game session.
async fn init_game(
    State(app): State<Arc<App>>,
    Json(request): Json<InitRequest>,
) -> Result<Json<InitResponse>, ApiError> {
    match request.action.as_str() {
        "new" => match app.use_cases.session.start_new(&request.session_id).await {
            Ok(()) => Ok(Json(InitResponse {
                status: "cleared",
                message: "New game started.".to_string(),
                world: Some(request.world),
                ..InitResponse::default()
            })),
            Err(e) => {
                tracing::error!(error = %e, session_id = %request.session_id, "Failed to clear previous game data");
                Ok(Json(InitResponse {
                    status: "error",
                    message: "Failed to clear previous game data.".to_string(),
                    ..InitResponse::default()
                }))
            }
        },
        "load" => {
            let result = app
                .use_cases
                .session
                .load(&request.session_id)
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?;

            match result {
                LoadResult::Loaded { latest, memories } => Ok(Json(InitResponse {
                    status: "loaded",
                    message: "Game loaded from memory.".to_string(),
                    scene_state: Some(latest.world.clone()),
                    memory_summary: Some(memories),
                    latest_memory_data: Some(latest),
                    ..InitResponse::default()
                })),
                LoadResult::NoMemory => Ok(Json(InitResponse {
                    status: "no_memory",
                    message: "No saved game found.".to_string(),
                    ..InitResponse::default()
                })),
            }
        }
        _ => Err(ApiError::BadRequest(
            "Invalid action. Use 'new' or 'load'.".to_string(),
        )),
    }
}

/// Get the memory summary for a session.
async fn get_session_memory(
    State(app): State<Arc<App>>,
    Path(session_id): Path<String>,
) -> Result<Json<MemoryResponse>, ApiError> {
    let summary = app
        .use_cases
        .session
        .memory_summary(&session_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    match summary {
        Some(summary) => Ok(Json(MemoryResponse {
            status: "success",
            message: None,
            session_id: Some(session_id),
            memory_count: Some(summary.memory_count),
            memory_summary: Some(summary.memory_summary),
            memories: Some(summary.memories),
        })),
        None => Ok(Json(MemoryResponse {
            status: "no_memory",
            message: Some("No memories found for this session.".to_string()),
            ..MemoryResponse::default()
        })),
    }
}

/// Clear all memory for a session.
async fn clear_session_memory(
    State(app): State<Arc<App>>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearResponse>, ApiError> {
    app.use_cases
        .session
        .clear(&session_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(ClearResponse {
        status: "success",
        message: format!("Cleared all memories for session {session_id}"),
    }))
}

// =============================================================================
// Request/response DTOs
// =============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    agents: &'static str,
}

#[derive(Debug, Deserialize)]
struct InitRequest {
    session_id: String,
    action: String,
    #[serde(default = "default_world")]
    world: String,
}

fn default_world() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize)]
struct InitResponse {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    world: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_summary: Option<Vec<MemoryRecordSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_memory_data: Option<Box<SessionSnapshot>>,
}

impl Default for InitResponse {
    fn default() -> Self {
        Self {
            status: "error",
            message: String::new(),
            world: None,
            scene_state: None,
            memory_summary: None,
            latest_memory_data: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct MemoryResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memories: Option<Vec<MemoryRecordSummary>>,
}

impl Default for MemoryResponse {
    fn default() -> Self {
        Self {
            status: "no_memory",
            message: None,
            session_id: None,
            memory_count: None,
            memory_summary: None,
            memories: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    status: &'static str,
    message: String,
}

// =============================================================================
// Errors
// =============================================================================

pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::ports::{GenerationError, GenerationPort, GenerationRequest};
    use crate::infrastructure::session_store::InMemorySessionStore;

    struct StaticGeneration(String);

    #[async_trait]
    impl GenerationPort for StaticGeneration {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
            Ok(self.0.clone())
        }
    }

    fn test_app(generation_payload: &str) -> Router {
        let app = Arc::new(App::new(
            Arc::new(StaticGeneration(generation_payload.to_string())),
            Arc::new(InMemorySessionStore::new()),
        ));
        routes().with_state(app)
    }

    fn turn_request_body() -> Value {
        json!({
            "session_id": "s1",
            "scenes_completed": 0,
            "user_interaction": {
                "interaction_type": "narrative_choice",
                "choice_text": "Enter the ruin"
            },
            "player_choice": "Enter the ruin",
            "current_location": "ruin_gate",
            "current_world": "ashfall"
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app("{}")
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_interact_returns_schema_compliant_scene() {
        let payload = r#"```json
{"scene_tag": "gate_01", "location": "ruin_gate", "world": "ashfall",
 "options": ["Push", "Wait", "Listen"]}
```"#;

        let response = test_app(payload)
            .oneshot(
                Request::post("/api/interact")
                    .header("content-type", "application/json")
                    .body(Body::from(turn_request_body().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["scene_tag"], "gate_01");
        assert_eq!(body["options"].as_array().unwrap().len(), 3);
        // Defaulted fields are present, not absent
        assert!(body["dialogue"].is_array());
        assert!(body["narration_text"].as_str().unwrap().len() >= 200);
    }

    #[tokio::test]
    async fn test_interact_never_hard_fails_on_garbage_generation() {
        let response = test_app("no json at all")
            .oneshot(
                Request::post("/api/interact")
                    .header("content-type", "application/json")
                    .body(Body::from(turn_request_body().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["scene_tag"], "fallback_s1");
        assert_eq!(body["mood_atmosphere"], "uncertain");
    }

    #[tokio::test]
    async fn test_init_invalid_action_is_bad_request() {
        let response = test_app("{}")
            .oneshot(
                Request::post("/api/init")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"session_id": "s1", "action": "resume"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_init_load_without_memory() {
        let response = test_app("{}")
            .oneshot(
                Request::post("/api/init")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"session_id": "ghost", "action": "load"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "no_memory");
    }

    #[tokio::test]
    async fn test_full_lifecycle_interact_then_load_then_clear() {
        let payload = r#"{"scene_tag": "gate_01", "location": "ruin_gate", "world": "ashfall"}"#;
        let router = test_app(payload);

        // Play one turn
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/interact")
                    .header("content-type", "application/json")
                    .body(Body::from(turn_request_body().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Load finds the persisted snapshot
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/init")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"session_id": "s1", "action": "load"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "loaded");
        assert_eq!(body["scene_state"], "ashfall");
        assert_eq!(body["latest_memory_data"]["scene_tag"], "gate_01");

        // Memory endpoint reports the record
        let response = router
            .clone()
            .oneshot(Request::get("/api/memory/s1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["memory_count"], 1);

        // Clear removes it
        let response = router
            .clone()
            .oneshot(
                Request::delete("/api/memory/s1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");

        let response = router
            .oneshot(Request::get("/api/memory/s1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "no_memory");
    }
}
