//! HTTP route handlers for the conversation API.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::compute::ComputeError;
use crate::conversations::errors::StoreError;
use crate::conversations::ids::ConversationId;
use crate::conversations::types::{Conversation, Message, Role};

use super::state::AppState;

/// Create the API router with all routes.
///
/// CORS headers are attached to the `/api` subtree only; every other path
/// passes through unmodified.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api = Router::new()
        .route(
            "/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route(
            "/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/conversations/{id}/messages", post(add_message))
        .route("/conversations/{id}/title", put(update_title))
        .route("/execute", post(execute_code))
        .layer(cors);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "parley-agent",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Map a store error onto a response, keeping not-found distinct.
fn store_error(err: StoreError) -> (StatusCode, String) {
    match err {
        StoreError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            format!("Conversation not found: {id}"),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Storage error: {other}"),
        ),
    }
}

/// Parse a conversation id from a path segment.
fn parse_id(raw: &str) -> Result<ConversationId, (StatusCode, String)> {
    ConversationId::from_str(raw)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid conversation id: {e}")))
}

/// List all conversations, most recently created first.
async fn list_conversations(State(state): State<Arc<AppState>>) -> Json<Vec<Conversation>> {
    Json(state.store.get_all().await)
}

/// Create a new empty conversation.
async fn create_conversation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Conversation>, (StatusCode, String)> {
    let conversation = state.store.create().await.map_err(store_error)?;
    Ok(Json(conversation))
}

/// Fetch a single conversation.
async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>, (StatusCode, String)> {
    let id = parse_id(&id)?;
    match state.store.get(id).await {
        Some(conversation) => Ok(Json(conversation)),
        None => Err(store_error(StoreError::NotFound(id))),
    }
}

/// Message submission request.
#[derive(Debug, Deserialize)]
pub struct AddMessageRequest {
    /// Author role.
    pub role: Role,
    /// Message body.
    pub content: String,
}

/// Append a message to a conversation.
async fn add_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<AddMessageRequest>,
) -> Result<Json<Conversation>, (StatusCode, String)> {
    let id = parse_id(&id)?;
    let message = Message::new(request.role, request.content);
    let conversation = state
        .store
        .add_message(id, message)
        .await
        .map_err(store_error)?;
    Ok(Json(conversation))
}

/// Title update request.
#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    /// Replacement title.
    pub title: String,
}

/// Replace a conversation's title.
async fn update_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTitleRequest>,
) -> Result<Json<Conversation>, (StatusCode, String)> {
    let id = parse_id(&id)?;
    let conversation = state
        .store
        .update_title(id, &request.title)
        .await
        .map_err(store_error)?;
    Ok(Json(conversation))
}

/// Remove a conversation.
async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id = parse_id(&id)?;
    state.store.delete(id).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Code execution request.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    /// Source to run.
    pub code: String,
    /// Simulation engine; the client default applies when omitted.
    pub engine: Option<String>,
}

/// Code execution response.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    /// Captured output of the execution.
    pub output: String,
}

/// Forward a code submission to the compute backend.
async fn execute_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, (StatusCode, String)> {
    let output = state
        .compute
        .execute(&request.code, request.engine.as_deref())
        .await
        .map_err(|e: ComputeError| (StatusCode::BAD_GATEWAY, format!("Compute error: {e}")))?;
    Ok(Json(ExecuteResponse { output }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use url::Url;

    use crate::compute::ComputeClient;
    use crate::conversations::ConversationStore;
    use crate::conversations::backend::MemoryBackend;

    use super::*;

    async fn test_router() -> Router {
        let store = ConversationStore::open(Arc::new(MemoryBackend::new()))
            .await
            .unwrap();
        let compute = ComputeClient::new(
            Url::parse("http://localhost:8000/execute").unwrap(),
            "test-key",
        );
        create_router(Arc::new(AppState { store, compute }))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let app = test_router().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_then_list_conversations() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/conversations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["title"], "New Conversation");

        let response = app
            .oneshot(
                Request::get("/api/conversations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_add_message_derives_title() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/conversations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::post(format!("/api/conversations/{id}/messages"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "role": "user",
                            "content": "Hello there. How are you?"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["title"], "Hello there");
        assert_eq!(updated["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let app = test_router().await;
        let missing = ConversationId::new();

        let response = app
            .oneshot(
                Request::get(format!("/api/conversations/{missing}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = test_router().await;

        let response = app
            .oneshot(
                Request::get("/api/conversations/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_conversation() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/conversations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/conversations/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::get("/api/conversations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_routes_carry_cors_headers() {
        let app = test_router().await;

        let response = app
            .oneshot(
                Request::get("/api/conversations")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let allow_origin = response
            .headers()
            .get("access-control-allow-origin")
            .unwrap();
        assert_eq!(allow_origin, "*");
    }

    #[tokio::test]
    async fn test_preflight_allows_declared_methods_and_headers() {
        let app = test_router().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/conversations")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        let methods = headers
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("GET") && methods.contains("POST") && methods.contains("OPTIONS"));
        let allowed = headers
            .get("access-control-allow-headers")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(allowed.contains("content-type"));
    }

    #[tokio::test]
    async fn test_non_api_routes_pass_through_without_cors() {
        let app = test_router().await;

        let response = app
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get("access-control-allow-origin")
                .is_none()
        );
    }
}
