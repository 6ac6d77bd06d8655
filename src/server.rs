//! Chat API HTTP server.
//!
//! Exposes the retrieval-augmented chat pipeline over a small JSON API.
//! Each request is handled statelessly: the query is embedded, scored
//! against the shared read-only corpus, wrapped in a system prompt, and
//! forwarded to the chat model.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Liveness check (returns literal `running`) |
//! | `GET`  | `/chat?query=<q>` | Run the full pipeline, return the reply |
//!
//! # Error Contract
//!
//! All error responses share one JSON shape:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `upstream_unavailable` (503),
//! `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support the
//! browser-based frontend.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::chat::{self, ChatMessage};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::embedding;
use crate::prompt;

/// Shared application state passed to route handlers via Axum's `State`
/// extractor. The corpus is read-only after startup, so no locking is
/// needed.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub corpus: Arc<Corpus>,
}

/// Build the chat API router with permissive CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/chat", get(handle_chat))
        .layer(cors)
        .with_state(state)
}

/// Start the chat API server on the configured bind address.
///
/// The corpus must already be built; this function runs until the process
/// is terminated.
pub async fn run_server(config: Arc<Config>, corpus: Arc<Corpus>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState { config, corpus };
    let router = app(state);

    println!("Chat API listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable
/// message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 503 error for embedding/chat upstream failures.
fn upstream_unavailable(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::SERVICE_UNAVAILABLE,
        code: "upstream_unavailable".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 Internal error.
fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET / ============

/// Handler for `GET /`.
///
/// Returns the literal text `running` as a liveness check.
async fn handle_root() -> &'static str {
    "running"
}

// ============ GET /chat ============

/// Query parameters for `GET /chat`.
#[derive(Deserialize)]
struct ChatParams {
    query: Option<String>,
}

/// JSON response body for `GET /chat`.
#[derive(Serialize)]
struct ChatApiResponse {
    /// Always `"OK"` on success.
    status: String,
    /// The chat model's generated reply.
    response: String,
}

/// Handler for `GET /chat`.
///
/// Embeds the query, retrieves the top-N corpus chunks, assembles the
/// system prompt, and forwards the conversation to the chat model.
/// Upstream failures are surfaced as 503; no retry beyond the clients'
/// own backoff.
async fn handle_chat(
    State(state): State<AppState>,
    Query(params): Query<ChatParams>,
) -> Result<Json<ChatApiResponse>, AppError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| bad_request("query must not be empty"))?;

    let query_vec = embedding::embed_query(&state.config.ollama, query)
        .await
        .map_err(|e| upstream_unavailable(format!("embedding request failed: {:#}", e)))?;

    let retrieved = state
        .corpus
        .retrieve(&query_vec, state.config.retrieval.top_n)
        .map_err(|e| internal(format!("retrieval failed: {:#}", e)))?;

    let system_prompt = prompt::build_system_prompt(&retrieved);
    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(query),
    ];

    let reply = chat::chat(&state.config.ollama, &messages)
        .await
        .map_err(|e| upstream_unavailable(format!("chat request failed: {:#}", e)))?;

    Ok(Json(ChatApiResponse {
        status: "OK".to_string(),
        response: reply,
    }))
}
