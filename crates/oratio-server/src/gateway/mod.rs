//! HTTP gateway (Axum) for transcript scoring.
//!
//! This module is primarily used by the `oratio` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handler::score_handler;
pub use state::HandlerState;

pub const APP_NAME: &str = "oratio-score";

pub fn create_router_with_state(state: HandlerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/score", post(score_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub embedder_mode: &'static str,
    pub model: Option<String>,
    pub default_rubric_prepared: bool,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            app: APP_NAME,
        }),
    )
        .into_response()
}

/// Reports which embedding backend is serving and whether the default rubric is warm.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let provider = state.engine.provider();
    let embedder_mode = if !provider.is_loaded() {
        "pending"
    } else if provider.is_fallback() {
        "fallback"
    } else {
        "model"
    };

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ok",
            embedder_mode,
            model: provider.model_name(),
            default_rubric_prepared: state.engine.is_prepared(None),
        }),
    )
        .into_response()
}
