// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    create_message_handler, create_session_handler, delete_session_handler, edit_handler,
    health_handler, metrics_handler, reply_handler, set_credential_handler,
};
use super::middleware::{request_id_layers, track_requests};
use crate::config::AppConfig;
use crate::session::SessionStore;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
}

pub fn create_router(config: Arc<AppConfig>, sessions: SessionStore) -> Router {
    let state = AppState { config, sessions };

    let (set_request_id, propagate_request_id) = request_id_layers();

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/v1/sessions", post(create_session_handler))
        .route("/v1/sessions/:id", delete(delete_session_handler))
        .route("/v1/sessions/:id/credential", put(set_credential_handler))
        .route("/v1/sessions/:id/messages", post(create_message_handler))
        .route("/v1/sessions/:id/replies", post(reply_handler))
        .route("/v1/sessions/:id/edits", post(edit_handler))
        // Messages and pasted originals are plain text; 1MB is plenty
        .layer(tower_http::limit::RequestBodyLimitLayer::new(1024 * 1024))
        .route_layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state)
}
