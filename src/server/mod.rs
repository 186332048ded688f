//! Axum-based HTTP shell for mailslayer.
//!
//! This module exposes the message form as a small JSON API: open a session
//! with an API key, then run create, reply and edit cycles against it. Each
//! cycle either returns the full generated text or a localized error.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints (sessions, cycles, health, metrics).
//! - `middleware`: Request ID tracking and per-route request metrics.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{CompletionResponse, HealthResponse, SessionResponse};
pub use routes::{create_router, AppState};
