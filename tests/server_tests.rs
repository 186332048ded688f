// HTTP shell tests driven through the router
// Author: kelexine (https://github.com/kelexine)

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::ScriptedBackend;
use http_body_util::BodyExt;
use mailslayer::config::AppConfig;
use mailslayer::error::MailError;
use mailslayer::server::{create_router, CompletionResponse, SessionResponse};
use mailslayer::session::SessionStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(backend: Arc<ScriptedBackend>) -> (Router, SessionStore) {
    let config = Arc::new(AppConfig::default());
    let sessions = SessionStore::new(backend, config.clone());
    (create_router(config, sessions.clone()), sessions)
}

async fn send(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn open_session(app: &Router, api_key: Option<&str>) -> SessionResponse {
    let body = match api_key {
        Some(key) => json!({ "api_key": key }),
        None => json!({}),
    };
    let (status, bytes) = send(app, "POST", "/v1/sessions", body).await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_slice(&bytes).unwrap()
}

fn create_body() -> Value {
    json!({
        "recipient": "Colleague",
        "platform": "Email",
        "tone": "Professional",
        "length": "Short",
        "receiver_name": "Alex",
        "message": "thank them for help"
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app(ScriptedBackend::echo());
    let (status, bytes) = send(&app, "GET", "/health", json!(null)).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn test_create_message_round_trip() {
    let backend = ScriptedBackend::scripted(vec![Ok("Hi Alex, thank you!".to_string())]);
    let (app, _) = app(backend.clone());
    let session = open_session(&app, Some("sk-test")).await;
    assert!(session.has_credential);

    let uri = format!("/v1/sessions/{}/messages", session.session_id);
    let (status, bytes) = send(&app, "POST", &uri, create_body()).await;

    assert_eq!(status, StatusCode::OK);
    let body: CompletionResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.text, "Hi Alex, thank you!");
    assert!(backend.prompts()[0].contains("thank them for help"));
}

#[tokio::test]
async fn test_reply_and_edit_cycles() {
    let backend = ScriptedBackend::echo();
    let (app, _) = app(backend.clone());
    let session = open_session(&app, Some("sk-test")).await;

    let (status, bytes) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/replies", session.session_id),
        json!({
            "original_message": "Are you free on Friday?",
            "recipient": "Friend",
            "platform": "WhatsApp",
            "tone": "Casual",
            "length": "Very Short",
            "receiver_name": "Sam"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reply: CompletionResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(backend.prompts()[0].contains("Are you free on Friday?"));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/edits", session.session_id),
        json!({ "original": reply.text, "instruction": "make it shorter" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(backend.prompts()[1].contains("make it shorter"));
}

#[tokio::test]
async fn test_missing_credential_is_401_and_skips_remote() {
    let backend = ScriptedBackend::echo();
    let (app, _) = app(backend.clone());
    let session = open_session(&app, None).await;
    assert!(!session.has_credential);

    let uri = format!("/v1/sessions/{}/messages", session.session_id);
    let (status, bytes) = send(&app, "POST", &uri, create_body()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["type"], "authentication_error");
    assert_eq!(backend.calls(), 0);

    // supplying the key afterwards unblocks the session
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/v1/sessions/{}/credential", session.session_id),
        json!({ "api_key": "sk-now" }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "POST", &uri, create_body()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_error_message_is_localized() {
    let (app, _) = app(ScriptedBackend::echo());
    let session = open_session(&app, None).await;

    let mut body = create_body();
    body["language"] = json!("japanese");
    let uri = format!("/v1/sessions/{}/messages", session.session_id);
    let (_, bytes) = send(&app, "POST", &uri, body).await;

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let message = body["error"]["message"].as_str().unwrap();
    assert_eq!(
        message,
        MailError::MissingCredential.user_message(mailslayer::models::Language::Japanese)
    );
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let (app, _) = app(ScriptedBackend::echo());
    let (status, _) = send(
        &app,
        "POST",
        "/v1/sessions/00000000-0000-4000-8000-000000000000/messages",
        create_body(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_body_is_400() {
    let (app, _) = app(ScriptedBackend::echo());
    let session = open_session(&app, Some("sk-test")).await;

    let (status, bytes) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/messages", session.session_id),
        json!({ "recipient": "Colleague" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["type"], "error");
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_delete_session() {
    let (app, sessions) = app(ScriptedBackend::echo());
    let session = open_session(&app, Some("sk-test")).await;
    assert_eq!(sessions.len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/v1/sessions/{}", session.session_id),
        json!(null),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(sessions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_hide_upstream_detail() {
    let backend = ScriptedBackend::failing();
    let (app, _) = app(backend.clone());
    let session = open_session(&app, Some("sk-test")).await;

    let uri = format!("/v1/sessions/{}/messages", session.session_id);
    let (status, bytes) = send(&app, "POST", &uri, create_body()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("try again"));
    assert!(!message.contains("overloaded"));
    assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn test_metrics_exposes_prometheus_text() {
    let (app, _) = app(ScriptedBackend::echo());
    let session = open_session(&app, Some("sk-test")).await;
    let uri = format!("/v1/sessions/{}/messages", session.session_id);
    send(&app, "POST", &uri, create_body()).await;

    let (status, bytes) = send(&app, "GET", "/metrics", json!(null)).await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("cycles_total"));
    assert!(text.contains("sessions_current"));
}

#[tokio::test(start_paused = true)]
async fn test_idle_session_expires() {
    let mut config = AppConfig::default();
    config.session.idle_timeout_seconds = 60;
    let config = Arc::new(config);
    let sessions = SessionStore::new(ScriptedBackend::echo(), config.clone());
    let app = create_router(config, sessions.clone());

    let session = open_session(&app, Some("sk-test")).await;
    assert!(!session.created_at.is_empty());
    let uri = format!("/v1/sessions/{}/messages", session.session_id);

    tokio::time::advance(std::time::Duration::from_secs(45)).await;
    let (status, _) = send(&app, "POST", &uri, create_body()).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::advance(std::time::Duration::from_secs(60)).await;
    let (status, _) = send(&app, "POST", &uri, create_body()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(sessions.is_empty());
}
