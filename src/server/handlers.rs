// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::MailError;
use crate::metrics::gather_metrics;
use crate::models::{
    EditRequest, GenerationRequest, Language, Length, Mode, Platform, Recipient, Tone,
};
use crate::session::Credential;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub sessions: usize,
    pub timestamp: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: state.config.openai.model.clone(),
        sessions: state.sessions.len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionBody {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub has_credential: bool,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CredentialBody {
    pub api_key: String,
}

/// Body of `POST /v1/sessions/:id/messages`
#[derive(Debug, Deserialize)]
pub struct CreateMessageBody {
    pub recipient: Recipient,
    pub platform: Platform,
    pub tone: Tone,
    pub length: Length,
    #[serde(default)]
    pub receiver_name: String,
    /// What the user wants to say.
    pub message: String,
    #[serde(default)]
    pub language: Language,
}

/// Body of `POST /v1/sessions/:id/replies`
#[derive(Debug, Deserialize)]
pub struct ReplyBody {
    pub original_message: String,
    pub recipient: Recipient,
    pub platform: Platform,
    pub tone: Tone,
    pub length: Length,
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
}

impl From<CreateMessageBody> for GenerationRequest {
    fn from(body: CreateMessageBody) -> Self {
        GenerationRequest {
            mode: Mode::Create,
            recipient: body.recipient,
            platform: body.platform,
            tone: body.tone,
            length: body.length,
            receiver_name: body.receiver_name,
            body: body.message,
            language: body.language,
        }
    }
}

impl From<ReplyBody> for GenerationRequest {
    fn from(body: ReplyBody) -> Self {
        GenerationRequest {
            mode: Mode::Reply,
            recipient: body.recipient,
            platform: body.platform,
            tone: body.tone,
            length: body.length,
            receiver_name: body.receiver_name,
            body: body.original_message,
            language: body.language,
        }
    }
}

/// Manually deserialize to get better error messages than the extractor's
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, MailError> {
    serde_json::from_str(body).map_err(|e| {
        debug!("Rejected request body: {}", e);
        MailError::InvalidRequest(format!("JSON deserialization error: {}", e))
    })
}

/// Pull the language out of an otherwise unparseable body so errors can
/// still be localized.
fn sniff_language(body: &str) -> Language {
    #[derive(Deserialize)]
    struct Sniff {
        #[serde(default)]
        language: Language,
    }
    serde_json::from_str::<Sniff>(body)
        .map(|s| s.language)
        .unwrap_or_default()
}

pub async fn create_session_handler(State(state): State<AppState>, body: String) -> Response {
    let parsed: CreateSessionBody = if body.trim().is_empty() {
        CreateSessionBody::default()
    } else {
        match parse_body(&body) {
            Ok(parsed) => parsed,
            Err(e) => return e.into_response(),
        }
    };

    let session = state.sessions.create(parsed.api_key.and_then(Credential::new));
    let response = SessionResponse {
        session_id: session.id().to_string(),
        has_credential: session.has_credential(),
        created_at: session.created_at().to_rfc3339(),
    };
    (StatusCode::CREATED, Json(response)).into_response()
}

pub async fn set_credential_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: String,
) -> Result<StatusCode, MailError> {
    let session = state.sessions.get(&session_id)?;
    let parsed: CredentialBody = parse_body(&body)?;
    let credential = Credential::new(parsed.api_key)
        .ok_or_else(|| MailError::InvalidRequest("api_key must not be empty".to_string()))?;

    session.set_credential(Some(credential));
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, MailError> {
    state.sessions.remove(&session_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for Create mode
pub async fn create_message_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: String,
) -> Response {
    let language = sniff_language(&body);
    completion_response(run_create(&state, &session_id, &body).await, language)
}

/// Handler for Reply mode
pub async fn reply_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: String,
) -> Response {
    let language = sniff_language(&body);
    completion_response(run_reply(&state, &session_id, &body).await, language)
}

/// Handler for the edit round-trip
pub async fn edit_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: String,
) -> Response {
    let language = sniff_language(&body);
    completion_response(run_edit(&state, &session_id, &body).await, language)
}

async fn run_create(state: &AppState, session_id: &str, body: &str) -> Result<String, MailError> {
    let session = state.sessions.get(session_id)?;
    let parsed: CreateMessageBody = parse_body(body)?;
    info!(
        "Create request: session={}, recipient={}, platform={}, tone={}, length={}",
        session_id, parsed.recipient, parsed.platform, parsed.tone, parsed.length
    );
    session.generate(GenerationRequest::from(parsed)).await
}

async fn run_reply(state: &AppState, session_id: &str, body: &str) -> Result<String, MailError> {
    let session = state.sessions.get(session_id)?;
    let parsed: ReplyBody = parse_body(body)?;
    info!(
        "Reply request: session={}, recipient={}, platform={}, tone={}, length={}",
        session_id, parsed.recipient, parsed.platform, parsed.tone, parsed.length
    );
    session.generate(GenerationRequest::from(parsed)).await
}

async fn run_edit(state: &AppState, session_id: &str, body: &str) -> Result<String, MailError> {
    let session = state.sessions.get(session_id)?;
    let parsed: EditRequest = parse_body(body)?;
    if parsed.instruction.trim().is_empty() {
        return Err(MailError::InvalidRequest(
            "instruction must not be empty".to_string(),
        ));
    }
    info!("Edit request: session={}", session_id);
    session.edit(parsed).await
}

/// Either the full text or a localized error; never a partial result.
fn completion_response(result: Result<String, MailError>, language: Language) -> Response {
    match result {
        Ok(text) => Json(CompletionResponse { text }).into_response(),
        Err(e) => {
            if matches!(e, MailError::ExhaustedRetries { .. } | MailError::Internal(_)) {
                error!("Completion cycle failed: {}", e);
            }
            e.into_localized_response(language)
        }
    }
}
