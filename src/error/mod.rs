// Error types for mailslayer
// Author: kelexine (https://github.com/kelexine)

use crate::models::Language;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion failed after {attempts} attempts: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },

    #[error("Completion timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("No API key supplied for this session")]
    MissingCredential,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MailError {
    /// Whether a failed attempt came from the remote side (transport, status
    /// or body) rather than from local state. The retry policy retries both
    /// kinds and uses this only to label its logs.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MailError::Http(_) | MailError::Api { .. } | MailError::MalformedResponse(_)
        )
    }

    /// Message shown to the end user. Internal detail stays in the logs.
    pub fn user_message(&self, language: Language) -> String {
        match (self, language) {
            (MailError::Timeout(d), Language::English) => format!(
                "The request took longer than {} seconds. Please try again.",
                d.as_secs()
            ),
            (MailError::Timeout(d), Language::Japanese) => format!(
                "{}秒以内に応答がありませんでした。もう一度お試しください。",
                d.as_secs()
            ),
            (MailError::MissingCredential, Language::English) => {
                "Please enter your OpenAI API key to continue.".to_string()
            }
            (MailError::MissingCredential, Language::Japanese) => {
                "続行するにはOpenAI APIキーを入力してください。".to_string()
            }
            (MailError::SessionNotFound(_), Language::English) => {
                "Your session has expired. Please start a new one.".to_string()
            }
            (MailError::SessionNotFound(_), Language::Japanese) => {
                "セッションが見つかりません。新しいセッションを開始してください。".to_string()
            }
            (MailError::InvalidRequest(msg), _) => msg.clone(),
            (_, Language::English) => {
                "Something went wrong while generating the message. Please try again.".to_string()
            }
            (_, Language::Japanese) => {
                "メッセージの生成中にエラーが発生しました。もう一度お試しください。".to_string()
            }
        }
    }

    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            MailError::MissingCredential => (StatusCode::UNAUTHORIZED, "authentication_error"),
            MailError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "not_found_error"),
            MailError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            MailError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout_error"),
            MailError::ExhaustedRetries { .. }
            | MailError::Http(_)
            | MailError::Api { .. }
            | MailError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, "api_error"),
            MailError::Config(_) | MailError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Render the error envelope with a message localized to `language`.
    pub fn into_localized_response(self, language: Language) -> Response {
        let (status, error_type) = self.status_and_type();

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.user_message(language),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

// Convert MailError to HTTP responses for Axum
impl IntoResponse for MailError {
    fn into_response(self) -> Response {
        self.into_localized_response(Language::English)
    }
}

pub type Result<T> = std::result::Result<T, MailError>;
