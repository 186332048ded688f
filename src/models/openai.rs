// OpenAI chat completions API type definitions
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Chat completion request body.
///
/// Only the fields this client sends are modeled; everything else is left to
/// the API defaults.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Target model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,

    /// Conversation turns. This client always sends a single user turn.
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Wrap a prompt as the sole user message.
    pub fn single_user_turn(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    /// Null for tool-call-only assistant turns.
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the API returned any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req = ChatCompletionRequest::single_user_turn("gpt-3.5-turbo", "hello");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_first_text_handles_null_content() {
        let resp: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null}}]}"#,
        )
        .unwrap();
        assert!(resp.first_text().is_none());

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(empty.first_text().is_none());
    }
}
