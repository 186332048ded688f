// OpenAI completion backend module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::OpenAiClient;

use crate::error::Result;
use async_trait::async_trait;

/// One remote "generate text from a prompt" exchange.
///
/// Implementations make exactly one attempt per call; retrying, caching and
/// deadlines are layered on top by the completion service.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send `prompt` as a single user message, authenticated with `api_key`,
    /// and return the generated text.
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String>;

    /// Model identifier used for every call.
    fn model(&self) -> &str;
}
