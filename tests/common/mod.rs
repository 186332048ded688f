// Shared test doubles
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use mailslayer::error::{MailError, Result};
use mailslayer::openai::CompletionBackend;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Backend that answers from a script, then falls back to echoing the prompt.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
    attempts: Mutex<Vec<Instant>>,
    always_fail: bool,
    latency: Option<Duration>,
}

impl ScriptedBackend {
    pub fn echo() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            always_fail: true,
            ..Self::default()
        })
    }

    pub fn slow(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency: Some(latency),
            ..Self::default()
        })
    }

    pub fn scripted(outcomes: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(outcomes.into()),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn attempt_times(&self) -> Vec<Instant> {
        self.attempts.lock().clone()
    }
}

pub fn unavailable() -> MailError {
    MailError::Api {
        status: 503,
        message: "The server is overloaded".to_string(),
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, _api_key: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.attempts.lock().push(Instant::now());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.always_fail {
            return Err(unavailable());
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(outcome) => outcome,
            None => Ok(format!("generated from: {prompt}")),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
