//! Session-scoped context.
//!
//! A [`Session`] bundles the user's API key with a [`CompletionService`]
//! that owns its own response cache and operation counter, so sessions never
//! observe each other's cached text. [`SessionStore`] indexes open sessions
//! for the HTTP shell and closes the ones left idle.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod credential;
mod store;

pub use credential::Credential;
pub use store::SessionStore;

use crate::completion::CompletionService;
use crate::error::{MailError, Result};
use crate::models::{EditRequest, GenerationRequest};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_used: Mutex<Instant>,
    credential: RwLock<Option<Credential>>,
    completions: Arc<CompletionService>,
}

impl Session {
    pub fn new(credential: Option<Credential>, completions: CompletionService) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            last_used: Mutex::new(Instant::now()),
            credential: RwLock::new(credential),
            completions: Arc::new(completions),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Mark the session as in use now.
    pub fn touch(&self) {
        *self.last_used.lock() = Instant::now();
    }

    /// Time since the session was last used.
    pub fn idle_for(&self) -> Duration {
        self.last_used.lock().elapsed()
    }

    pub fn is_expired(&self, idle_timeout: Duration) -> bool {
        self.idle_for() >= idle_timeout
    }

    pub fn completions(&self) -> &Arc<CompletionService> {
        &self.completions
    }

    pub fn has_credential(&self) -> bool {
        self.credential.read().is_some()
    }

    /// Replace the session's API key. `None` forgets it.
    pub fn set_credential(&self, credential: Option<Credential>) {
        debug!("Updating credential for session {}", self.id);
        *self.credential.write() = credential;
    }

    /// Copy of the key for the duration of one cycle.
    fn api_key(&self) -> Result<Credential> {
        self.credential
            .read()
            .clone()
            .ok_or(MailError::MissingCredential)
    }

    /// Create or reply cycle. Fails before any remote call when no key is set.
    pub async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.touch();
        let key = self.api_key()?;
        let result = self.completions.generate(key.expose(), request).await;
        self.touch();
        result
    }

    /// Edit cycle. Fails before any remote call when no key is set.
    pub async fn edit(&self, request: EditRequest) -> Result<String> {
        self.touch();
        let key = self.api_key()?;
        let result = self.completions.edit(key.expose(), request).await;
        self.touch();
        result
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("idle_for", &self.idle_for())
            .field("has_credential", &self.has_credential())
            .finish()
    }
}
