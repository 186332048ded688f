// Open sessions indexed by id
// Author: kelexine (https://github.com/kelexine)

use super::{Credential, Session};
use crate::completion::CompletionService;
use crate::config::AppConfig;
use crate::error::{MailError, Result};
use crate::metrics;
use crate::openai::CompletionBackend;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Registry of sessions sharing one backend.
///
/// Every session gets a fresh [`CompletionService`] so caches and operation
/// counters stay isolated. Sessions left unused for longer than
/// `session.idle_timeout_seconds` are closed.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn CompletionBackend>,
    config: Arc<AppConfig>,
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: Arc<AppConfig>) -> Self {
        Self {
            backend,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.config.session.idle_timeout()
    }

    /// Open a new session, optionally with its API key already set.
    pub fn create(&self, credential: Option<Credential>) -> Arc<Session> {
        self.prune_idle();

        let service = CompletionService::from_config(self.backend.clone(), &self.config);
        let session = Arc::new(Session::new(credential, service));

        let mut sessions = self.sessions.write();
        sessions.insert(session.id(), session.clone());
        metrics::update_sessions(sessions.len());
        info!("Opened session {}", session.id());
        session
    }

    /// Look up a live session and mark it used. An expired session is
    /// closed and reported as not found.
    pub fn get(&self, id: &str) -> Result<Arc<Session>> {
        let uuid = Uuid::parse_str(id).map_err(|_| MailError::SessionNotFound(id.to_string()))?;
        let session = self
            .sessions
            .read()
            .get(&uuid)
            .cloned()
            .ok_or_else(|| MailError::SessionNotFound(id.to_string()))?;

        if session.is_expired(self.idle_timeout()) {
            self.close(&uuid, "expired");
            return Err(MailError::SessionNotFound(id.to_string()));
        }

        session.touch();
        Ok(session)
    }

    /// Close a session, dropping its cache and key.
    pub fn remove(&self, id: &str) -> Result<()> {
        let session = self.get(id)?;
        self.close(&session.id(), "closed");
        Ok(())
    }

    fn close(&self, id: &Uuid, reason: &str) {
        let mut sessions = self.sessions.write();
        if sessions.remove(id).is_some() {
            metrics::update_sessions(sessions.len());
            info!("Session {} {}", id, reason);
        }
    }

    /// Close every session idle for at least the configured timeout.
    /// Returns how many were closed.
    pub fn prune_idle(&self) -> usize {
        let idle_timeout = self.idle_timeout();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(idle_timeout));

        let pruned = before - sessions.len();
        if pruned > 0 {
            metrics::update_sessions(sessions.len());
            info!("Closed {} idle sessions", pruned);
        }
        pruned
    }

    /// Sweep idle sessions every `session.sweep_interval_seconds` until the
    /// returned task is aborted.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let store = self.clone();
        let every = self.config.session.sweep_interval();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let pruned = store.prune_idle();
                debug!("Session sweep closed {}, {} open", pruned, store.len());
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
