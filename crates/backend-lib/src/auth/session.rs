// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session issuance and management.
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use metrics::{counter, gauge};
use thiserror::Error;
use tokio::{sync::RwLock, task::JoinHandle};

use super::token_generator::generate_secure_token;
use crate::metrics as keys;

/// Default session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// How often expired sessions are swept
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Error, Debug)]
pub enum SessionError {
    /// The issuer could not create or drop the session
    #[error("session unavailable: {0}")]
    Unavailable(String),
}

/// What a workflow did to the caller's session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionOutcome {
    #[default]
    Unchanged,
    Issued(String),
    Cleared,
}

/// Request-scoped handle through which a session is issued or cleared.
///
/// The transport fills in the token the client presented (if any) and,
/// after the workflow, turns the [`SessionOutcome`] into whatever it uses
/// to carry sessions (a cookie for the HTTP surface).
#[derive(Debug, Default)]
pub struct SessionContext {
    presented: Option<String>,
    outcome: SessionOutcome,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a client that presented `token`
    pub fn with_presented(token: impl Into<String>) -> Self {
        Self {
            presented: Some(token.into()),
            outcome: SessionOutcome::Unchanged,
        }
    }

    pub fn presented(&self) -> Option<&str> {
        self.presented.as_deref()
    }

    pub fn outcome(&self) -> &SessionOutcome {
        &self.outcome
    }

    /// Token issued during this request, if any
    pub fn issued_token(&self) -> Option<&str> {
        match &self.outcome {
            SessionOutcome::Issued(token) => Some(token),
            _ => None,
        }
    }

    pub fn record_issued(&mut self, token: String) {
        self.outcome = SessionOutcome::Issued(token);
    }

    pub fn record_cleared(&mut self) {
        self.outcome = SessionOutcome::Cleared;
    }
}

/// Binds authenticated users to client sessions.
#[async_trait]
pub trait SessionIssuer<R>: Send + Sync {
    /// Start a session for `user` and record it on `ctx`.
    async fn issue(&self, ctx: &mut SessionContext, user: &R) -> Result<(), SessionError>;

    /// End whatever session `ctx` carries.
    async fn clear(&self, ctx: &mut SessionContext) -> Result<(), SessionError>;
}

/// Session information
#[derive(Debug, Clone)]
pub struct Session<R> {
    pub user: R,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

impl<R> Session<R> {
    fn is_live(&self, now: SystemTime) -> bool {
        now < self.expires_at
    }
}

/// In-process session store keyed by random tokens
pub struct SessionManager<R> {
    sessions: Arc<RwLock<HashMap<String, Session<R>>>>,
    ttl: Duration,
}

impl<R> Clone for SessionManager<R> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            ttl: self.ttl,
        }
    }
}

impl<R> Default for SessionManager<R> {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

impl<R> SessionManager<R> {
    /// Create a new session manager
    pub fn new(ttl: Duration) -> Self {
        SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Number of stored sessions, expired or not
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Validate a session token
    pub async fn validate_session(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .is_some_and(|session| session.is_live(SystemTime::now()))
    }

    /// Drop a session. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(token).is_some();
        if removed {
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Remove expired sessions, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = SystemTime::now();
        let before_count = sessions.len();

        sessions.retain(|_, session| session.is_live(now));

        let after_count = sessions.len();
        let removed = before_count - after_count;

        if removed > 0 {
            counter!(keys::SESSION_EXPIRED).increment(removed as u64);
            gauge!(keys::SESSION_ACTIVE).set(after_count as f64);
            tracing::debug!(removed, "purged expired sessions");
        }
        removed
    }
}

impl<R: Clone + Send + Sync + 'static> SessionManager<R> {
    /// Get a live session by token
    pub async fn get(&self, token: &str) -> Option<Session<R>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|session| session.is_live(SystemTime::now()))
            .cloned()
    }

    /// Spawn the task that periodically removes expired sessions
    pub fn spawn_cleanup(&self) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVAL).await;
                manager.purge_expired().await;
            }
        })
    }
}

#[async_trait]
impl<R: Clone + Send + Sync + 'static> SessionIssuer<R> for SessionManager<R> {
    async fn issue(&self, ctx: &mut SessionContext, user: &R) -> Result<(), SessionError> {
        let now = SystemTime::now();
        let expires_at = now.checked_add(self.ttl).ok_or_else(|| {
            SessionError::Unavailable(format!("session ttl {:?} overflows the clock", self.ttl))
        })?;
        let token = generate_secure_token();
        let session = Session {
            user: user.clone(),
            created_at: now,
            expires_at,
        };

        let mut sessions = self.sessions.write().await;
        // A fresh login replaces whatever session the client came in with
        if let Some(previous) = ctx.presented() {
            sessions.remove(previous);
        }
        sessions.insert(token.clone(), session);

        counter!(keys::SESSION_CREATED).increment(1);
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);

        ctx.record_issued(token);
        Ok(())
    }

    async fn clear(&self, ctx: &mut SessionContext) -> Result<(), SessionError> {
        if let Some(token) = ctx.presented() {
            self.revoke(token).await;
        }
        ctx.record_cleared();
        Ok(())
    }
}
