// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `passgate` credential service:
//! password registration and login over a schema-configurable user table.

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod schema;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, CredentialFields, DefaultAuth, ScryptHasher, SessionManager};
use crate::config::{Settings, StorageBackend};
use crate::schema::Resource;
use crate::storage::{FlatFileUserRepository, MemoryUserRepository, UserRepository};

/// Application state shared across all handlers
pub struct AppState<R> {
    /// Authentication service
    pub auth: Arc<dyn AuthService<R>>,
    /// Session manager
    pub sessions: Arc<SessionManager<R>>,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
    /// Designated username and password columns
    pub fields: CredentialFields,
}

impl<R: Resource> AppState<R> {
    /// Create a new application state around an existing repository
    pub fn new(repository: Arc<dyn UserRepository>, settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        let sessions = Arc::new(SessionManager::new(Duration::from_secs(settings.session_ttl_secs)));
        let hasher = Arc::new(ScryptHasher::new(
            settings.hashing.log_n,
            settings.hashing.r,
            settings.hashing.p,
        )?);
        let auth = Arc::new(DefaultAuth::new(repository, hasher, sessions.clone()));

        tracing::debug!(
            table = R::schema().table(),
            username_field = %settings.fields.username,
            log_n = settings.hashing.log_n,
            "auth state initialised"
        );

        Ok(Self {
            auth,
            sessions,
            fields: settings.credential_fields(),
            settings: Arc::new(settings),
        })
    }

    /// Create a new application state with the repository named in `settings`
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let repository = open_repository(&settings)?;
        Self::new(repository, settings)
    }
}

/// Open the repository backend selected by `settings.storage`
pub fn open_repository(settings: &Settings) -> anyhow::Result<Arc<dyn UserRepository>> {
    let repository: Arc<dyn UserRepository> = match settings.storage {
        StorageBackend::Memory => Arc::new(MemoryUserRepository::new()),
        StorageBackend::FlatFile => Arc::new(FlatFileUserRepository::new(&settings.data_dir)?),
    };
    Ok(repository)
}
