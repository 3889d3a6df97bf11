// ============================
// crates/backend-lib/src/auth/service_impl.rs
// ============================
//! Default authentication service implementation.
use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tokio::sync::OnceCell;
use tracing::Instrument;

use super::{AuthRequest, AuthService, CredentialFields, PasswordHasher, SessionContext, SessionIssuer};
use crate::error::AuthError;
use crate::metrics as keys;
use crate::schema::Resource;
use crate::storage::UserRepository;

/// The default [`AuthService`]: the registration and login workflows wired
/// to a repository, a password hasher and a session issuer.
pub struct DefaultAuth<R> {
    pub(super) repository: Arc<dyn UserRepository>,
    pub(super) hasher: Arc<dyn PasswordHasher>,
    pub(super) sessions: Arc<dyn SessionIssuer<R>>,
    /// Placeholder hash verified against when a username is unknown
    pub(super) decoy: Arc<OnceCell<String>>,
}

impl<R> Clone for DefaultAuth<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: Arc::clone(&self.hasher),
            sessions: Arc::clone(&self.sessions),
            decoy: Arc::clone(&self.decoy),
        }
    }
}

impl<R: Resource> DefaultAuth<R> {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        sessions: Arc<dyn SessionIssuer<R>>,
    ) -> Self {
        Self {
            repository,
            hasher,
            sessions,
            decoy: Arc::new(OnceCell::new()),
        }
    }
}

/// Report a workflow outcome. Every operation goes through here so that
/// success and failure are logged and counted the same way.
fn observe<T>(operation: &'static str, result: &Result<T, AuthError>) {
    match result {
        Ok(_) => {
            counter!(keys::AUTH_SUCCEEDED, "operation" => operation).increment(1);
            tracing::info!(operation, "auth operation succeeded");
        },
        Err(err) => {
            counter!(keys::AUTH_FAILED, "operation" => operation, "code" => err.error_code())
                .increment(1);
            if err.status_code().is_server_error() {
                tracing::error!(operation, code = err.error_code(), error = %err, "auth operation failed");
            } else {
                tracing::warn!(operation, code = err.error_code(), error = %err, "auth operation rejected");
            }
        },
    }
}

#[async_trait]
impl<R: Resource> AuthService<R> for DefaultAuth<R> {
    async fn register_with_password(
        &self,
        request: &AuthRequest,
        fields: &CredentialFields,
        ctx: &mut SessionContext,
    ) -> Result<R, AuthError> {
        let span = tracing::info_span!("register", table = R::schema().table());
        let result = self.register(request, fields, ctx).instrument(span).await;
        observe("register", &result);
        result
    }

    async fn login_with_password(
        &self,
        request: &AuthRequest,
        fields: &CredentialFields,
        ctx: &mut SessionContext,
    ) -> Result<R, AuthError> {
        let span = tracing::info_span!("login", table = R::schema().table());
        let result = self.login(request, fields, ctx).instrument(span).await;
        observe("login", &result);
        result
    }

    async fn logout(&self, ctx: &mut SessionContext) -> Result<(), AuthError> {
        let result = self.sessions.clear(ctx).await.map_err(AuthError::from);
        observe("logout", &result);
        result
    }
}
