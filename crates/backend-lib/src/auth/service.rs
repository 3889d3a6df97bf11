// ============================
// crates/backend-lib/src/auth/service.rs
// ============================
//! The authentication service interface and the request it consumes.
use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::Method;

use super::{CredentialFields, SessionContext};
use crate::error::AuthError;

/// An inbound register or login request, as handed over by the transport.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub method: Method,
    pub body: Bytes,
}

impl AuthRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }

    /// A `POST` request carrying `body`
    pub fn post(body: impl Into<Bytes>) -> Self {
        Self::new(Method::POST, body)
    }

    /// Only object-creation requests may register or log in.
    pub(crate) fn ensure_post(&self) -> Result<(), AuthError> {
        if self.method == Method::POST {
            Ok(())
        } else {
            Err(AuthError::MethodNotSupported(self.method.to_string()))
        }
    }
}

#[async_trait]
pub trait AuthService<R>: Send + Sync {
    /// Create an account from the request payload and start a session for it.
    async fn register_with_password(
        &self,
        request: &AuthRequest,
        fields: &CredentialFields,
        ctx: &mut SessionContext,
    ) -> Result<R, AuthError>;

    /// Check the request's credentials against the stored account and start
    /// a session for it.
    async fn login_with_password(
        &self,
        request: &AuthRequest,
        fields: &CredentialFields,
        ctx: &mut SessionContext,
    ) -> Result<R, AuthError>;

    /// End the session carried by `ctx`.
    async fn logout(&self, ctx: &mut SessionContext) -> Result<(), AuthError>;
}
