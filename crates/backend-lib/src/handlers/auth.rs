// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! HTTP handlers for register, login and logout.
//!
//! Register and login accept every method so that the workflow itself
//! rejects anything but `POST`. The session token travels in a cookie and
//! is echoed in the response body.
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use passgate_common::{AuthSuccess, SESSION_COOKIE};

use crate::auth::{AuthRequest, SessionContext};
use crate::error::AuthError;
use crate::schema::Resource;
use crate::AppState;

/// Register a new account
pub async fn register<R: Resource>(
    State(state): State<Arc<AppState<R>>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AuthError> {
    let request = AuthRequest::new(method, body);
    let mut ctx = session_context(&headers);
    let user = state
        .auth
        .register_with_password(&request, &state.fields, &mut ctx)
        .await?;
    success_response(&state, &user, &ctx)
}

/// Log in to an existing account
pub async fn login<R: Resource>(
    State(state): State<Arc<AppState<R>>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AuthError> {
    let request = AuthRequest::new(method, body);
    let mut ctx = session_context(&headers);
    let user = state
        .auth
        .login_with_password(&request, &state.fields, &mut ctx)
        .await?;
    success_response(&state, &user, &ctx)
}

/// End the caller's session
pub async fn logout<R: Resource>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let mut ctx = session_context(&headers);
    state.auth.logout(&mut ctx).await?;

    let expired = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, header_value(&expired)?)]).into_response())
}

/// Build a session context from the request's `Cookie` headers
pub fn session_context(headers: &HeaderMap) -> SessionContext {
    session_token(headers).map_or_else(SessionContext::new, SessionContext::with_presented)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn success_response<R: Resource>(
    state: &AppState<R>,
    user: &R,
    ctx: &SessionContext,
) -> Result<Response, AuthError> {
    let token = ctx
        .issued_token()
        .ok_or_else(|| AuthError::Internal("workflow finished without a session".to_string()))?;

    let mut fields = R::schema().to_row(user);
    fields.remove(&state.fields.password);

    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        state.settings.session_ttl_secs
    );
    let body = AuthSuccess {
        user: fields,
        session_token: token.to_string(),
    };
    Ok(([(SET_COOKIE, header_value(&cookie)?)], Json(body)).into_response())
}

fn header_value(value: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(value).map_err(|e| AuthError::Internal(format!("invalid header: {e}")))
}
