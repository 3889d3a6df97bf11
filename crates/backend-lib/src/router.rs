// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    routing::{any, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::auth;
use crate::schema::Resource;
use crate::AppState;

/// Create the HTTP router
pub fn create_router<R: Resource>(state: Arc<AppState<R>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", any(auth::register::<R>))
        .route("/auth/login", any(auth::login::<R>))
        .route("/auth/logout", post(auth::logout::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
