// ================
// crates/common/src/lib.rs
// ================
//! Wire types shared between the `passgate` server and its clients.
//! Request bodies are flat JSON objects of strings; responses are either an
//! [`AuthSuccess`] or an [`ErrorEnvelope`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat field-name to value mapping. Used for request payloads and for the
/// storage-neutral form of a user resource.
pub type FieldMap = BTreeMap<String, String>;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "passgate_session";

/// Successful register or login response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthSuccess {
    /// The user resource, without its password field
    pub user: FieldMap,
    /// Token of the newly issued session
    pub session_token: String,
}

/// Error details returned to clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Stable machine-readable code (e.g. `AUTH_002`)
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Envelope wrapping every error response body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}
