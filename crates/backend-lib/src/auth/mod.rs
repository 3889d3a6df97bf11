// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module: registration, login and logout workflows plus
//! the hashing and session pieces they are built from.

pub mod credentials;
pub mod password;
pub mod session;
pub mod token_generator;
mod login;
mod registration;
mod service;
mod service_impl;

pub use credentials::{extract, CredentialFields, Credentials, ExtractedPayload};
pub use password::{PasswordHasher, ScryptHasher, DEFAULT_LOG_N, DEFAULT_P, DEFAULT_R};
pub use session::{
    Session, SessionContext, SessionError, SessionIssuer, SessionManager, SessionOutcome,
    SESSION_TTL,
};
pub use service::{AuthRequest, AuthService};
pub use service_impl::DefaultAuth;
