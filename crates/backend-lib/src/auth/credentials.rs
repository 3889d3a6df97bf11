// ============================
// crates/backend-lib/src/auth/credentials.rs
// ============================
//! Request payload decoding and credential extraction.
use std::fmt;

use passgate_common::FieldMap;
use zeroize::Zeroizing;

use crate::error::AuthError;

/// Names of the username and password columns, chosen per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialFields {
    pub username: String,
    pub password: String,
}

impl CredentialFields {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Username and plaintext password pulled out of a request.
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A decoded request payload.
#[derive(Debug)]
pub struct ExtractedPayload {
    pub credentials: Credentials,
    /// Every other field of the payload. The password is never in here.
    pub extra: FieldMap,
}

/// Decode `body` as a flat JSON object of strings and pull out the
/// designated username and password fields.
///
/// The username field is checked before the password field.
pub fn extract(body: &[u8], fields: &CredentialFields) -> Result<ExtractedPayload, AuthError> {
    let mut values: FieldMap = serde_json::from_slice(body)?;

    let username = take_non_empty(&mut values, &fields.username)?;
    let password = Zeroizing::new(take_non_empty(&mut values, &fields.password)?);

    Ok(ExtractedPayload {
        credentials: Credentials { username, password },
        extra: values,
    })
}

fn take_non_empty(values: &mut FieldMap, field: &str) -> Result<String, AuthError> {
    match values.remove(field) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AuthError::MissingField {
            field: field.to_string(),
        }),
    }
}
