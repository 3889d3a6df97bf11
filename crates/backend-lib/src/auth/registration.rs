// ============================
// crates/backend-lib/src/auth/registration.rs
// ============================
//! Registration workflow.
//!
//! Gates run strictly in order: method, schema, decode, uniqueness, hash,
//! persist, session. The first failing gate ends the request, so no hash is
//! computed for a known duplicate and nothing is written if hashing fails.
use super::credentials::{self, ExtractedPayload};
use super::{AuthRequest, CredentialFields, DefaultAuth, SessionContext};
use crate::error::AuthError;
use crate::schema::Resource;
use crate::storage::RepositoryError;

impl<R: Resource> DefaultAuth<R> {
    pub(super) async fn register(
        &self,
        request: &AuthRequest,
        fields: &CredentialFields,
        ctx: &mut SessionContext,
    ) -> Result<R, AuthError> {
        request.ensure_post()?;

        let schema = R::schema();
        schema.validate_fields(&fields.username, &fields.password)?;

        let ExtractedPayload { credentials, extra } = credentials::extract(&request.body, fields)?;

        let existing = self
            .repository
            .exists(schema.table(), &fields.username, &credentials.username)
            .await
            .map_err(AuthError::Lookup)?;
        if existing > 0 {
            return Err(AuthError::DuplicateAccount);
        }

        let hashed = self.hasher.hash(&credentials.password).await?;

        let mut user = R::default();
        for (name, value) in extra {
            if !schema.set(&mut user, &name, value) {
                tracing::debug!(field = %name, "ignoring payload field not on schema");
            }
        }
        schema.set(&mut user, &fields.username, credentials.username.clone());
        schema.set(&mut user, &fields.password, hashed);

        // The repository enforces uniqueness itself; losing a race to a
        // concurrent registration surfaces here rather than at the check above.
        self.repository
            .create(schema.table(), &schema.to_row(&user), &fields.username)
            .await
            .map_err(|err| match err {
                RepositoryError::UniqueViolation { .. } => AuthError::DuplicateAccount,
                other => AuthError::Persistence(other),
            })?;

        self.sessions.issue(ctx, &user).await?;

        Ok(user)
    }
}
