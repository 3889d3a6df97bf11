// ============================
// crates/backend-lib/src/auth/login.rs
// ============================
//! Login workflow: method, schema, decode, lookup, hash projection,
//! verification, session.
use super::credentials;
use super::{AuthRequest, CredentialFields, DefaultAuth, SessionContext};
use crate::error::AuthError;
use crate::schema::Resource;
use crate::storage::RepositoryError;

const DECOY_PASSWORD: &str = "passgate-placeholder-credential";

impl<R: Resource> DefaultAuth<R> {
    pub(super) async fn login(
        &self,
        request: &AuthRequest,
        fields: &CredentialFields,
        ctx: &mut SessionContext,
    ) -> Result<R, AuthError> {
        request.ensure_post()?;

        let schema = R::schema();
        schema.validate_fields(&fields.username, &fields.password)?;

        let credentials = credentials::extract(&request.body, fields)?.credentials;

        let found = self
            .repository
            .find_one(schema.table(), &fields.username, &credentials.username)
            .await;
        let row = match found {
            Ok(row) => row,
            Err(RepositoryError::NotFound) => {
                self.verify_decoy(&credentials.password).await;
                return Err(AuthError::NotFound(credentials.username));
            },
            Err(err) => return Err(AuthError::Lookup(err)),
        };

        let hashed = self
            .repository
            .project_field(schema.table(), &row, &fields.password)
            .await
            .map_err(AuthError::Lookup)?
            .filter(|hash| !hash.is_empty())
            .ok_or_else(|| AuthError::FieldProjection {
                field: fields.password.clone(),
            })?;

        if !self.hasher.verify(&hashed, &credentials.password).await? {
            return Err(AuthError::PasswordMismatch);
        }

        let user = schema.from_row(&row);
        self.sessions.issue(ctx, &user).await?;

        Ok(user)
    }

    /// Run one verification against a placeholder hash, so an unknown
    /// username costs as much scrypt work as a wrong password. The outcome
    /// is discarded.
    async fn verify_decoy(&self, plain: &str) {
        let decoy = self
            .decoy
            .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD))
            .await;
        match decoy {
            Ok(hash) => {
                let _ = self.hasher.verify(hash, plain).await;
            },
            Err(err) => tracing::debug!(error = %err, "placeholder hash unavailable"),
        }
    }
}
