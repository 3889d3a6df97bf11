// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are scrypt PHC strings (`$scrypt$ln=15,r=8,p=1$<salt>$<hash>`).
//! The work factor is fixed once per process when the [`ScryptHasher`] is
//! built; every hash carries its own parameters, so verification keeps
//! working for hashes produced under an earlier work factor.
use async_trait::async_trait;
use rand::RngCore;
use scrypt::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
        SaltString,
    },
    Params, Scrypt,
};
use zeroize::Zeroizing;

use crate::error::AuthError;

/// Default scrypt cost: N = 2^15.
pub const DEFAULT_LOG_N: u8 = 15;
/// Default scrypt block size.
pub const DEFAULT_R: u32 = 8;
/// Default scrypt parallelism.
pub const DEFAULT_P: u32 = 1;

/// Length of the random salt in bytes
const SALT_BYTES: usize = 16;

/// One-way salted hashing of plaintext passwords.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password.
    async fn hash(&self, plain: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// `Ok(false)` means the password does not match; `Err` means the
    /// stored hash could not be used at all.
    async fn verify(&self, hashed: &str, plain: &str) -> Result<bool, AuthError>;
}

/// scrypt-backed [`PasswordHasher`].
#[derive(Debug, Clone, Copy)]
pub struct ScryptHasher {
    params: Params,
}

impl Default for ScryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_N, DEFAULT_R, DEFAULT_P).unwrap_or(Self {
            params: Params::recommended(),
        })
    }
}

impl ScryptHasher {
    /// Build a hasher with an explicit work factor.
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, AuthError> {
        let params = Params::new(log_n, r, p, Params::RECOMMENDED_LEN)
            .map_err(|e| AuthError::Hash(format!("invalid scrypt parameters: {e}")))?;
        Ok(Self { params })
    }

    pub fn log_n(&self) -> u8 {
        self.params.log_n()
    }
}

#[async_trait]
impl PasswordHasher for ScryptHasher {
    async fn hash(&self, plain: &str) -> Result<String, AuthError> {
        let plain = Zeroizing::new(plain.to_owned());
        let params = self.params;
        tokio::task::spawn_blocking(move || hash_password(&plain, params)).await?
    }

    async fn verify(&self, hashed: &str, plain: &str) -> Result<bool, AuthError> {
        let plain = Zeroizing::new(plain.to_owned());
        let hashed = hashed.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&hashed, &plain)).await?
    }
}

/// Hash a password using scrypt with the given parameters
pub fn hash_password(plain: &str, params: Params) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; SALT_BYTES];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AuthError::Hash(format!("salt encoding failed: {e}")))?;

    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash.
///
/// The digest comparison inside `password-hash` is constant-time.
pub fn verify_password(hash: &str, plain: &str) -> Result<bool, AuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::Hash(format!("malformed stored hash: {e}")))?;
    match Scrypt.verify_password(plain.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(AuthError::Hash(e.to_string())),
    }
}
