// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{CredentialFields, DEFAULT_LOG_N, DEFAULT_P, DEFAULT_R};


/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "passgate.toml";

/// Prefix for environment overrides, e.g. `PASSGATE_HASHING__LOG_N=14`
pub const ENV_PREFIX: &str = "PASSGATE_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Longest session lifetime accepted from configuration (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 365;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Where accounts are stored
    pub storage: StorageBackend,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Designated username and password columns
    pub fields: FieldSettings,
    /// scrypt work factor
    pub hashing: HashingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    FlatFile,
}

/// Names of the username and password columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub username: String,
    pub password: String,
}

/// scrypt parameters, fixed for the life of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    /// log2 of the CPU/memory cost N
    pub log_n: u8,
    /// Block size
    pub r: u32,
    /// Parallelism
    pub p: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            storage: StorageBackend::FlatFile,
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            fields: FieldSettings::default(),
            hashing: HashingSettings::default(),
        }
    }
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            username: "email".to_string(),
            password: "pwd".to_string(),
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            log_n: DEFAULT_LOG_N,
            r: DEFAULT_R,
            p: DEFAULT_P,
        }
    }
}

impl Settings {
    /// Load settings from `passgate.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::extract(Self::figment(Path::new(DEFAULT_CONFIG_FILE)))
    }

    /// Load settings from an explicit file, then the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("config file {} not found", path.display());
        }
        Self::extract(Self::figment(path))
    }

    /// Defaults, then the TOML file (if present), then `PASSGATE_` variables
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("invalid log level {:?}", self.log_level);
        }
        if self.session_ttl_secs == 0 || self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            bail!(
                "session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}, got {}",
                self.session_ttl_secs
            );
        }
        if self.fields.username.is_empty() || self.fields.password.is_empty() {
            bail!("username and password field names must not be empty");
        }
        if self.fields.username == self.fields.password {
            bail!("username and password must be different fields");
        }
        if self.hashing.log_n == 0 || self.hashing.log_n >= 64 || self.hashing.r == 0 || self.hashing.p == 0 {
            bail!("invalid scrypt parameters {:?}", self.hashing);
        }
        Ok(())
    }

    pub fn credential_fields(&self) -> CredentialFields {
        CredentialFields::new(&self.fields.username, &self.fields.password)
    }
}
