//! # Application Configuration
//!
//! Settings for the backend and the HTTP server.
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (AppConfig::default)                                      │
//! │  2. shoptools.toml   (explicit path, or the platform config dir)       │
//! │  3. SHOPTOOLS_* environment variables                                  │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example shoptools.toml
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! path = "/var/lib/shoptools/shoptools.db"
//! max_connections = 5
//!
//! [auth]
//! jwt_secret = "a-long-random-string"
//! session_lifetime_secs = 604800
//!
//! [storage]
//! public_base_url = "https://dashboard.example.com"
//! max_upload_bytes = 10485760
//! ```
//!
//! ## Environment Variables
//! | Variable | Setting |
//! |----------|---------|
//! | `SHOPTOOLS_BIND_ADDR` | `server.bind_addr` |
//! | `SHOPTOOLS_PORT` | `server.port` |
//! | `SHOPTOOLS_DATABASE_PATH` | `database.path` |
//! | `SHOPTOOLS_JWT_SECRET` | `auth.jwt_secret` |
//! | `SHOPTOOLS_SESSION_LIFETIME_SECS` | `auth.session_lifetime_secs` |
//! | `SHOPTOOLS_PUBLIC_BASE_URL` | `storage.public_base_url` |
//! | `SHOPTOOLS_MAX_UPLOAD_BYTES` | `storage.max_upload_bytes` |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ConfigError;

/// Secret used when none is configured. Accepted, but logged loudly.
pub const DEV_JWT_SECRET: &str = "shoptools-dev-secret-change-in-production";

const MIN_JWT_SECRET_LENGTH: usize = 16;

// =============================================================================
// Sections
// =============================================================================

/// `[server]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    /// `host:port` for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// `[database]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let path = directories::ProjectDirs::from("com", "shoptools", "dashboard")
            .map(|dirs| dirs.data_dir().join("shoptools.db"))
            .unwrap_or_else(|| PathBuf::from("shoptools.db"));

        DatabaseSettings {
            path,
            max_connections: 5,
        }
    }
}

/// `[auth]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 signing key for session tokens.
    pub jwt_secret: String,
    /// How long a session token stays valid.
    pub session_lifetime_secs: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            session_lifetime_secs: 7 * 24 * 3600,
        }
    }
}

/// `[storage]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Prefix of returned file URLs. Empty yields relative `/files/...` URLs.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            public_base_url: String::new(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing sections and keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        info!(?path, "Config saved");
        Ok(())
    }

    /// Applies `SHOPTOOLS_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        }

        if let Some(addr) = lookup("SHOPTOOLS_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(port) = lookup("SHOPTOOLS_PORT") {
            self.server.port = parse("SHOPTOOLS_PORT", port)?;
            debug!(port = self.server.port, "Overriding port from environment");
        }
        if let Some(path) = lookup("SHOPTOOLS_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }
        if let Some(secret) = lookup("SHOPTOOLS_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(secs) = lookup("SHOPTOOLS_SESSION_LIFETIME_SECS") {
            self.auth.session_lifetime_secs = parse("SHOPTOOLS_SESSION_LIFETIME_SECS", secs)?;
        }
        if let Some(base) = lookup("SHOPTOOLS_PUBLIC_BASE_URL") {
            self.storage.public_base_url = base;
        }
        if let Some(bytes) = lookup("SHOPTOOLS_MAX_UPLOAD_BYTES") {
            self.storage.max_upload_bytes = parse("SHOPTOOLS_MAX_UPLOAD_BYTES", bytes)?;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.auth.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "auth.jwt_secret must be at least {MIN_JWT_SECRET_LENGTH} characters"
            )));
        }
        if self.auth.jwt_secret == DEV_JWT_SECRET {
            warn!("Using the development JWT secret; set SHOPTOOLS_JWT_SECRET in production");
        }

        if self.auth.session_lifetime_secs <= 0 {
            return Err(ConfigError::Invalid(
                "auth.session_lifetime_secs must be positive".into(),
            ));
        }

        if self.storage.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_upload_bytes must be greater than 0".into(),
            ));
        }

        let base = self.storage.public_base_url.trim();
        if !base.is_empty() {
            let url = Url::parse(base).map_err(|e| {
                ConfigError::Invalid(format!("storage.public_base_url: {e}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(
                    "storage.public_base_url must start with http:// or https://".into(),
                ));
            }
        }

        Ok(())
    }

    /// `shoptools.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shoptools", "dashboard")
            .map(|dirs| dirs.config_dir().join("shoptools.toml"))
    }
}
