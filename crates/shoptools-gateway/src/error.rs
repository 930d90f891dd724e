//! # Gateway Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Gateway Error Taxonomy                            │
//! │                                                                         │
//! │  Auth failures              Records           Transport / input        │
//! │  ─────────────              ───────           ─────────────────        │
//! │  InvalidCredentials         NotFound          Storage   (DbError)      │
//! │  AccountNotFound                              Validation (core)        │
//! │  EmailInUse                                                            │
//! │  WeakPassword                                                          │
//! │  AuthFailure(msg)                                                      │
//! │  NoUserLoggedIn                                                        │
//! │  SessionExpired                                                        │
//! │                                                                         │
//! │  Display text is what the dashboard shows; SessionStore stores it      │
//! │  verbatim in `error`.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use shoptools_core::{CoreError, ValidationError};
use shoptools_db::DbError;

/// Errors returned by a [`Gateway`](crate::Gateway).
#[derive(Debug, Error)]
pub enum GatewayError {
    // =========================================================================
    // Authentication
    // =========================================================================
    /// Wrong password for an existing account.
    #[error("Invalid password")]
    InvalidCredentials,

    /// No account is registered under the email.
    #[error("No user found with this email")]
    AccountNotFound,

    #[error("Email already registered")]
    EmailInUse,

    #[error("Password is too weak")]
    WeakPassword,

    /// Any other auth failure, with the message the dashboard shows.
    #[error("{0}")]
    AuthFailure(String),

    /// An operation that needs a signed-in user ran without one.
    #[error("No user logged in")]
    NoUserLoggedIn,

    /// The client presented a token that is expired or revoked.
    #[error("Session expired, please sign in again")]
    SessionExpired,

    // =========================================================================
    // Records
    // =========================================================================
    /// Record missing, or owned by another company.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    // =========================================================================
    // Transport / Input
    // =========================================================================
    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl GatewayError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        GatewayError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True for the auth family (credentials, session, account state).
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            GatewayError::InvalidCredentials
                | GatewayError::AccountNotFound
                | GatewayError::EmailInUse
                | GatewayError::WeakPassword
                | GatewayError::AuthFailure(_)
                | GatewayError::NoUserLoggedIn
                | GatewayError::SessionExpired
        )
    }
}

impl From<DbError> for GatewayError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => GatewayError::NotFound { entity, id },
            other => GatewayError::Storage(other.to_string()),
        }
    }
}

/// Scope violations surface as NotFound so other companies' ids are not
/// confirmed.
impl From<CoreError> for GatewayError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => GatewayError::NotFound { entity, id },
            CoreError::CompanyScopeViolation { entity, id, .. } => {
                GatewayError::NotFound { entity, id }
            }
            CoreError::Validation(e) => GatewayError::Validation(e),
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading [`AppConfig`](crate::config::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
