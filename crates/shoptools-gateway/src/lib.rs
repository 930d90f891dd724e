//! # shoptools-gateway: Backend Gateway + Session Store
//!
//! The dashboard's view of its backend.
//!
//! ## Module Organization
//! ```text
//! shoptools_gateway
//! ├── gateway        - Gateway trait (auth, profile, records, files)
//! ├── local          - LocalBackend / LocalGateway over shoptools-db
//! ├── auth           - JWT session tokens, argon2 password hashing
//! ├── registration   - Sign-up saga with compensation
//! ├── media          - Storage paths, data URLs, upload helpers
//! ├── session        - SessionStore<G>: cached auth state + guard decision
//! ├── config         - AppConfig (TOML + SHOPTOOLS_* env)
//! └── error          - GatewayError, ConfigError
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::new(&config.database.path)).await?;
//! let backend = LocalBackend::from_config(db, &config);
//!
//! let store = SessionStore::new(Arc::new(backend.client()));
//! store.initialize().await;
//! store.login("ana@example.com", "secret123").await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod local;
pub mod media;
pub mod registration;
pub mod session;

pub use config::AppConfig;
pub use error::{ConfigError, GatewayError, GatewayResult};
pub use gateway::{Gateway, Registration, SessionHandle, StoredFile};
pub use local::{LocalBackend, LocalGateway};
pub use registration::RegistrationSaga;
pub use session::SessionStore;
