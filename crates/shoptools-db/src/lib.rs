//! # shoptools-db: Database Layer for ShopTools
//!
//! This crate provides persistence for the ShopTools backend. It uses SQLite
//! with sqlx for async operations, and stands in for a hosted document
//! database, identity provider and file store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopTools Data Flow                              │
//! │                                                                         │
//! │  LocalGateway (list_suppliers, sign_in, upload_file, ...)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   shoptools-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │  │   │
//! │  │   │               │◄───│ companies          │  │            │  │   │
//! │  │   │ SqlitePool    │    │ identities         │  │ 001_init   │  │   │
//! │  │   │               │    │ credentials        │  │            │  │   │
//! │  │   │               │    │ auth_sessions      │  │            │  │   │
//! │  │   │               │    │ suppliers/products │  │            │  │   │
//! │  │   │               │    │ blobs              │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (see SHOPTOOLS_DATABASE_PATH)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Company Scoping
//! Repositories take `company_id` wherever a listing is company-scoped, but
//! they do not check ownership on single-record access. The gateway does.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shoptools_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("shoptools.db")).await?;
//! let suppliers = db.suppliers().list_by_company("company_u-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::auth::{
    AuthSessionRecord, AuthSessionRepository, CredentialRecord, CredentialRepository,
};
pub use repository::blob::{BlobRepository, StoredBlob};
pub use repository::company::CompanyRepository;
pub use repository::identity::IdentityRepository;
pub use repository::product::ProductRepository;
pub use repository::supplier::SupplierRepository;
