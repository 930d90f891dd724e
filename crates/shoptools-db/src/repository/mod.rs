//! # Repository Module
//!
//! Database repository implementations for ShopTools.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LocalGateway                                                          │
//! │       │                                                                 │
//! │       │  db.suppliers().list_by_company("company_u-1")                 │
//! │       ▼                                                                 │
//! │  SupplierRepository                                                    │
//! │  ├── list_by_company(&self, company_id)                                │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, supplier)                                           │
//! │  ├── update(&self, supplier)                                           │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL → private `*Row` struct (FromRow) → domain record         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`company::CompanyRepository`] - Tenants
//! - [`identity::IdentityRepository`] - User profiles
//! - [`auth::CredentialRepository`] - Sign-in accounts (email + password hash)
//! - [`auth::AuthSessionRepository`] - Issued session tokens
//! - [`supplier::SupplierRepository`] - Supplier CRUD
//! - [`product::ProductRepository`] - Product CRUD
//! - [`blob::BlobRepository`] - Uploaded files

pub mod auth;
pub mod blob;
pub mod company;
pub mod identity;
pub mod product;
pub mod supplier;
