//! # shoptools-core: Pure Business Logic for ShopTools
//!
//! This crate is the **heart** of ShopTools. It contains the record types,
//! validation rules and the session state machine as pure code with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopTools Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Browser Dashboard (SPA)                          │   │
//! │  │   Login ──► Dashboard ──► Suppliers ──► Products ──► Profile    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              dashboard-server (axum) + shoptools-gateway        │   │
//! │  │      SessionStore, RouteGuard, Gateway (auth, CRUD, files)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shoptools-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  session  │  │ validation│  │   │
//! │  │   │ Identity  │  │   Money   │  │ FSM +     │  │   rules   │  │   │
//! │  │   │ Supplier  │  │           │  │ RouteGuard│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Identity, Company, Supplier, Product) and patches
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation at the gateway boundary
//! - [`session`] - Session state machine and route guard
//! - [`dashboard`] - Dashboard widget statistics
//!
//! ## Example Usage
//!
//! ```rust
//! use shoptools_core::session::{guard, RouteDecision, SessionState};
//!
//! // A fresh page load has not resolved its session yet
//! let mut state = SessionState::new();
//! assert_eq!(guard(&state), RouteDecision::Placeholder);
//!
//! // Nobody signed in: the guard sends the visitor to the login view
//! state.unauthenticated();
//! assert_eq!(guard(&state), RouteDecision::RedirectToLogin);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dashboard;
pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every company document id.
///
/// A company is created together with its master identity, so its id is
/// derived from the identity id: `company_<identity id>`.
pub const COMPANY_ID_PREFIX: &str = "company_";

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum length of names (people, companies, products).
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of free-text notes and descriptions.
pub const MAX_NOTES_LENGTH: usize = 5000;

/// Path of the login view the route guard redirects to.
pub const LOGIN_ROUTE: &str = "/login";
