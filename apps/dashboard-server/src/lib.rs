//! # ShopTools Dashboard Server
//!
//! JSON API for the business dashboard.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dashboard Server                                 │
//! │                                                                         │
//! │  Browser ───► axum (8080) ───► Authenticated ───► LocalGateway ───► SQLite
//! │                                (SessionStore +                          │
//! │                                 route guard)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each request gets its own [`SessionStore`](shoptools_gateway::SessionStore),
//! resumed from the `Authorization: Bearer` token and initialized before the
//! guard decides.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
