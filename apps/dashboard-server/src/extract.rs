//! Request extractors: the route guard and the unguarded client session.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

use shoptools_core::session::{guard, RouteDecision};
use shoptools_core::Identity;
use shoptools_gateway::auth::extract_bearer_token;
use shoptools_gateway::{LocalGateway, SessionStore};

use crate::error::ApiError;
use crate::state::AppState;

fn bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
}

/// The caller's session store, not yet initialized. Never rejects.
pub struct ClientSession(pub SessionStore<LocalGateway>);

impl FromRequestParts<AppState> for ClientSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(ClientSession(state.session_store(bearer(parts))))
    }
}

/// Route guard. Initializes the caller's session and only lets
/// authenticated requests through.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(auth: Authenticated) -> impl IntoResponse {
///     Json(auth.user)
/// }
/// ```
pub struct Authenticated {
    pub store: SessionStore<LocalGateway>,
    pub user: Identity,
}

impl Authenticated {
    pub fn company_id(&self) -> &str {
        &self.user.company_id
    }

    pub fn gateway(&self) -> &LocalGateway {
        self.store.gateway()
    }
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let store = state.session_store(bearer(parts));
        store.initialize().await;

        let snapshot = store.snapshot().await;
        match guard(&snapshot) {
            RouteDecision::Allow => {
                let user = snapshot
                    .user()
                    .cloned()
                    .ok_or_else(|| ApiError::login_required("No user logged in"))?;
                Ok(Authenticated { store, user })
            }
            RouteDecision::Placeholder => Err(ApiError::session_loading()),
            RouteDecision::RedirectToLogin => Err(ApiError::login_required("Sign in required")),
        }
    }
}
