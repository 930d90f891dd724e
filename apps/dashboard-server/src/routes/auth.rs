//! Sign-in, sign-up, sign-out and session status. Unguarded.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use shoptools_core::session::{RouteDecision, SessionState};
use shoptools_gateway::{LocalGateway, Registration, SessionStore};

use crate::error::ApiResult;
use crate::extract::ClientSession;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: Option<String>,
    pub session: SessionState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session: SessionState,
    pub decision: RouteDecision,
    pub redirect_to: Option<&'static str>,
}

async fn respond(store: &SessionStore<LocalGateway>) -> Json<AuthResponse> {
    Json(AuthResponse {
        token: store.gateway().token().await,
        session: store.snapshot().await,
    })
}

pub async fn login(
    ClientSession(store): ClientSession,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    store.login(&request.email, &request.password).await?;
    Ok(respond(&store).await)
}

pub async fn register(
    ClientSession(store): ClientSession,
    Json(registration): Json<Registration>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    store.register(&registration).await?;
    Ok((StatusCode::CREATED, respond(&store).await))
}

/// Always succeeds; the presented token is revoked when possible.
pub async fn logout(ClientSession(store): ClientSession) -> StatusCode {
    store.logout().await;
    StatusCode::NO_CONTENT
}

pub async fn session(ClientSession(store): ClientSession) -> Json<SessionResponse> {
    store.initialize().await;
    let decision = store.decision().await;
    Json(SessionResponse {
        session: store.snapshot().await,
        decision,
        redirect_to: decision.redirect_target(),
    })
}
