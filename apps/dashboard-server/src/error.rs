//! API error type.
//!
//! Every failed request answers `{"code": "...", "message": "..."}`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use shoptools_core::LOGIN_ROUTE;
use shoptools_gateway::GatewayError;

/// Seconds a client should wait before retrying while the session resolves.
pub const RETRY_AFTER_SECS: u64 = 1;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    /// Sent as `Retry-After`.
    pub retry_after: Option<u64>,
    /// Sent as `Location`.
    pub location: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
            retry_after: None,
            location: None,
        }
    }

    /// 401 pointing the client at the login route.
    pub fn login_required(message: impl Into<String>) -> Self {
        ApiError {
            location: Some(LOGIN_ROUTE),
            ..Self::new(StatusCode::UNAUTHORIZED, "login_required", message)
        }
    }

    /// 503 while the session is still being resolved.
    pub fn session_loading() -> Self {
        ApiError {
            retry_after: Some(RETRY_AFTER_SECS),
            ..Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "session_loading",
                "Session is still loading",
            )
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        match err {
            GatewayError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, "invalid_credentials", message)
            }
            GatewayError::AccountNotFound => {
                ApiError::new(StatusCode::UNAUTHORIZED, "account_not_found", message)
            }
            GatewayError::EmailInUse => ApiError::new(StatusCode::CONFLICT, "email_in_use", message),
            GatewayError::WeakPassword => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "weak_password", message)
            }
            GatewayError::AuthFailure(_) => {
                ApiError::new(StatusCode::UNAUTHORIZED, "auth_failure", message)
            }
            GatewayError::NoUserLoggedIn | GatewayError::SessionExpired => {
                ApiError::login_required(message)
            }
            GatewayError::NotFound { .. } => ApiError::not_found(message),
            GatewayError::Validation(_) => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "validation", message)
            }
            GatewayError::Storage(_) => {
                error!(error = %message, "Storage failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            code: self.code,
            message: &self.message,
        });
        let mut response = (self.status, body).into_response();

        let headers = response.headers_mut();
        if let Some(secs) = self.retry_after {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        if let Some(location) = self.location {
            headers.insert(header::LOCATION, HeaderValue::from_static(location));
        }

        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
