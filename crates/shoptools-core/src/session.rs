//! # Session State Machine
//!
//! The pure half of the session store: what the dashboard knows about the
//! signed-in user, and the route guard decision derived from it.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────────┐  initialize / login / register                      │
//! │   │ Uninitialized │─────────────────────────┐                           │
//! │   └───────────────┘                         ▼                           │
//! │                                      ┌─────────────┐                    │
//! │              ┌──────────────────────►│   Loading   │◄─────────┐         │
//! │              │  login / register     └──────┬──────┘          │         │
//! │              │                   ok ┌───────┴───────┐ failed  │         │
//! │              │                      ▼               ▼         │         │
//! │   ┌──────────┴──────┐  logout  ┌─────────────────┐            │         │
//! │   │ Authenticated   │─────────►│ Unauthenticated │────────────┘         │
//! │   └─────────────────┘          └─────────────────┘  login / register    │
//! │                                                                         │
//! │   A failed login keeps whatever authentication existed before it.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Route Guard
//! | `loading` | `is_authenticated` | decision            |
//! |-----------|--------------------|---------------------|
//! | true      | any                | `Placeholder`       |
//! | false     | true               | `Allow`             |
//! | false     | false              | `RedirectToLogin`   |

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Identity;
use crate::LOGIN_ROUTE;

// =============================================================================
// Auth Status
// =============================================================================

/// Position in the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// Nothing resolved yet (fresh page load).
    Uninitialized,
    /// A gateway call is in flight.
    Loading,
    Authenticated,
    Unauthenticated,
}

// =============================================================================
// Session State
// =============================================================================

/// Snapshot of the session as observed by the dashboard.
///
/// Fields are private; the transition methods are the only way to change
/// them, which keeps `is_authenticated` and `user` consistent.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    user: Option<Identity>,
    is_authenticated: bool,
    loading: bool,
    error: Option<String>,
    status: AuthStatus,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::new()
    }
}

impl SessionState {
    /// Fresh state: no user, loading until `initialize` resolves.
    pub fn new() -> Self {
        SessionState {
            user: None,
            is_authenticated: false,
            loading: true,
            error: None,
            status: AuthStatus::Uninitialized,
        }
    }

    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// A gateway call started. Clears the previous error; the current
    /// authentication stays visible until the call resolves.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.status = AuthStatus::Loading;
    }

    /// The gateway produced a signed-in identity.
    pub fn authenticated(&mut self, user: Identity) {
        self.user = Some(user);
        self.is_authenticated = true;
        self.loading = false;
        self.error = None;
        self.status = AuthStatus::Authenticated;
    }

    /// No session (or no matching profile) was found.
    pub fn unauthenticated(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.loading = false;
        self.status = AuthStatus::Unauthenticated;
    }

    /// A login or registration failed with a displayable message.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
        self.status = if self.is_authenticated {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        };
    }

    /// Local sign-out. Always ends unauthenticated.
    pub fn signed_out(&mut self) {
        self.unauthenticated();
        self.error = None;
    }

    /// Replaces the cached profile after a successful update.
    ///
    /// Ignored when nobody is signed in anymore.
    pub fn profile_replaced(&mut self, user: Identity) {
        if self.is_authenticated {
            self.user = Some(user);
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

// =============================================================================
// Route Guard
// =============================================================================

/// What a protected view should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Session not resolved yet: render a loading placeholder.
    Placeholder,
    /// Render the protected view.
    Allow,
    /// Send the visitor to the login view.
    RedirectToLogin,
}

impl RouteDecision {
    /// Target path for a redirect decision.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            RouteDecision::RedirectToLogin => Some(LOGIN_ROUTE),
            _ => None,
        }
    }
}

/// Decides access to a protected view from the session state alone.
pub fn guard(state: &SessionState) -> RouteDecision {
    if state.loading() {
        RouteDecision::Placeholder
    } else if state.is_authenticated() {
        RouteDecision::Allow
    } else {
        RouteDecision::RedirectToLogin
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use chrono::Utc;

    fn user(name: &str) -> Identity {
        Identity {
            id: "u-1".to_string(),
            name: name.to_string(),
            email: "a@b.com".to_string(),
            role: Role::Master,
            company_id: "company_u-1".to_string(),
            phone: "1".to_string(),
            avatar: None,
            website: None,
            wechat: None,
            facebook: None,
            instagram: None,
            youtube: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_state_is_loading() {
        let state = SessionState::new();
        assert!(state.loading());
        assert!(!state.is_authenticated());
        assert!(state.user().is_none());
        assert!(state.error().is_none());
        assert_eq!(state.status(), AuthStatus::Uninitialized);
        assert_eq!(guard(&state), RouteDecision::Placeholder);
    }

    #[test]
    fn test_authenticated_allows() {
        let mut state = SessionState::new();
        state.begin();
        state.authenticated(user("Ana"));

        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert_eq!(state.user().map(|u| u.name.as_str()), Some("Ana"));
        assert_eq!(guard(&state), RouteDecision::Allow);
    }

    #[test]
    fn test_unauthenticated_redirects() {
        let mut state = SessionState::new();
        state.unauthenticated();

        let decision = guard(&state);
        assert_eq!(decision, RouteDecision::RedirectToLogin);
        assert_eq!(decision.redirect_target(), Some("/login"));
        assert_eq!(RouteDecision::Allow.redirect_target(), None);
    }

    #[test]
    fn test_failed_login_while_unauthenticated() {
        let mut state = SessionState::new();
        state.unauthenticated();
        state.begin();
        state.failed("Invalid password");

        assert!(!state.is_authenticated());
        assert!(!state.loading());
        assert_eq!(state.error(), Some("Invalid password"));
        assert_eq!(state.status(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn test_failed_login_keeps_existing_session() {
        let mut state = SessionState::new();
        state.authenticated(user("Ana"));
        state.begin();
        assert!(state.is_authenticated());

        state.failed("Invalid password");
        assert!(state.is_authenticated());
        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert_eq!(guard(&state), RouteDecision::Allow);
    }

    #[test]
    fn test_signed_out_clears_everything() {
        let mut state = SessionState::new();
        state.authenticated(user("Ana"));
        state.failed("boom");
        state.signed_out();

        assert!(!state.is_authenticated());
        assert!(state.user().is_none());
        assert!(state.error().is_none());
        assert_eq!(guard(&state), RouteDecision::RedirectToLogin);
    }

    #[test]
    fn test_profile_replaced_only_when_signed_in() {
        let mut state = SessionState::new();
        state.profile_replaced(user("Ghost"));
        assert!(state.user().is_none());

        state.authenticated(user("Ana"));
        state.profile_replaced(user("X"));
        assert_eq!(state.user().map(|u| u.name.as_str()), Some("X"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut state = SessionState::new();
        state.unauthenticated();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["isAuthenticated"], false);
        assert_eq!(json["loading"], false);
        assert_eq!(json["status"], "unauthenticated");
        assert!(json["user"].is_null());
    }
}
