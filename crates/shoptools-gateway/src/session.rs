//! # Session Store
//!
//! Caches the current authentication state in front of a [`Gateway`] and
//! drives the route guard.
//!
//! ## State Machine
//! ```text
//!                    initialize / login / register
//!  ┌───────────────┐ ───────────────────────────► ┌─────────┐
//!  │ Uninitialized │                              │ Loading │
//!  └───────────────┘                              └────┬────┘
//!                                  ok ┌────────────────┴───────────┐ failed / no session
//!                                     ▼                            ▼
//!                           ┌───────────────┐   logout   ┌─────────────────┐
//!                           │ Authenticated │ ─────────► │ Unauthenticated │
//!                           └───────────────┘            └─────────────────┘
//! ```
//!
//! One store per client, created by whoever owns the client (a request
//! handler, a test). Clones share state. The lock is never held across a
//! gateway call, so concurrent operations race and the later response wins.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shoptools_core::session::{guard, RouteDecision, SessionState};
use shoptools_core::{Identity, ProfilePatch};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{Gateway, Registration};

pub struct SessionStore<G: Gateway + ?Sized> {
    gateway: Arc<G>,
    state: Arc<RwLock<SessionState>>,
}

impl<G: Gateway + ?Sized> Clone for SessionStore<G> {
    fn clone(&self) -> Self {
        SessionStore {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
        }
    }
}

impl<G: Gateway + ?Sized> SessionStore<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        SessionStore {
            gateway,
            state: Arc::new(RwLock::new(SessionState::new())),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Guard decision for the current state.
    pub async fn decision(&self) -> RouteDecision {
        guard(&*self.state.read().await)
    }

    /// Restores an existing session. Failures leave the store
    /// unauthenticated; nothing is returned to the caller.
    pub async fn initialize(&self) {
        self.state.write().await.begin();

        let restored = match self.gateway.current_session().await {
            Ok(Some(session)) => match self.gateway.get_profile(&session.identity_id).await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(error = %e, "Failed to load profile for session");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to check for an existing session");
                None
            }
        };

        let mut state = self.state.write().await;
        match restored {
            Some(user) => {
                debug!(identity_id = %user.id, "Session restored");
                state.authenticated(user);
            }
            None => state.unauthenticated(),
        }
    }

    /// Signs in. On failure the message is stored in `error` and returned.
    pub async fn login(&self, email: &str, password: &str) -> GatewayResult<Identity> {
        self.state.write().await.begin();
        let result = self.gateway.sign_in(email, password).await;
        self.settle(result).await
    }

    /// Creates company and master identity, then signs in as it.
    pub async fn register(&self, registration: &Registration) -> GatewayResult<Identity> {
        self.state.write().await.begin();
        let result = self.gateway.sign_up(registration).await;
        self.settle(result).await
    }

    async fn settle(&self, result: GatewayResult<Identity>) -> GatewayResult<Identity> {
        let mut state = self.state.write().await;
        match &result {
            Ok(user) => {
                info!(identity_id = %user.id, "Authenticated");
                state.authenticated(user.clone());
            }
            Err(e) => {
                debug!(error = %e, "Authentication failed");
                state.failed(e.to_string());
            }
        }
        result
    }

    /// Signs out. Local state is cleared even if the gateway call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.gateway.sign_out().await {
            warn!(error = %e, "Sign-out failed, clearing local session anyway");
        }
        self.state.write().await.signed_out();
    }

    /// Updates the signed-in identity and replaces the cached user with the
    /// stored record. Errors are returned, not stored.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> GatewayResult<Identity> {
        let user_id = self
            .state
            .read()
            .await
            .user()
            .map(|user| user.id.clone())
            .ok_or(GatewayError::NoUserLoggedIn)?;

        let updated = self.gateway.update_profile(&user_id, patch).await?;
        self.state.write().await.profile_replaced(updated.clone());
        Ok(updated)
    }

    pub async fn clear_error(&self) {
        self.state.write().await.clear_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use crate::config::StorageSettings;
    use crate::local::{LocalBackend, LocalGateway};
    use shoptools_core::session::AuthStatus;
    use shoptools_db::{Database, DbConfig};

    async fn store() -> (LocalBackend, SessionStore<LocalGateway>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let backend = LocalBackend::new(
            db,
            TokenIssuer::new("test-secret-0123456789", 3600),
            StorageSettings::default(),
        );
        let store = SessionStore::new(Arc::new(backend.client()));
        (backend, store)
    }

    fn registration() -> Registration {
        Registration {
            email: "ana@example.com".to_string(),
            password: "secret123".to_string(),
            name: "Ana".to_string(),
            phone: "+1 555 0100".to_string(),
            company_name: "Acme".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fresh_store_is_loading() {
        let (_, store) = store().await;
        let state = store.snapshot().await;
        assert!(state.loading());
        assert_eq!(state.status(), AuthStatus::Uninitialized);
        assert_eq!(store.decision().await, RouteDecision::Placeholder);

        store.initialize().await;
        let state = store.snapshot().await;
        assert!(!state.loading());
        assert!(!state.is_authenticated());
        assert_eq!(state.error(), None);
        assert_eq!(store.decision().await, RouteDecision::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_register_then_restore_in_new_store() {
        let (backend, store) = store().await;
        let user = store.register(&registration()).await.unwrap();
        assert_eq!(store.decision().await, RouteDecision::Allow);

        let token = store.gateway().token().await.unwrap();
        let restored = SessionStore::new(Arc::new(backend.resume(token)));
        restored.initialize().await;

        let state = restored.snapshot().await;
        assert!(state.is_authenticated());
        assert_eq!(state.user(), Some(&user));
    }

    #[tokio::test]
    async fn test_failed_login_sets_error_and_clear_error() {
        let (_, store) = store().await;
        store.initialize().await;

        let err = store.login("ghost@example.com", "secret123").await.unwrap_err();
        assert!(matches!(err, GatewayError::AccountNotFound));

        let state = store.snapshot().await;
        assert!(!state.is_authenticated());
        assert_eq!(state.error(), Some("No user found with this email"));
        assert_eq!(state.status(), AuthStatus::Unauthenticated);

        store.clear_error().await;
        assert_eq!(store.snapshot().await.error(), None);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (_, store) = store().await;
        store.register(&registration()).await.unwrap();

        store.logout().await;
        store.logout().await;

        let state = store.snapshot().await;
        assert!(!state.is_authenticated());
        assert!(state.user().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let (_, store) = store().await;
        let other = store.clone();
        store.register(&registration()).await.unwrap();
        assert!(other.snapshot().await.is_authenticated());
    }
}
