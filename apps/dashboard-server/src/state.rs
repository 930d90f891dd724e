//! Shared application state.

use std::sync::Arc;

use shoptools_gateway::{LocalBackend, LocalGateway, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub backend: LocalBackend,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(backend: LocalBackend, max_upload_bytes: usize) -> Self {
        AppState {
            backend,
            max_upload_bytes,
        }
    }

    /// A session store for one request, resumed from its bearer token.
    pub fn session_store(&self, token: Option<&str>) -> SessionStore<LocalGateway> {
        let client = match token {
            Some(token) => self.backend.resume(token),
            None => self.backend.client(),
        };
        SessionStore::new(Arc::new(client))
    }
}
