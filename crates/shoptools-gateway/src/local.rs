//! # Local Gateway
//!
//! [`Gateway`] over the SQLite database: argon2 credentials, JWT sessions
//! recorded in `auth_sessions`, documents and blob storage.
//!
//! ```text
//! ┌──────────────────────────────┐        ┌──────────────────────────────┐
//! │ LocalBackend (shared)        │ client │ LocalGateway (per client)    │
//! │  Database                    │───────►│  backend                     │
//! │  TokenIssuer                 │ resume │  token: RwLock<Option<..>>   │
//! │  storage settings            │───────►│                              │
//! └──────────────────────────────┘        └──────────────────────────────┘
//! ```
//!
//! A `LocalGateway` plays the part of one browser's SDK instance: it holds
//! that client's token. The HTTP server resumes one per request from the
//! bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shoptools_core::validation::{
    validate_new_product, validate_new_supplier, validate_product_patch, validate_profile_patch,
    validate_supplier_patch,
};
use shoptools_core::{
    Company, CoreError, Identity, NewProduct, NewSupplier, Product, ProductPatch, ProfilePatch,
    Supplier, SupplierPatch, ValidationError,
};
use shoptools_db::{AuthSessionRecord, Database};

use crate::auth::{verify_password, TokenIssuer};
use crate::config::{AppConfig, StorageSettings};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{Gateway, Registration, SessionHandle, StoredFile};
use crate::media::{self, DataUrl};
use crate::registration::RegistrationSaga;

const SIGN_IN_FAILED: &str = "Failed to sign in";
const SIGN_UP_FAILED: &str = "Failed to create account";
const SIGN_OUT_FAILED: &str = "Failed to sign out";

// =============================================================================
// LocalBackend
// =============================================================================

/// Shared backend state. Cheap to clone.
#[derive(Clone)]
pub struct LocalBackend {
    db: Database,
    tokens: Arc<TokenIssuer>,
    storage: StorageSettings,
}

impl LocalBackend {
    pub fn new(db: Database, tokens: TokenIssuer, storage: StorageSettings) -> Self {
        LocalBackend {
            db,
            tokens: Arc::new(tokens),
            storage,
        }
    }

    pub fn from_config(db: Database, config: &AppConfig) -> Self {
        Self::new(
            db,
            TokenIssuer::new(
                config.auth.jwt_secret.clone(),
                config.auth.session_lifetime_secs,
            ),
            config.storage.clone(),
        )
    }

    /// A client with no session.
    pub fn client(&self) -> LocalGateway {
        LocalGateway {
            backend: self.clone(),
            token: RwLock::new(None),
        }
    }

    /// A client holding a previously issued token. The token is checked
    /// lazily, by `current_session` and by each operation.
    pub fn resume(&self, token: impl Into<String>) -> LocalGateway {
        LocalGateway {
            backend: self.clone(),
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

// =============================================================================
// LocalGateway
// =============================================================================

pub struct LocalGateway {
    backend: LocalBackend,
    token: RwLock<Option<String>>,
}

impl LocalGateway {
    /// The token this client currently holds.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    fn db(&self) -> &Database {
        &self.backend.db
    }

    /// Validates the held token against its signature, expiry and the
    /// session table.
    async fn session_for_token(&self) -> GatewayResult<Option<SessionHandle>> {
        let Some(token) = self.token().await else {
            return Ok(None);
        };

        let claims = match self.backend.tokens.validate(&token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Held token rejected");
                return Err(GatewayError::SessionExpired);
            }
        };

        let active = self
            .db()
            .auth_sessions()
            .find_active(&claims.jti, Utc::now())
            .await?;

        match active {
            Some(record) if record.identity_id == claims.sub => Ok(Some(SessionHandle {
                identity_id: claims.sub,
                company_id: claims.company_id,
                expires_at: record.expires_at,
            })),
            _ => Err(GatewayError::SessionExpired),
        }
    }

    async fn require_session(&self) -> GatewayResult<SessionHandle> {
        self.session_for_token()
            .await?
            .ok_or(GatewayError::NoUserLoggedIn)
    }

    /// Session whose company is `company_id`.
    async fn require_company(&self, company_id: &str) -> GatewayResult<SessionHandle> {
        let session = self.require_session().await?;
        if session.company_id != company_id {
            return Err(GatewayError::not_found("Company", company_id));
        }
        Ok(session)
    }

    /// Issues a token for the identity, records it and makes it current.
    async fn start_session(&self, identity: &Identity) -> GatewayResult<()> {
        let issued = self
            .backend
            .tokens
            .issue(&identity.id, &identity.company_id)?;

        self.db()
            .auth_sessions()
            .insert(&AuthSessionRecord {
                jti: issued.claims.jti.clone(),
                identity_id: identity.id.clone(),
                issued_at: issued.claims.issued_at(),
                expires_at: issued.claims.expires_at(),
            })
            .await?;

        *self.token.write().await = Some(issued.token);
        Ok(())
    }

    fn file_url(&self, path: &str) -> String {
        media::file_url(&self.backend.storage.public_base_url, path)
    }

    async fn store_file(
        &self,
        bytes: &[u8],
        destination: &str,
        content_type: Option<&str>,
    ) -> GatewayResult<String> {
        media::validate_storage_path(destination)?;

        if bytes.is_empty() {
            return Err(ValidationError::required("file").into());
        }
        let max = self.backend.storage.max_upload_bytes;
        if bytes.len() > max {
            return Err(ValidationError::OutOfRange {
                field: "file".to_string(),
                min: 1,
                max: i64::try_from(max).unwrap_or(i64::MAX),
            }
            .into());
        }

        let content_type = content_type.unwrap_or_else(|| media::content_type_for(destination));
        self.db().blobs().put(destination, content_type, bytes).await?;

        debug!(path = %destination, size = bytes.len(), "File stored");
        Ok(self.file_url(destination))
    }

    /// Loads a supplier owned by `company_id`.
    async fn owned_supplier(&self, company_id: &str, id: &str) -> GatewayResult<Supplier> {
        let supplier = self
            .db()
            .suppliers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Supplier", id))?;
        ensure_owned("Supplier", id, &supplier.company_id, company_id)?;
        Ok(supplier)
    }

    async fn owned_product(&self, company_id: &str, id: &str) -> GatewayResult<Product> {
        let product = self
            .db()
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product", id))?;
        ensure_owned("Product", id, &product.company_id, company_id)?;
        Ok(product)
    }
}

fn ensure_owned(entity: &str, id: &str, owner: &str, company_id: &str) -> Result<(), CoreError> {
    if owner != company_id {
        return Err(CoreError::CompanyScopeViolation {
            entity: entity.to_string(),
            id: id.to_string(),
            company_id: company_id.to_string(),
        });
    }
    Ok(())
}

/// Any non-auth error becomes a generic auth failure with `message`.
fn auth_failure(message: &str) -> impl Fn(GatewayError) -> GatewayError + '_ {
    move |err| {
        if err.is_auth() {
            err
        } else {
            warn!(error = %err, "{message}");
            GatewayError::AuthFailure(message.to_string())
        }
    }
}

#[async_trait]
impl Gateway for LocalGateway {
    // =========================================================================
    // Auth
    // =========================================================================

    async fn current_session(&self) -> GatewayResult<Option<SessionHandle>> {
        match self.session_for_token().await {
            Err(GatewayError::SessionExpired) => Ok(None),
            other => other,
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> GatewayResult<Identity> {
        let credential = self
            .db()
            .credentials()
            .get_by_email(email)
            .await
            .map_err(|e| auth_failure(SIGN_IN_FAILED)(e.into()))?
            .ok_or(GatewayError::AccountNotFound)?;

        if !verify_password(password, &credential.password_hash) {
            debug!(identity_id = %credential.identity_id, "Sign-in rejected: wrong password");
            return Err(GatewayError::InvalidCredentials);
        }

        let identity = self
            .db()
            .identities()
            .get_by_id(&credential.identity_id)
            .await
            .map_err(|e| auth_failure(SIGN_IN_FAILED)(e.into()))?
            .ok_or_else(|| {
                warn!(identity_id = %credential.identity_id, "Credential has no profile");
                GatewayError::AuthFailure(SIGN_IN_FAILED.to_string())
            })?;

        self.start_session(&identity)
            .await
            .map_err(auth_failure(SIGN_IN_FAILED))?;

        info!(identity_id = %identity.id, "Signed in");
        Ok(identity)
    }

    async fn sign_up(&self, registration: &Registration) -> GatewayResult<Identity> {
        let identity = RegistrationSaga::new(self.db())
            .run(registration)
            .await
            .map_err(|e| {
                if matches!(e, GatewayError::Validation(_)) {
                    e
                } else {
                    auth_failure(SIGN_UP_FAILED)(e)
                }
            })?;

        self.start_session(&identity)
            .await
            .map_err(auth_failure(SIGN_UP_FAILED))?;

        Ok(identity)
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        let Some(token) = self.token.write().await.take() else {
            return Ok(());
        };

        let claims = match self.backend.tokens.decode_ignoring_expiry(&token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Discarding unreadable token on sign-out");
                return Ok(());
            }
        };

        self.db()
            .auth_sessions()
            .revoke(&claims.jti)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to revoke session");
                GatewayError::AuthFailure(SIGN_OUT_FAILED.to_string())
            })?;

        info!(identity_id = %claims.sub, "Signed out");
        Ok(())
    }

    // =========================================================================
    // Profile
    // =========================================================================

    async fn get_profile(&self, identity_id: &str) -> GatewayResult<Option<Identity>> {
        let session = self.require_session().await?;
        let identity = self.db().identities().get_by_id(identity_id).await?;
        Ok(identity.filter(|i| i.company_id == session.company_id))
    }

    async fn update_profile(
        &self,
        identity_id: &str,
        patch: &ProfilePatch,
    ) -> GatewayResult<Identity> {
        let session = self.require_session().await?;
        if session.identity_id != identity_id {
            return Err(GatewayError::not_found("Identity", identity_id));
        }
        validate_profile_patch(patch)?;

        let mut patch = patch.clone();
        if let Some(avatar) = patch.avatar.as_deref().filter(|a| media::is_data_url(a)) {
            let data = DataUrl::parse(avatar)?;
            let url = self
                .store_file(
                    &data.bytes,
                    &media::avatar_path(identity_id),
                    Some(&data.content_type),
                )
                .await?;
            patch.avatar = Some(url);
        }

        let mut identity = self
            .db()
            .identities()
            .get_by_id(identity_id)
            .await?
            .ok_or_else(|| GatewayError::not_found("Identity", identity_id))?;

        patch.apply_to(&mut identity, Utc::now());
        self.db().identities().update(&identity).await?;

        let stored = self
            .db()
            .identities()
            .get_by_id(identity_id)
            .await?
            .ok_or_else(|| GatewayError::not_found("Identity", identity_id))?;

        info!(identity_id = %identity_id, "Profile updated");
        Ok(stored)
    }

    async fn get_company(&self, company_id: &str) -> GatewayResult<Option<Company>> {
        let session = self.require_session().await?;
        if session.company_id != company_id {
            return Ok(None);
        }
        Ok(self.db().companies().get_by_id(company_id).await?)
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    async fn list_suppliers(&self, company_id: &str) -> GatewayResult<Vec<Supplier>> {
        self.require_company(company_id).await?;
        Ok(self.db().suppliers().list_by_company(company_id).await?)
    }

    async fn list_suppliers_by_country(
        &self,
        company_id: &str,
        country: &str,
    ) -> GatewayResult<Vec<Supplier>> {
        self.require_company(company_id).await?;
        Ok(self
            .db()
            .suppliers()
            .list_by_country(company_id, country.trim())
            .await?)
    }

    async fn create_supplier(
        &self,
        company_id: &str,
        supplier: &NewSupplier,
    ) -> GatewayResult<Supplier> {
        self.require_company(company_id).await?;
        validate_new_supplier(supplier)?;

        let now = Utc::now();
        let record = Supplier {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            company_name: supplier.company_name.trim().to_string(),
            contact_name: supplier.contact_name.trim().to_string(),
            email: supplier.email.trim().to_string(),
            phone: supplier.phone.trim().to_string(),
            country: supplier.country.trim().to_string(),
            extras: supplier.extras.clone(),
            created_at: now,
            updated_at: now,
        };

        self.db().suppliers().insert(&record).await?;
        info!(id = %record.id, company_id = %company_id, "Supplier created");
        Ok(record)
    }

    async fn update_supplier(
        &self,
        company_id: &str,
        id: &str,
        patch: &SupplierPatch,
    ) -> GatewayResult<Supplier> {
        self.require_company(company_id).await?;
        validate_supplier_patch(patch)?;

        let mut supplier = self.owned_supplier(company_id, id).await?;
        patch.apply_to(&mut supplier, Utc::now());
        self.db().suppliers().update(&supplier).await?;

        debug!(id = %id, "Supplier updated");
        Ok(supplier)
    }

    async fn delete_supplier(&self, company_id: &str, id: &str) -> GatewayResult<()> {
        self.require_company(company_id).await?;
        self.owned_supplier(company_id, id).await?;

        if !self.db().suppliers().delete(id).await? {
            return Err(GatewayError::not_found("Supplier", id));
        }
        info!(id = %id, company_id = %company_id, "Supplier deleted");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    async fn list_products(&self, company_id: &str) -> GatewayResult<Vec<Product>> {
        self.require_company(company_id).await?;
        Ok(self.db().products().list_by_company(company_id).await?)
    }

    async fn list_products_by_supplier(
        &self,
        company_id: &str,
        supplier_id: &str,
    ) -> GatewayResult<Vec<Product>> {
        self.require_company(company_id).await?;
        Ok(self
            .db()
            .products()
            .list_by_supplier(company_id, supplier_id)
            .await?)
    }

    async fn create_product(
        &self,
        company_id: &str,
        product: &NewProduct,
    ) -> GatewayResult<Product> {
        self.require_company(company_id).await?;
        validate_new_product(product)?;
        self.owned_supplier(company_id, &product.supplier_id).await?;

        let now = Utc::now();
        let record = Product {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            name: product.name.trim().to_string(),
            description: product.description.trim().to_string(),
            price_cents: product.price_cents,
            stock: product.stock,
            supplier_id: product.supplier_id.clone(),
            is_winner: product.is_winner,
            created_at: now,
            updated_at: now,
        };

        self.db().products().insert(&record).await?;
        info!(id = %record.id, company_id = %company_id, "Product created");
        Ok(record)
    }

    async fn update_product(
        &self,
        company_id: &str,
        id: &str,
        patch: &ProductPatch,
    ) -> GatewayResult<Product> {
        self.require_company(company_id).await?;
        validate_product_patch(patch)?;

        let mut product = self.owned_product(company_id, id).await?;
        if let Some(supplier_id) = &patch.supplier_id {
            self.owned_supplier(company_id, supplier_id.trim()).await?;
        }

        patch.apply_to(&mut product, Utc::now());
        self.db().products().update(&product).await?;

        debug!(id = %id, "Product updated");
        Ok(product)
    }

    async fn delete_product(&self, company_id: &str, id: &str) -> GatewayResult<()> {
        self.require_company(company_id).await?;
        self.owned_product(company_id, id).await?;

        if !self.db().products().delete(id).await? {
            return Err(GatewayError::not_found("Product", id));
        }
        info!(id = %id, company_id = %company_id, "Product deleted");
        Ok(())
    }

    // =========================================================================
    // Files
    // =========================================================================

    async fn upload_file(
        &self,
        bytes: &[u8],
        destination: &str,
        content_type: Option<&str>,
    ) -> GatewayResult<String> {
        self.require_session().await?;
        self.store_file(bytes, destination, content_type).await
    }

    async fn fetch_file(&self, path: &str) -> GatewayResult<Option<StoredFile>> {
        media::validate_storage_path(path)?;
        Ok(self.db().blobs().get(path).await?.map(|blob| StoredFile {
            content_type: blob.content_type,
            bytes: blob.bytes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoptools_db::DbConfig;

    async fn backend() -> LocalBackend {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        LocalBackend::new(
            db,
            TokenIssuer::new("test-secret-0123456789", 3600),
            StorageSettings::default(),
        )
    }

    fn registration(email: &str, company: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: "secret123".to_string(),
            name: "Ana".to_string(),
            phone: "+1 555 0100".to_string(),
            company_name: company.to_string(),
        }
    }

    fn new_supplier(name: &str, country: &str) -> NewSupplier {
        NewSupplier {
            company_name: name.to_string(),
            contact_name: "Li Wei".to_string(),
            email: "sales@supplier.example.com".to_string(),
            phone: "+86 20 1234 5678".to_string(),
            country: country.to_string(),
            extras: Default::default(),
        }
    }

    fn new_product(supplier_id: &str, stock: i64) -> NewProduct {
        NewProduct {
            name: "Desk Lamp".to_string(),
            description: String::new(),
            price_cents: 2499,
            stock,
            supplier_id: supplier_id.to_string(),
            is_winner: false,
        }
    }

    #[tokio::test]
    async fn test_sign_up_sign_in_and_resume() {
        let backend = backend().await;
        let client = backend.client();
        assert_eq!(client.current_session().await.unwrap(), None);

        let identity = client
            .sign_up(&registration("ana@example.com", "Acme"))
            .await
            .unwrap();
        let session = client.current_session().await.unwrap().unwrap();
        assert_eq!(session.identity_id, identity.id);
        assert_eq!(session.company_id, identity.company_id);

        let token = client.token().await.unwrap();
        let resumed = backend.resume(token);
        assert_eq!(resumed.current_session().await.unwrap(), Some(session));

        let other = backend.client();
        let signed_in = other.sign_in("ANA@example.com", "secret123").await.unwrap();
        assert_eq!(signed_in, identity);
    }

    #[tokio::test]
    async fn test_sign_in_failures() {
        let backend = backend().await;
        backend
            .client()
            .sign_up(&registration("ana@example.com", "Acme"))
            .await
            .unwrap();

        let client = backend.client();
        assert!(matches!(
            client.sign_in("nobody@example.com", "secret123").await,
            Err(GatewayError::AccountNotFound)
        ));
        assert!(matches!(
            client.sign_in("ana@example.com", "wrong-pass").await,
            Err(GatewayError::InvalidCredentials)
        ));
        assert_eq!(client.token().await, None);
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let backend = backend().await;
        let client = backend.client();
        client
            .sign_up(&registration("ana@example.com", "Acme"))
            .await
            .unwrap();
        let token = client.token().await.unwrap();

        client.sign_out().await.unwrap();
        assert_eq!(client.token().await, None);
        assert_eq!(backend.resume(token).current_session().await.unwrap(), None);

        // Nothing to revoke the second time.
        client.sign_out().await.unwrap();
    }

    #[tokio::test]
    async fn test_operations_require_session() {
        let backend = backend().await;
        let client = backend.client();
        assert!(matches!(
            client.list_suppliers("company_x").await,
            Err(GatewayError::NoUserLoggedIn)
        ));

        let forged = backend.resume("not-a-token");
        assert!(matches!(
            forged.list_suppliers("company_x").await,
            Err(GatewayError::SessionExpired)
        ));
        assert_eq!(forged.current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_supplier_scoping() {
        let backend = backend().await;
        let a = backend.client();
        let ana = a.sign_up(&registration("ana@example.com", "Acme")).await.unwrap();
        let b = backend.client();
        let bo = b.sign_up(&registration("bo@example.com", "Bolt")).await.unwrap();

        let first = a
            .create_supplier(&ana.company_id, &new_supplier("Shenzhen Lights", "China"))
            .await
            .unwrap();
        a.create_supplier(&ana.company_id, &new_supplier("Osaka Paper", "Japan"))
            .await
            .unwrap();
        b.create_supplier(&bo.company_id, &new_supplier("Lyon Glass", "France"))
            .await
            .unwrap();

        let names: Vec<String> = a
            .list_suppliers(&ana.company_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.company_name)
            .collect();
        assert_eq!(names, vec!["Osaka Paper", "Shenzhen Lights"]);

        let in_china = a
            .list_suppliers_by_country(&ana.company_id, "China")
            .await
            .unwrap();
        assert_eq!(in_china.len(), 1);

        // Other company's listing and records are invisible.
        assert!(matches!(
            b.list_suppliers(&ana.company_id).await,
            Err(GatewayError::NotFound { .. })
        ));
        let patch = SupplierPatch {
            notes: Some("hijack".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            b.update_supplier(&bo.company_id, &first.id, &patch).await,
            Err(GatewayError::NotFound { .. })
        ));
        assert!(matches!(
            b.delete_supplier(&bo.company_id, &first.id).await,
            Err(GatewayError::NotFound { .. })
        ));

        let updated = a
            .update_supplier(&ana.company_id, &first.id, &patch)
            .await
            .unwrap();
        assert_eq!(updated.extras.notes.as_deref(), Some("hijack"));

        a.delete_supplier(&ana.company_id, &first.id).await.unwrap();
        assert_eq!(a.list_suppliers(&ana.company_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_products_need_own_supplier() {
        let backend = backend().await;
        let a = backend.client();
        let ana = a.sign_up(&registration("ana@example.com", "Acme")).await.unwrap();
        let b = backend.client();
        let bo = b.sign_up(&registration("bo@example.com", "Bolt")).await.unwrap();

        let supplier = a
            .create_supplier(&ana.company_id, &new_supplier("Shenzhen Lights", "China"))
            .await
            .unwrap();

        assert!(matches!(
            b.create_product(&bo.company_id, &new_product(&supplier.id, 3)).await,
            Err(GatewayError::NotFound { .. })
        ));

        let product = a
            .create_product(&ana.company_id, &new_product(&supplier.id, 3))
            .await
            .unwrap();
        let updated = a
            .update_product(
                &ana.company_id,
                &product.id,
                &ProductPatch {
                    is_winner: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_winner);

        let listed = a
            .list_products_by_supplier(&ana.company_id, &supplier.id)
            .await
            .unwrap();
        assert_eq!(listed, vec![updated]);

        a.delete_product(&ana.company_id, &product.id).await.unwrap();
        assert!(matches!(
            a.delete_product(&ana.company_id, &product.id).await,
            Err(GatewayError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_profile_uploads_data_url_avatar() {
        let backend = backend().await;
        let client = backend.client();
        let ana = client
            .sign_up(&registration("ana@example.com", "Acme"))
            .await
            .unwrap();

        let patch = ProfilePatch {
            name: Some("Ana Lima".to_string()),
            avatar: Some("data:image/png;base64,AQID".to_string()),
            ..Default::default()
        };
        let updated = client.update_profile(&ana.id, &patch).await.unwrap();

        let expected_path = media::avatar_path(&ana.id);
        assert_eq!(updated.name, "Ana Lima");
        assert_eq!(updated.email, ana.email);
        assert_eq!(updated.avatar, Some(format!("/files/{expected_path}")));

        let file = client.fetch_file(&expected_path).await.unwrap().unwrap();
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.bytes, vec![1, 2, 3]);

        // Someone else's profile is not editable.
        assert!(matches!(
            client.update_profile("someone-else", &patch).await,
            Err(GatewayError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_limits() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let backend = LocalBackend::new(
            db,
            TokenIssuer::new("test-secret-0123456789", 3600),
            StorageSettings {
                public_base_url: "https://cdn.example.com".to_string(),
                max_upload_bytes: 4,
            },
        );
        let client = backend.client();
        client
            .sign_up(&registration("ana@example.com", "Acme"))
            .await
            .unwrap();

        let url = media::upload_product_image(&client, "lamp.png", &[1, 2])
            .await
            .unwrap();
        assert!(url.starts_with("https://cdn.example.com/files/product-images/"));
        assert!(url.ends_with("-lamp.png"));

        assert!(matches!(
            client.upload_file(&[0; 5], "product-images/big.png", None).await,
            Err(GatewayError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(matches!(
            client.upload_file(&[], "product-images/empty.png", None).await,
            Err(GatewayError::Validation(_))
        ));

        let catalog = media::upload_supplier_catalog(&client, "spring.pdf", &[7])
            .await
            .unwrap();
        assert_eq!(catalog.name, "spring.pdf");
    }
}
