//! # Backend Gateway Contract
//!
//! Everything the dashboard asks of its backend goes through [`Gateway`].
//! The session store and the HTTP layer only see this trait, so a hosted
//! identity provider or a test double can stand in for [`LocalGateway`].
//!
//! ```text
//! ┌────────────────────┬───────────────────────────────────────────────┐
//! │ Auth               │ current_session, sign_in, sign_up, sign_out   │
//! │ Profile            │ get_profile, update_profile, get_company      │
//! │ Suppliers          │ list (all / by country), create, update,      │
//! │                    │ delete                                        │
//! │ Products           │ list (all / by supplier), create, update,      │
//! │                    │ delete                                        │
//! │ Files              │ upload_file, fetch_file                       │
//! └────────────────────┴───────────────────────────────────────────────┘
//! ```
//!
//! Record operations take the caller's `company_id` explicitly. Records of
//! another company behave as if they did not exist.
//!
//! [`LocalGateway`]: crate::LocalGateway

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shoptools_core::{
    Company, Identity, NewProduct, NewSupplier, Product, ProductPatch, ProfilePatch, Supplier,
    SupplierPatch,
};

use crate::error::GatewayResult;

/// The signed-in identity as the backend sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub identity_id: String,
    pub company_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Input of the sign-up form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub company_name: String,
}

/// A stored file as served back to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait Gateway: Send + Sync {
    // =========================================================================
    // Auth
    // =========================================================================

    /// The session this client already holds, if it is still valid.
    async fn current_session(&self) -> GatewayResult<Option<SessionHandle>>;

    /// Signs in and returns the identity's profile.
    async fn sign_in(&self, email: &str, password: &str) -> GatewayResult<Identity>;

    /// Creates credential, company and profile, then signs in as the new
    /// identity. Nothing is left behind on failure.
    async fn sign_up(&self, registration: &Registration) -> GatewayResult<Identity>;

    /// Ends the session. The client holds no session afterwards, even when
    /// an error is returned.
    async fn sign_out(&self) -> GatewayResult<()>;

    // =========================================================================
    // Profile
    // =========================================================================

    async fn get_profile(&self, identity_id: &str) -> GatewayResult<Option<Identity>>;

    /// Applies a patch to the signed-in identity and returns the stored result.
    async fn update_profile(
        &self,
        identity_id: &str,
        patch: &ProfilePatch,
    ) -> GatewayResult<Identity>;

    async fn get_company(&self, company_id: &str) -> GatewayResult<Option<Company>>;

    // =========================================================================
    // Suppliers
    // =========================================================================

    /// Newest first.
    async fn list_suppliers(&self, company_id: &str) -> GatewayResult<Vec<Supplier>>;

    async fn list_suppliers_by_country(
        &self,
        company_id: &str,
        country: &str,
    ) -> GatewayResult<Vec<Supplier>>;

    async fn create_supplier(
        &self,
        company_id: &str,
        supplier: &NewSupplier,
    ) -> GatewayResult<Supplier>;

    async fn update_supplier(
        &self,
        company_id: &str,
        id: &str,
        patch: &SupplierPatch,
    ) -> GatewayResult<Supplier>;

    async fn delete_supplier(&self, company_id: &str, id: &str) -> GatewayResult<()>;

    // =========================================================================
    // Products
    // =========================================================================

    /// Newest first.
    async fn list_products(&self, company_id: &str) -> GatewayResult<Vec<Product>>;

    async fn list_products_by_supplier(
        &self,
        company_id: &str,
        supplier_id: &str,
    ) -> GatewayResult<Vec<Product>>;

    async fn create_product(
        &self,
        company_id: &str,
        product: &NewProduct,
    ) -> GatewayResult<Product>;

    async fn update_product(
        &self,
        company_id: &str,
        id: &str,
        patch: &ProductPatch,
    ) -> GatewayResult<Product>;

    async fn delete_product(&self, company_id: &str, id: &str) -> GatewayResult<()>;

    // =========================================================================
    // Files
    // =========================================================================

    /// Stores bytes at `destination` and returns a retrievable URL.
    async fn upload_file(
        &self,
        bytes: &[u8],
        destination: &str,
        content_type: Option<&str>,
    ) -> GatewayResult<String>;

    async fn fetch_file(&self, path: &str) -> GatewayResult<Option<StoredFile>>;
}
