//! # Domain Types
//!
//! Records stored by the backend and exchanged with the dashboard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1:1  ┌─────────────────┐                          │
//! │  │    Company      │◄─────►│    Identity     │  role = master           │
//! │  │  ─────────────  │       │  ─────────────  │  (registering user)      │
//! │  │  id             │       │  id             │                          │
//! │  │  master_id      │       │  company_id     │                          │
//! │  └────────┬────────┘       └─────────────────┘                          │
//! │           │ company_id scopes every record                              │
//! │     ┌─────┴──────────────────────┐                                      │
//! │     ▼                            ▼                                      │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Supplier     │◄──│    Product      │  supplier_id                 │
//! │  │  core + extras  │   │  price_cents    │                              │
//! │  │  (logo,catalogs)│   │  stock, winner  │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Records serialize with camelCase keys (`companyId`, `isWinner`) because
//! the browser dashboard consumes them directly.
//!
//! ## Patch Semantics
//! Every `*Patch` type follows the same rules:
//! - `None` leaves a field unchanged
//! - `Some("")` on an *optional* field clears it
//! - Required fields are never cleared; validation rejects an empty value

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::COMPANY_ID_PREFIX;

// =============================================================================
// Role
// =============================================================================

/// Role of an identity inside its company.
///
/// Only `Master` is ever assigned by the system (at registration). The other
/// roles exist in stored data and are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Master,
    Admin,
    Manager,
    User,
}

impl Role {
    /// Lowercase name, as stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Master => "master",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(Role::Master),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The authenticated user's profile record.
///
/// Shares its `id` with the credential that signs in as it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Company this identity belongs to. Exactly one per identity.
    pub company_id: String,
    pub phone: String,
    /// Retrievable URL of the avatar image.
    pub avatar: Option<String>,
    pub website: Option<String>,
    pub wechat: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update of an [`Identity`] from the profile form.
///
/// `email`, `role` and `company_id` are not editable here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Either a retrievable URL or an inline `data:` URL still to be uploaded.
    pub avatar: Option<String>,
    pub website: Option<String>,
    pub wechat: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
}

impl ProfilePatch {
    /// Patch that only renames the identity.
    pub fn name(name: impl Into<String>) -> Self {
        ProfilePatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &ProfilePatch::default()
    }

    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, identity: &mut Identity, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            identity.name = name.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            identity.phone = phone.trim().to_string();
        }
        patch_optional(&mut identity.avatar, &self.avatar);
        patch_optional(&mut identity.website, &self.website);
        patch_optional(&mut identity.wechat, &self.wechat);
        patch_optional(&mut identity.facebook, &self.facebook);
        patch_optional(&mut identity.instagram, &self.instagram);
        patch_optional(&mut identity.youtube, &self.youtube);
        identity.updated_at = now;
    }
}

// =============================================================================
// Company
// =============================================================================

/// The tenant. Created once, at registration, together with its master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    /// Identity that registered the company.
    pub master_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Derives the company id for the identity that registers it.
///
/// ```rust
/// use shoptools_core::company_id_for;
///
/// assert_eq!(company_id_for("u-42"), "company_u-42");
/// ```
pub fn company_id_for(identity_id: &str) -> String {
    format!("{COMPANY_ID_PREFIX}{identity_id}")
}

// =============================================================================
// Attachment
// =============================================================================

/// A named file reference, e.g. a supplier catalog PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

// =============================================================================
// Supplier
// =============================================================================

/// Optional part of a supplier record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierExtras {
    pub website: Option<String>,
    pub wechat: Option<String>,
    pub notes: Option<String>,
    /// Retrievable URL of the uploaded logo.
    pub logo: Option<String>,
    pub catalogs: Vec<Attachment>,
}

/// A supplier of the company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub company_id: String,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    #[serde(flatten)]
    pub extras: SupplierExtras,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Required core of a supplier plus optional extras, as sent by the
/// "add supplier" form. The company comes from the caller's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    #[serde(flatten, default)]
    pub extras: SupplierExtras,
}

/// Partial update of a [`Supplier`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierPatch {
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub wechat: Option<String>,
    pub notes: Option<String>,
    pub logo: Option<String>,
    /// Replaces the whole catalog list.
    pub catalogs: Option<Vec<Attachment>>,
}

impl SupplierPatch {
    pub fn is_empty(&self) -> bool {
        self == &SupplierPatch::default()
    }

    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, supplier: &mut Supplier, now: DateTime<Utc>) {
        patch_required(&mut supplier.company_name, &self.company_name);
        patch_required(&mut supplier.contact_name, &self.contact_name);
        patch_required(&mut supplier.email, &self.email);
        patch_required(&mut supplier.phone, &self.phone);
        patch_required(&mut supplier.country, &self.country);
        patch_optional(&mut supplier.extras.website, &self.website);
        patch_optional(&mut supplier.extras.wechat, &self.wechat);
        patch_optional(&mut supplier.extras.notes, &self.notes);
        patch_optional(&mut supplier.extras.logo, &self.logo);
        if let Some(catalogs) = &self.catalogs {
            supplier.extras.catalogs = catalogs.clone();
        }
        supplier.updated_at = now;
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product sourced from one of the company's suppliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub description: String,
    /// Price in cents (smallest currency unit).
    pub price_cents: i64,
    /// Units on hand.
    pub stock: i64,
    pub supplier_id: String,
    /// Marked as a "winning product" on the dashboard.
    #[serde(default)]
    pub is_winner: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Value of the units on hand (price × stock).
    #[inline]
    pub fn inventory_value(&self) -> Money {
        self.price().multiply_quantity(self.stock)
    }
}

/// Input of the "add product" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub stock: i64,
    pub supplier_id: String,
    #[serde(default)]
    pub is_winner: bool,
}

/// Partial update of a [`Product`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub supplier_id: Option<String>,
    pub is_winner: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &ProductPatch::default()
    }

    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, product: &mut Product, now: DateTime<Utc>) {
        patch_required(&mut product.name, &self.name);
        if let Some(description) = &self.description {
            product.description = description.trim().to_string();
        }
        if let Some(price_cents) = self.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        patch_required(&mut product.supplier_id, &self.supplier_id);
        if let Some(is_winner) = self.is_winner {
            product.is_winner = is_winner;
        }
        product.updated_at = now;
    }
}

// =============================================================================
// Patch Helpers
// =============================================================================

fn patch_required(field: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *field = value.trim().to_string();
    }
}

// Empty string clears.
fn patch_optional(field: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        let value = value.trim();
        *field = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
