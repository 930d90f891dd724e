//! # Validation Module
//!
//! Input validation for everything that crosses the gateway boundary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser forms                                                │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Gateway (Rust)                                               │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (credential email)                             │
//! │  └── CHECK constraints (price, stock)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shoptools_core::validation::{validate_email, validate_password};
//!
//! assert!(validate_email("ana@acme.test").is_ok());
//! assert!(validate_password("12345").is_err());
//! ```

use url::Url;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::{
    Attachment, NewProduct, NewSupplier, ProductPatch, ProfilePatch, SupplierExtras,
    SupplierPatch,
};
use crate::{MAX_NAME_LENGTH, MAX_NOTES_LENGTH, MIN_PASSWORD_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum price accepted for a product ($10,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Maximum stock level accepted for a product.
pub const MAX_STOCK: i64 = 100_000_000;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_PHONE_LENGTH: usize = 32;
const MAX_HANDLE_LENGTH: usize = 500;
const MAX_FILENAME_LENGTH: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, bounded text field (names, company names, country).
///
/// ## Example
/// ```rust
/// use shoptools_core::validation::validate_required;
///
/// assert!(validate_required("name", "Ana").is_ok());
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`, with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "not a valid email address".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a new password.
///
/// Only length is enforced, mirroring the weak-password rule of the
/// identity provider.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validates a phone number.
///
/// Digits, spaces and `+ - ( ) .` only. Country prefixes come from the
/// dashboard's phone-code picker, so `+` is expected.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    validate_max_len("phone", phone, MAX_PHONE_LENGTH)?;

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');
    if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "only digits, spaces and + - ( ) . are allowed".to_string(),
        });
    }

    Ok(())
}

/// Validates an http(s) URL. An empty value is accepted (it clears the field).
///
/// ## Example
/// ```rust
/// use shoptools_core::validation::validate_website;
///
/// assert!(validate_website("https://acme.test").is_ok());
/// assert!(validate_website("").is_ok());
/// assert!(validate_website("ftp://acme.test").is_err());
/// ```
pub fn validate_website(website: &str) -> ValidationResult<()> {
    let website = website.trim();
    if website.is_empty() {
        return Ok(());
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "website".to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(website).map_err(|e| invalid(&e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid("must start with http:// or https://")),
    }
}

/// Validates a stored-file reference: an absolute URL or a `/files/...` path.
pub fn validate_file_reference(field: &str, reference: &str) -> ValidationResult<()> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with('/') || Url::parse(reference).is_ok() {
        return Ok(());
    }
    Err(ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a URL".to_string(),
    })
}

/// Validates a record ID (UUID v4 string).
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "not a valid id".to_string(),
    })?;
    Ok(())
}

/// Validates the file name of an upload.
///
/// The name becomes part of a storage path, so separators and `..` are
/// rejected.
pub fn validate_upload_filename(filename: &str) -> ValidationResult<()> {
    let filename = filename.trim();

    if filename.is_empty() {
        return Err(ValidationError::required("filename"));
    }

    validate_max_len("filename", filename, MAX_FILENAME_LENGTH)?;

    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ValidationError::InvalidFormat {
            field: "filename".to_string(),
            reason: "must not contain path separators".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price in cents.
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&price_cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates the sign-up form.
pub fn validate_registration(
    email: &str,
    password: &str,
    name: &str,
    phone: &str,
    company_name: &str,
) -> ValidationResult<()> {
    validate_email(email)?;
    validate_password(password)?;
    validate_required("name", name)?;
    validate_phone(phone)?;
    validate_required("companyName", company_name)?;
    Ok(())
}

/// Validates a profile update.
pub fn validate_profile_patch(patch: &ProfilePatch) -> ValidationResult<()> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyUpdate {
            entity: "Profile".to_string(),
        });
    }
    if let Some(name) = &patch.name {
        validate_required("name", name)?;
    }
    if let Some(phone) = &patch.phone {
        validate_phone(phone)?;
    }
    if let Some(website) = &patch.website {
        validate_website(website)?;
    }
    for (field, value) in [
        ("wechat", &patch.wechat),
        ("facebook", &patch.facebook),
        ("instagram", &patch.instagram),
        ("youtube", &patch.youtube),
    ] {
        if let Some(value) = value {
            validate_max_len(field, value, MAX_HANDLE_LENGTH)?;
        }
    }
    Ok(())
}

fn validate_attachment(attachment: &Attachment) -> ValidationResult<()> {
    validate_required("catalog name", &attachment.name)?;
    if attachment.url.trim().is_empty() {
        return Err(ValidationError::required("catalog url"));
    }
    validate_file_reference("catalog url", &attachment.url)
}

fn validate_supplier_extras(extras: &SupplierExtras) -> ValidationResult<()> {
    if let Some(website) = &extras.website {
        validate_website(website)?;
    }
    if let Some(wechat) = &extras.wechat {
        validate_max_len("wechat", wechat, MAX_HANDLE_LENGTH)?;
    }
    if let Some(notes) = &extras.notes {
        validate_max_len("notes", notes, MAX_NOTES_LENGTH)?;
    }
    if let Some(logo) = &extras.logo {
        validate_file_reference("logo", logo)?;
    }
    extras.catalogs.iter().try_for_each(validate_attachment)
}

/// Validates the "add supplier" form.
pub fn validate_new_supplier(supplier: &NewSupplier) -> ValidationResult<()> {
    validate_required("companyName", &supplier.company_name)?;
    validate_required("contactName", &supplier.contact_name)?;
    validate_email(&supplier.email)?;
    validate_phone(&supplier.phone)?;
    validate_required("country", &supplier.country)?;
    validate_supplier_extras(&supplier.extras)
}

/// Validates a supplier update.
pub fn validate_supplier_patch(patch: &SupplierPatch) -> ValidationResult<()> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyUpdate {
            entity: "Supplier".to_string(),
        });
    }
    if let Some(v) = &patch.company_name {
        validate_required("companyName", v)?;
    }
    if let Some(v) = &patch.contact_name {
        validate_required("contactName", v)?;
    }
    if let Some(v) = &patch.email {
        validate_email(v)?;
    }
    if let Some(v) = &patch.phone {
        validate_phone(v)?;
    }
    if let Some(v) = &patch.country {
        validate_required("country", v)?;
    }
    validate_supplier_extras(&SupplierExtras {
        website: patch.website.clone(),
        wechat: patch.wechat.clone(),
        notes: patch.notes.clone(),
        logo: patch.logo.clone(),
        catalogs: patch.catalogs.clone().unwrap_or_default(),
    })
}

/// Validates the "add product" form.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_required("name", &product.name)?;
    validate_max_len("description", &product.description, MAX_NOTES_LENGTH)?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;
    validate_uuid("supplierId", &product.supplier_id)
}

/// Validates a product update.
pub fn validate_product_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyUpdate {
            entity: "Product".to_string(),
        });
    }
    if let Some(v) = &patch.name {
        validate_required("name", v)?;
    }
    if let Some(v) = &patch.description {
        validate_max_len("description", v, MAX_NOTES_LENGTH)?;
    }
    if let Some(v) = patch.price_cents {
        validate_price_cents(v)?;
    }
    if let Some(v) = patch.stock {
        validate_stock(v)?;
    }
    if let Some(v) = &patch.supplier_id {
        validate_uuid("supplierId", v)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
