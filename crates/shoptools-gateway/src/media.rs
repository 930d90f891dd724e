//! # File Uploads
//!
//! Storage paths, inline `data:` URLs and the upload helpers used by the
//! supplier and product forms.
//!
//! ## Storage Layout
//! ```text
//! avatars/<identity id>                   one per identity, replaced on change
//! supplier-logos/<millis>-<file name>
//! supplier-catalogs/<millis>-<file name>
//! product-images/<millis>-<file name>
//! ```
//!
//! Files are served back from `<public base url>/files/<path>`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};

use shoptools_core::validation::validate_upload_filename;
use shoptools_core::{Attachment, ValidationError};

use crate::error::GatewayResult;
use crate::gateway::Gateway;

pub const AVATAR_FOLDER: &str = "avatars";
pub const SUPPLIER_LOGO_FOLDER: &str = "supplier-logos";
pub const SUPPLIER_CATALOG_FOLDER: &str = "supplier-catalogs";
pub const PRODUCT_IMAGE_FOLDER: &str = "product-images";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// Data URLs
// =============================================================================

/// A decoded `data:<type>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Parses a base64 data URL. Only the base64 form is accepted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "avatar".to_string(),
            reason: reason.to_string(),
        };

        let rest = input
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| invalid("not a data URL"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| invalid("missing data"))?;
        let media_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| invalid("only base64 data URLs are supported"))?;

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| invalid("invalid base64 payload"))?;
        if bytes.is_empty() {
            return Err(ValidationError::required("avatar"));
        }

        let content_type = if media_type.is_empty() {
            DEFAULT_CONTENT_TYPE.to_string()
        } else {
            media_type.to_string()
        };

        Ok(DataUrl {
            content_type,
            bytes,
        })
    }
}

pub fn is_data_url(value: &str) -> bool {
    value.trim_start().starts_with("data:")
}

// =============================================================================
// Paths and URLs
// =============================================================================

/// `<folder>/<millis>-<filename>`.
pub fn timestamped_path(
    folder: &str,
    filename: &str,
    now: DateTime<Utc>,
) -> Result<String, ValidationError> {
    validate_upload_filename(filename)?;
    Ok(format!(
        "{folder}/{}-{}",
        now.timestamp_millis(),
        filename.trim()
    ))
}

pub fn avatar_path(identity_id: &str) -> String {
    format!("{AVATAR_FOLDER}/{identity_id}")
}

/// Guesses a content type from the file extension.
pub fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Public URL of a stored path.
pub fn file_url(base_url: &str, path: &str) -> String {
    format!("{}/files/{}", base_url.trim_end_matches('/'), path)
}

/// Rejects storage paths that are empty, absolute or climb out of the root.
pub fn validate_storage_path(path: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidFormat {
        field: "destination".to_string(),
        reason: "not a valid storage path".to_string(),
    };

    if path.trim().is_empty() {
        return Err(ValidationError::required("destination"));
    }
    if path.starts_with('/') || path.contains('\\') {
        return Err(invalid());
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid());
    }
    Ok(())
}

// =============================================================================
// Upload Helpers
// =============================================================================

/// Uploads a supplier logo and returns its URL.
pub async fn upload_supplier_logo<G: Gateway + ?Sized>(
    gateway: &G,
    filename: &str,
    bytes: &[u8],
) -> GatewayResult<String> {
    let path = timestamped_path(SUPPLIER_LOGO_FOLDER, filename, Utc::now())?;
    gateway
        .upload_file(bytes, &path, Some(content_type_for(filename)))
        .await
}

/// Uploads a supplier catalog and returns it as a named attachment.
pub async fn upload_supplier_catalog<G: Gateway + ?Sized>(
    gateway: &G,
    filename: &str,
    bytes: &[u8],
) -> GatewayResult<Attachment> {
    let path = timestamped_path(SUPPLIER_CATALOG_FOLDER, filename, Utc::now())?;
    let url = gateway
        .upload_file(bytes, &path, Some(content_type_for(filename)))
        .await?;
    Ok(Attachment {
        name: filename.trim().to_string(),
        url,
    })
}

/// Uploads a product image and returns its URL.
pub async fn upload_product_image<G: Gateway + ?Sized>(
    gateway: &G,
    filename: &str,
    bytes: &[u8],
) -> GatewayResult<String> {
    let path = timestamped_path(PRODUCT_IMAGE_FOLDER, filename, Utc::now())?;
    gateway
        .upload_file(bytes, &path, Some(content_type_for(filename)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_data_url() {
        let parsed = DataUrl::parse("data:image/png;base64,AQID").unwrap();
        assert_eq!(parsed.content_type, "image/png");
        assert_eq!(parsed.bytes, vec![1, 2, 3]);

        let untyped = DataUrl::parse("data:;base64,AQID").unwrap();
        assert_eq!(untyped.content_type, DEFAULT_CONTENT_TYPE);

        assert!(DataUrl::parse("https://example.com/a.png").is_err());
        assert!(DataUrl::parse("data:text/plain,hello").is_err());
        assert!(DataUrl::parse("data:image/png;base64,!!!").is_err());
        assert!(DataUrl::parse("data:image/png;base64,").is_err());
        assert!(is_data_url("data:image/png;base64,AQID"));
        assert!(!is_data_url("/files/avatars/u-1"));
    }

    #[test]
    fn test_timestamped_path() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            timestamped_path(SUPPLIER_LOGO_FOLDER, "acme.png", now).unwrap(),
            "supplier-logos/1700000000123-acme.png"
        );
        assert!(timestamped_path(SUPPLIER_LOGO_FOLDER, "../etc/passwd", now).is_err());
        assert!(timestamped_path(SUPPLIER_LOGO_FOLDER, "  ", now).is_err());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("logo.PNG"), "image/png");
        assert_eq!(content_type_for("catalog.pdf"), "application/pdf");
        assert_eq!(content_type_for("README"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_urls_and_paths() {
        assert_eq!(file_url("", "avatars/u-1"), "/files/avatars/u-1");
        assert_eq!(
            file_url("https://cdn.example.com/", "avatars/u-1"),
            "https://cdn.example.com/files/avatars/u-1"
        );
        assert_eq!(avatar_path("u-1"), "avatars/u-1");

        assert!(validate_storage_path("supplier-logos/1-a.png").is_ok());
        assert!(validate_storage_path("/etc/passwd").is_err());
        assert!(validate_storage_path("a/../b").is_err());
        assert!(validate_storage_path("a//b").is_err());
        assert!(validate_storage_path("").is_err());
    }
}
