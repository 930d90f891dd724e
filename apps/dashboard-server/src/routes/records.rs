//! Supplier and product CRUD plus their uploads.

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use shoptools_core::{
    Attachment, NewProduct, NewSupplier, Product, ProductPatch, Supplier, SupplierPatch,
};
use shoptools_gateway::{media, Gateway};

use crate::error::ApiResult;
use crate::extract::Authenticated;

#[derive(Debug, Deserialize)]
pub struct SupplierFilter {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct UploadedUrl {
    pub url: String,
}

// =============================================================================
// Suppliers
// =============================================================================

pub async fn list_suppliers(
    auth: Authenticated,
    Query(filter): Query<SupplierFilter>,
) -> ApiResult<Json<Vec<Supplier>>> {
    let suppliers = match filter.country.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(country) => {
            auth.gateway()
                .list_suppliers_by_country(auth.company_id(), country)
                .await?
        }
        None => auth.gateway().list_suppliers(auth.company_id()).await?,
    };
    Ok(Json(suppliers))
}

pub async fn create_supplier(
    auth: Authenticated,
    Json(supplier): Json<NewSupplier>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let created = auth
        .gateway()
        .create_supplier(auth.company_id(), &supplier)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_supplier(
    auth: Authenticated,
    Path(id): Path<String>,
    Json(patch): Json<SupplierPatch>,
) -> ApiResult<Json<Supplier>> {
    Ok(Json(
        auth.gateway()
            .update_supplier(auth.company_id(), &id, &patch)
            .await?,
    ))
}

pub async fn delete_supplier(auth: Authenticated, Path(id): Path<String>) -> ApiResult<StatusCode> {
    auth.gateway().delete_supplier(auth.company_id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload_supplier_logo(
    auth: Authenticated,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> ApiResult<Json<UploadedUrl>> {
    let url = media::upload_supplier_logo(auth.gateway(), &params.filename, &body).await?;
    Ok(Json(UploadedUrl { url }))
}

pub async fn upload_supplier_catalog(
    auth: Authenticated,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> ApiResult<Json<Attachment>> {
    Ok(Json(
        media::upload_supplier_catalog(auth.gateway(), &params.filename, &body).await?,
    ))
}

// =============================================================================
// Products
// =============================================================================

pub async fn list_products(
    auth: Authenticated,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = match filter.supplier_id.as_deref() {
        Some(supplier_id) => {
            auth.gateway()
                .list_products_by_supplier(auth.company_id(), supplier_id)
                .await?
        }
        None => auth.gateway().list_products(auth.company_id()).await?,
    };
    Ok(Json(products))
}

pub async fn create_product(
    auth: Authenticated,
    Json(product): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let created = auth
        .gateway()
        .create_product(auth.company_id(), &product)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product(
    auth: Authenticated,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> ApiResult<Json<Product>> {
    Ok(Json(
        auth.gateway()
            .update_product(auth.company_id(), &id, &patch)
            .await?,
    ))
}

pub async fn delete_product(auth: Authenticated, Path(id): Path<String>) -> ApiResult<StatusCode> {
    auth.gateway().delete_product(auth.company_id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload_product_image(
    auth: Authenticated,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> ApiResult<Json<UploadedUrl>> {
    let url = media::upload_product_image(auth.gateway(), &params.filename, &body).await?;
    Ok(Json(UploadedUrl { url }))
}
