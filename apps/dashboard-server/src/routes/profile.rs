//! Profile page and dashboard figures.

use axum::Json;
use serde::Serialize;

use shoptools_core::dashboard::DashboardStats;
use shoptools_core::{Identity, ProfilePatch};
use shoptools_gateway::Gateway;

use crate::error::ApiResult;
use crate::extract::Authenticated;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: Identity,
    pub company_name: Option<String>,
}

pub async fn get_profile(auth: Authenticated) -> ApiResult<Json<ProfileResponse>> {
    let company = auth.gateway().get_company(auth.company_id()).await?;
    Ok(Json(ProfileResponse {
        company_name: company.map(|c| c.name),
        user: auth.user,
    }))
}

pub async fn update_profile(
    auth: Authenticated,
    Json(patch): Json<ProfilePatch>,
) -> ApiResult<Json<Identity>> {
    Ok(Json(auth.store.update_profile(&patch).await?))
}

pub async fn dashboard(auth: Authenticated) -> ApiResult<Json<DashboardStats>> {
    let suppliers = auth.gateway().list_suppliers(auth.company_id()).await?;
    let products = auth.gateway().list_products(auth.company_id()).await?;
    Ok(Json(DashboardStats::compute(&suppliers, &products)))
}
