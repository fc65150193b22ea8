//! Variant routes
//!
//! `/variant_public` is open to everyone. `/variant` answers the bare count and
//! sits behind the shared API key.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::queries::{
    count_variants::handle as handle_count_variants,
    variant_summary::handle as handle_variant_summary, CountVariantsResponse, LocusQuery,
    VariantSummaryResponse,
};
use crate::db::VariantStore;
use crate::error::AppResult;
use crate::middleware::ApiKeyLayer;

/// Routes that need no credential
pub fn public_routes() -> Router<VariantStore> {
    Router::new().route("/variant_public", get(variant_summary))
}

/// Routes guarded by the `X-API-Key` header
pub fn protected_routes(api_key: &str) -> Router<VariantStore> {
    Router::new()
        .route("/variant", get(count_variants))
        .route_layer(ApiKeyLayer::new(api_key))
}

/// Count variants at a locus
///
/// GET /variant?chr=chr1&pos=100
async fn count_variants(
    State(store): State<VariantStore>,
    Query(query): Query<LocusQuery>,
) -> AppResult<Json<CountVariantsResponse>> {
    let response = handle_count_variants(&store, query).await?;
    Ok(Json(response))
}

/// Count variants at a locus with a genotype breakdown
///
/// GET /variant_public?chr=chr1&pos=100
async fn variant_summary(
    State(store): State<VariantStore>,
    Query(query): Query<LocusQuery>,
) -> AppResult<Json<VariantSummaryResponse>> {
    let response = handle_variant_summary(&store, query).await?;
    Ok(Json(response))
}
