//! `POST /api/categorize`

use axum::{extract::State, http::HeaderMap};
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, CategorizeRequest, CategorizeResponse, Json};
use crate::infrastructure::quota::IpQuota;

/// Address used when the request carries no forwarding header
pub const FALLBACK_CLIENT_IP: &str = "127.0.0.1";

/// Client address from the first `x-forwarded-for` entry
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(FALLBACK_CLIENT_IP)
        .to_string()
}

pub async fn categorize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CategorizeRequest>,
) -> Result<Json<CategorizeResponse>, ApiError> {
    let products = request.products.ok_or_else(ApiError::invalid_products)?;
    let names: Vec<&str> = products.iter().map(|p| p.name_or_empty()).collect();

    let ip = client_ip(&headers);
    debug!(ip = %ip, products = names.len(), "Categorization requested");

    let gate = IpQuota::new(state.ip_limiter.clone(), ip)
        .with_usage(state.categorization.quota().clone());
    let outcome = state.categorization.try_categorize(&names, &gate).await?;

    Ok(Json(CategorizeResponse {
        categorized_products: outcome.items,
    }))
}
