//! Health and status endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use super::types::Json;

/// Characters of the key shown at each end of the preview
const KEY_PREVIEW_CHARS: usize = 8;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub has_api_key: bool,
    pub api_key_length: usize,
    pub api_key_preview: Option<String>,
}

/// `abcdefgh...stuvwxyz`; short keys overlap rather than being padded
pub fn api_key_preview(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(KEY_PREVIEW_CHARS).collect();
    let tail: String = chars[chars.len().saturating_sub(KEY_PREVIEW_CHARS)..]
        .iter()
        .collect();
    format!("{}...{}", head, tail)
}

/// `GET /api/health`
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let key = state.api_key();

    let response = HealthResponse {
        status: "ok",
        timestamp: state
            .clock
            .now()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION"),
        has_api_key: key.is_some(),
        api_key_length: key.map(|k| k.chars().count()).unwrap_or(0),
        api_key_preview: key.map(api_key_preview),
    };

    (StatusCode::OK, Json(response))
}

/// `GET /api/status` - quota, cache and limit snapshot
pub async fn status_check(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.categorization.system_status().await))
}

/// Liveness check - always returns 200 if the process is running
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
