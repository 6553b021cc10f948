use serde::Serialize;

/// Snapshot of categorization readiness and remaining allowance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub api_key_configured: bool,
    pub daily_limit: DailyLimitSummary,
    pub cache: CacheSummary,
    pub limits: LimitsSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyLimitSummary {
    pub used: u32,
    pub remaining: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSummary {
    pub entries: usize,
    pub max_recommended: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsSummary {
    pub max_products_per_request: usize,
    pub max_tokens_per_request: usize,
    pub request_timeout_seconds: u64,
}
