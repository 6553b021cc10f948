//! Categorization request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::CategorizedItem;

/// `POST /api/categorize` body
///
/// Entries may carry more fields than `name`; only the name is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CategorizeRequest {
    #[serde(default)]
    pub products: Option<Vec<RequestedProduct>>,
}

/// One `products` entry, accepted whatever its JSON shape
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RequestedProduct(Value);

impl RequestedProduct {
    /// The `name` as sent, or an empty string when the entry is not an
    /// object or its name is missing or not a string, so that name
    /// validation rejects it
    pub fn name_or_empty(&self) -> &str {
        self.0.get("name").and_then(Value::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeResponse {
    pub categorized_products: Vec<CategorizedItem>,
}
