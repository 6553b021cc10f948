//! Model response parsing

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::entity::{CategorizedItem, FALLBACK_CATEGORY};
use super::error::CategorizationError;

/// Opening or closing markdown fence, with an optional `json` tag
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```(?:json)?[ \t]*\r?\n?").unwrap());

#[derive(Debug, Deserialize)]
struct ModelPayload {
    #[serde(rename = "categorizedProducts")]
    categorized_products: Vec<ModelItem>,
}

#[derive(Debug, Deserialize)]
struct ModelItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Remove markdown code fences and surrounding whitespace
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Parse raw model output into categorized items
///
/// Entries without a name are dropped; a blank category becomes
/// [`FALLBACK_CATEGORY`]. A missing `categorizedProducts` array is malformed.
pub fn parse_categorization_response(text: &str) -> Result<Vec<CategorizedItem>, CategorizationError> {
    let cleaned = strip_code_fences(text);

    let payload: ModelPayload = serde_json::from_str(&cleaned)
        .map_err(|e| CategorizationError::MalformedResponse(e.to_string()))?;

    let items = payload
        .categorized_products
        .into_iter()
        .filter_map(|item| {
            let name = item.name.map(|n| n.trim().to_string()).unwrap_or_default();
            if name.is_empty() {
                return None;
            }

            let category = item
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

            Some(CategorizedItem { name, category })
        })
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences() {
        let text = "```json\n{\"a\":1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\":1}");

        let text = "```\n{\"a\":1}\n```\n";
        assert_eq!(strip_code_fences(text), "{\"a\":1}");

        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_fenced_response() {
        let text = "```json\n{\"categorizedProducts\":[{\"name\":\"Leche\",\"category\":\"Lácteos y Huevos\"}]}\n```";
        let items = parse_categorization_response(text).unwrap();
        assert_eq!(items, vec![CategorizedItem::new("Leche", "Lácteos y Huevos")]);
    }

    #[test]
    fn test_parse_plain_response() {
        let text = r#"{"categorizedProducts":[
            {"name":"Coca Cola","category":"Bebidas"},
            {"name":"Yerba","category":"Despensa"}
        ]}"#;
        let items = parse_categorization_response(text).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].category, "Despensa");
    }

    #[test]
    fn test_sanitizes_entries() {
        let text = r#"{"categorizedProducts":[
            {"name":"  Pan ","category":" Panadería "},
            {"name":"","category":"Bebidas"},
            {"category":"Bebidas"},
            {"name":"Detergente","category":""},
            {"name":"Sal","category":null}
        ]}"#;
        let items = parse_categorization_response(text).unwrap();
        assert_eq!(
            items,
            vec![
                CategorizedItem::new("Pan", "Panadería"),
                CategorizedItem::new("Detergente", "Otros"),
                CategorizedItem::new("Sal", "Otros"),
            ]
        );
    }

    #[test]
    fn test_missing_array_is_malformed() {
        let result = parse_categorization_response(r#"{"products":[]}"#);
        assert!(matches!(result, Err(CategorizationError::MalformedResponse(_))));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let result = parse_categorization_response("Claro, aquí tienes las categorías");
        assert!(matches!(result, Err(CategorizationError::MalformedResponse(_))));
    }

    #[test]
    fn test_empty_array() {
        let items = parse_categorization_response(r#"{"categorizedProducts":[]}"#).unwrap();
        assert!(items.is_empty());
    }
}
