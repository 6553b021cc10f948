//! Categorization entities

use serde::{Deserialize, Serialize};

use super::error::CategorizationError;

/// Reserved label for products without a category
pub const FALLBACK_CATEGORY: &str = "Otros";

/// Categories offered to the model
pub const CATEGORY_TAXONOMY: [&str; 13] = [
    "Frutas y Verduras",
    "Carnes y Pescados",
    "Lácteos y Huevos",
    "Despensa",
    "Panadería",
    "Bebidas",
    "Limpieza y Hogar",
    "Cuidado Personal",
    "Congelados",
    "Conservas y Enlatados",
    "Snacks y Dulces",
    "Mascotas",
    FALLBACK_CATEGORY,
];

/// A product name with the category the model assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedItem {
    pub name: String,
    pub category: String,
}

impl CategorizedItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }

    pub fn fallback(name: impl Into<String>) -> Self {
        Self::new(name, FALLBACK_CATEGORY)
    }
}

/// Name form used for matching: trimmed and lower-cased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Every name mapped to [`FALLBACK_CATEGORY`]
pub fn fallback_items<S: AsRef<str>>(names: &[S]) -> Vec<CategorizedItem> {
    names
        .iter()
        .map(|n| CategorizedItem::fallback(n.as_ref()))
        .collect()
}

/// Cache key for a list of names: normalized names joined with `", "`
pub fn cache_key<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| normalize_name(n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where a categorization result came from
#[derive(Debug, Clone)]
pub enum OutcomeSource {
    /// Nothing to categorize
    Empty,
    Model,
    Cache,
    Fallback(CategorizationError),
}

/// Result of the client-side categorization; `items` is always usable
#[derive(Debug, Clone)]
pub struct CategorizationOutcome {
    pub items: Vec<CategorizedItem>,
    pub source: OutcomeSource,
}

impl CategorizationOutcome {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            source: OutcomeSource::Empty,
        }
    }

    pub fn model(items: Vec<CategorizedItem>) -> Self {
        Self {
            items,
            source: OutcomeSource::Model,
        }
    }

    pub fn cached(items: Vec<CategorizedItem>) -> Self {
        Self {
            items,
            source: OutcomeSource::Cache,
        }
    }

    pub fn fallback<S: AsRef<str>>(names: &[S], error: CategorizationError) -> Self {
        Self {
            items: fallback_items(names),
            source: OutcomeSource::Fallback(error),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, OutcomeSource::Fallback(_))
    }

    /// Error that caused the fallback, if any
    pub fn error(&self) -> Option<&CategorizationError> {
        match &self.source {
            OutcomeSource::Fallback(e) => Some(e),
            _ => None,
        }
    }
}
