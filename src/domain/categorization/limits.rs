//! Request size limits

use crate::domain::product::validate_product_name;

use super::error::RequestValidationError;

/// Hard cap on products per categorization request
pub const MAX_PRODUCTS_PER_REQUEST: usize = 50;

/// Approximate token budget per request
pub const MAX_TOKENS_PER_REQUEST: usize = 1000;

/// Estimated tokens per product name (name plus overhead)
pub const ESTIMATED_TOKENS_PER_PRODUCT: usize = 10;

/// Estimated tokens of the fixed prompt text
pub const BASE_PROMPT_TOKENS: usize = 200;

/// Limits enforced before any external call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorizationLimits {
    pub max_products: usize,
    pub max_tokens: usize,
    pub tokens_per_product: usize,
    pub base_prompt_tokens: usize,
}

impl Default for CategorizationLimits {
    fn default() -> Self {
        Self {
            max_products: MAX_PRODUCTS_PER_REQUEST,
            max_tokens: MAX_TOKENS_PER_REQUEST,
            tokens_per_product: ESTIMATED_TOKENS_PER_PRODUCT,
            base_prompt_tokens: BASE_PROMPT_TOKENS,
        }
    }
}

impl CategorizationLimits {
    /// `count * tokens_per_product + base_prompt_tokens`
    pub fn estimate_tokens(&self, count: usize) -> usize {
        count
            .saturating_mul(self.tokens_per_product)
            .saturating_add(self.base_prompt_tokens)
    }

    /// Largest product count whose estimate fits the token budget
    pub fn max_products_for_budget(&self) -> usize {
        if self.tokens_per_product == 0 {
            return usize::MAX;
        }
        self.max_tokens.saturating_sub(self.base_prompt_tokens) / self.tokens_per_product
    }

    pub fn check_cardinality(&self, count: usize) -> Result<(), RequestValidationError> {
        if count > self.max_products {
            return Err(RequestValidationError::TooManyProducts {
                max: self.max_products,
                actual: count,
            });
        }
        Ok(())
    }

    pub fn check_names<S: AsRef<str>>(&self, names: &[S]) -> Result<(), RequestValidationError> {
        let invalid = names
            .iter()
            .filter(|n| validate_product_name(n.as_ref()).is_err())
            .count();

        if invalid > 0 {
            return Err(RequestValidationError::InvalidNames { invalid });
        }
        Ok(())
    }

    pub fn check_token_budget(&self, count: usize) -> Result<(), RequestValidationError> {
        let estimated_tokens = self.estimate_tokens(count);

        if estimated_tokens > self.max_tokens {
            return Err(RequestValidationError::TokenBudgetExceeded {
                estimated_tokens,
                max_products: self.max_products_for_budget(),
            });
        }
        Ok(())
    }

    /// Cardinality, then names, then token budget
    pub fn validate<S: AsRef<str>>(&self, names: &[S]) -> Result<(), RequestValidationError> {
        self.check_cardinality(names.len())?;
        self.check_names(names)?;
        self.check_token_budget(names.len())
    }
}
