//! Product domain - shopping list items and their invariants

mod entity;
mod validation;

pub use entity::{Product, ProductDraft, ProductId, ProductUpdate};
pub use validation::{
    validate_price, validate_product_name, validate_quantity, ProductValidationError,
    FORBIDDEN_NAME_CHARS, MAX_NAME_LENGTH,
};
