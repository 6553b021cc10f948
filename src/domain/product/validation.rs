//! Product field validation

/// Maximum product name length, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Characters rejected in product names
pub const FORBIDDEN_NAME_CHARS: [char; 7] = ['<', '>', '{', '}', '[', ']', '\\'];

/// Validate a product name
///
/// A name must contain something other than whitespace, be at most
/// [`MAX_NAME_LENGTH`] characters long and contain none of
/// [`FORBIDDEN_NAME_CHARS`].
pub fn validate_product_name(name: &str) -> Result<(), ProductValidationError> {
    if name.trim().is_empty() {
        return Err(ProductValidationError::EmptyName);
    }

    let length = name.chars().count();

    if length > MAX_NAME_LENGTH {
        return Err(ProductValidationError::NameTooLong(length));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(ProductValidationError::ForbiddenCharacter(c));
    }

    Ok(())
}

/// Validate a unit price
pub fn validate_price(price: f64) -> Result<(), ProductValidationError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ProductValidationError::InvalidPrice);
    }

    Ok(())
}

/// Validate a stored quantity (zero quantities are never stored)
pub fn validate_quantity(quantity: u32) -> Result<(), ProductValidationError> {
    if quantity == 0 {
        return Err(ProductValidationError::InvalidQuantity);
    }

    Ok(())
}

/// Validate that `price * quantity` stays finite
pub fn validate_line_total(price: f64, quantity: u32) -> Result<(), ProductValidationError> {
    if !(price * f64::from(quantity)).is_finite() {
        return Err(ProductValidationError::LineTotalOverflow);
    }

    Ok(())
}

/// Product validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    EmptyName,
    NameTooLong(usize),
    ForbiddenCharacter(char),
    InvalidPrice,
    InvalidQuantity,
    LineTotalOverflow,
}

impl std::fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Product name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Product name too long: {} chars (max {})",
                len, MAX_NAME_LENGTH
            ),
            Self::ForbiddenCharacter(c) => {
                write!(f, "Product name contains forbidden character '{}'", c)
            }
            Self::InvalidPrice => write!(f, "Price must be a number greater than 0"),
            Self::InvalidQuantity => write!(f, "Quantity must be greater than 0"),
            Self::LineTotalOverflow => write!(f, "Price times quantity is not a finite number"),
        }
    }
}

impl std::error::Error for ProductValidationError {}
