//! Product entities

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_line_total, validate_price, validate_product_name, validate_quantity,
    ProductValidationError,
};

/// Unique product identifier (creation time in milliseconds, bumped to stay unique)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated product that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    name: String,
    price: f64,
    quantity: u32,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        quantity: u32,
    ) -> Result<Self, ProductValidationError> {
        let name = name.into();
        validate_fields(&name, price, quantity)?;

        Ok(Self {
            name: name.trim().to_string(),
            price,
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A product in the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProduct")]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    quantity: u32,
}

impl Product {
    /// Create a product from an already validated draft
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            quantity: draft.quantity,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price * quantity`
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Return a copy with a different quantity
    pub fn with_quantity(&self, quantity: u32) -> Result<Self, ProductValidationError> {
        self.apply(&ProductUpdate::default().with_quantity(quantity))
    }

    /// Merge the given fields into a copy of this product, re-checking every invariant
    pub fn apply(&self, update: &ProductUpdate) -> Result<Self, ProductValidationError> {
        let name = update.name.clone().unwrap_or_else(|| self.name.clone());
        let price = update.price.unwrap_or(self.price);
        let quantity = update.quantity.unwrap_or(self.quantity);

        validate_fields(&name, price, quantity)?;

        Ok(Self {
            id: self.id,
            name: name.trim().to_string(),
            price,
            quantity,
        })
    }
}

/// Partial product fields for `update_product`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

impl ProductUpdate {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.quantity.is_none()
    }
}

/// Unchecked wire form, validated into [`Product`] on deserialization
#[derive(Deserialize)]
struct RawProduct {
    id: ProductId,
    name: String,
    price: f64,
    quantity: u32,
}

impl TryFrom<RawProduct> for Product {
    type Error = ProductValidationError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let draft = ProductDraft::new(raw.name, raw.price, raw.quantity)?;
        Ok(Product::from_draft(raw.id, draft))
    }
}

fn validate_fields(name: &str, price: f64, quantity: u32) -> Result<(), ProductValidationError> {
    validate_product_name(name)?;
    validate_price(price)?;
    validate_quantity(quantity)?;
    validate_line_total(price, quantity)
}
