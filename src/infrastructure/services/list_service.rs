//! List store - the authoritative product collection and its total
//!
//! Every mutation recomputes the total from scratch and persists the
//! resulting collection. Persistence failures are logged and otherwise
//! ignored so list editing keeps working without storage.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::storage::{KeyValueStoreExt, PRODUCT_STORE_KEY};
use crate::domain::{
    Clock, KeyValueStore, Product, ProductDraft, ProductId, ProductUpdate, ProductValidationError,
};

#[derive(Debug, Default)]
struct ListState {
    products: Vec<Product>,
    total: f64,
    last_id: i64,
}

impl ListState {
    fn recompute_total(&mut self) {
        self.total = self.products.iter().map(Product::line_total).sum();
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.id() == id)
    }
}

#[derive(Serialize)]
struct ListSnapshot<'a> {
    products: &'a [Product],
    total: f64,
}

/// Shopping list store backed by a key-value store
#[derive(Debug)]
pub struct ListStore {
    state: Mutex<ListState>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ListStore {
    /// An empty list that persists to `store`
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(ListState::default()),
            store,
            clock,
        }
    }

    /// Restore the list persisted in `store`
    ///
    /// Invalid products are dropped and the total is recomputed rather than
    /// trusted. Unreadable state yields an empty list.
    pub async fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let list = Self::new(store, clock);

        let persisted: Option<serde_json::Value> = match list.store.get(PRODUCT_STORE_KEY).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted list, starting empty");
                None
            }
        };

        let entries = persisted
            .as_ref()
            .and_then(|v| v.get("products"))
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut products: Vec<Product> = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<Product>(entry) {
                Ok(product) if products.iter().any(|p| p.id() == product.id()) => {
                    warn!(id = %product.id(), "Dropping persisted product with duplicate id");
                }
                Ok(product) => products.push(product),
                Err(e) => warn!(error = %e, "Dropping invalid persisted product"),
            }
        }

        {
            let mut state = list.state.lock().await;
            state.last_id = products.iter().map(|p| p.id().value()).max().unwrap_or(0);
            state.products = products;
            state.recompute_total();
            info!(
                products = state.products.len(),
                total = state.total,
                "Loaded shopping list"
            );
        }

        list
    }

    fn next_id(&self, state: &mut ListState) -> ProductId {
        let now = self.clock.now().timestamp_millis();
        state.last_id = now.max(state.last_id.saturating_add(1));
        ProductId::new(state.last_id)
    }

    async fn persist(&self, state: &ListState) {
        let snapshot = ListSnapshot {
            products: &state.products,
            total: state.total,
        };

        if let Err(e) = self.store.set(PRODUCT_STORE_KEY, &snapshot).await {
            warn!(error = %e, "Failed to persist shopping list");
        }
    }

    /// Insert a product at the front of the list
    pub async fn add(&self, draft: ProductDraft) -> Product {
        let mut state = self.state.lock().await;

        let product = Product::from_draft(self.next_id(&mut state), draft);
        state.products.insert(0, product.clone());
        state.recompute_total();
        self.persist(&state).await;

        debug!(id = %product.id(), name = %product.name(), "Product added");
        product
    }

    /// Set a product's quantity; zero or negative removes it
    ///
    /// Returns whether the list changed.
    pub async fn update_quantity(&self, id: ProductId, quantity: i64) -> bool {
        let mut state = self.state.lock().await;
        let Some(index) = state.position(id) else {
            return false;
        };

        if quantity <= 0 {
            state.products.remove(index);
        } else {
            let updated = u32::try_from(quantity)
                .map_err(|_| ProductValidationError::LineTotalOverflow)
                .and_then(|q| state.products[index].with_quantity(q));

            match updated {
                Ok(product) => state.products[index] = product,
                Err(e) => {
                    debug!(id = %id, quantity, error = %e, "Quantity update rejected");
                    return false;
                }
            }
        }

        state.recompute_total();
        self.persist(&state).await;
        true
    }

    /// Merge `update` into a product
    ///
    /// Returns `Ok(false)` when `id` is unknown. An update that would leave
    /// the product invalid is rejected and changes nothing.
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<bool, ProductValidationError> {
        let mut state = self.state.lock().await;
        let Some(index) = state.position(id) else {
            return Ok(false);
        };

        let updated = state.products[index].apply(update)?;
        state.products[index] = updated;
        state.recompute_total();
        self.persist(&state).await;
        Ok(true)
    }

    /// Remove a product, returning whether it existed
    pub async fn remove(&self, id: ProductId) -> bool {
        let mut state = self.state.lock().await;
        let Some(index) = state.position(id) else {
            return false;
        };

        state.products.remove(index);
        state.recompute_total();
        self.persist(&state).await;
        true
    }

    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.products.clear();
        state.total = 0.0;
        self.persist(&state).await;
    }

    /// Sum of `price * quantity` over the current products
    pub async fn total(&self) -> f64 {
        self.state.lock().await.total
    }

    /// Current products, newest first
    pub async fn products(&self) -> Vec<Product> {
        self.state.lock().await.products.clone()
    }

    pub async fn get(&self, id: ProductId) -> Option<Product> {
        let state = self.state.lock().await;
        state.position(id).map(|i| state.products[i].clone())
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.products.is_empty()
    }
}
