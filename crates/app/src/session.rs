//! Cart session
//!
//! Wraps the cart engine and mirrors every mutation to a [`CartStore`]. Store
//! failures are logged and never undo or fail the in-memory mutation.

use std::sync::Arc;

use mockall::automock;
use storefront::{
    cart::Cart,
    products::{Product, ProductId},
};
use tracing::{debug, warn};

use crate::storage::{JsonFile, StoreError};

/// Persistence for the cart between sessions.
#[automock]
pub trait CartStore: Send + Sync {
    /// Stored cart, if there is a readable one.
    fn load(&self) -> Option<Cart>;

    /// Replace the stored cart.
    fn save(&self, cart: &Cart) -> Result<(), StoreError>;
}

impl CartStore for JsonFile<Cart> {
    fn load(&self) -> Option<Cart> {
        JsonFile::load(self)
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        JsonFile::save(self, cart)
    }
}

/// The shopper's cart for this process, restored from and mirrored to a store.
#[derive(Clone)]
pub struct CartSession {
    cart: Cart,
    store: Arc<dyn CartStore>,
}

impl std::fmt::Debug for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartSession {
    /// Restore the stored cart, or start empty when there is none.
    pub fn restore(store: Arc<dyn CartStore>) -> Self {
        let cart = store.load().unwrap_or_default();

        debug!(lines = cart.len(), "restored cart");

        Self { cart, store }
    }

    /// Current cart contents.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add `quantity` units of `product`.
    pub fn add(&mut self, product: &Product, quantity: i64) {
        self.apply(|cart| cart.add(product, quantity));
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) {
        self.add(product, 1);
    }

    /// Remove the line for `id`.
    pub fn remove(&mut self, id: ProductId) {
        self.apply(|cart| cart.remove(id));
    }

    /// Set the quantity for `id`; zero or less removes the line.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        self.apply(|cart| cart.update_quantity(id, quantity));
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.apply(Cart::clear);
    }

    /// Run `mutation` against the cart, then mirror the result to the store.
    ///
    /// The mutation is applied before the write starts and stands whatever the write
    /// does. The write is a single small local file and runs inline; failures are
    /// logged.
    pub fn apply<R>(&mut self, mutation: impl FnOnce(&mut Cart) -> R) -> R {
        let result = mutation(&mut self.cart);

        if let Err(error) = self.store.save(&self.cart) {
            warn!("failed to persist cart: {error}");
        }

        result
    }
}
