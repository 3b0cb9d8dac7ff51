//! Cart
//!
//! The cart owns one line item per product id. Every operation is infallible:
//! non-positive quantities and unknown ids degrade to no-ops or removal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::products::{Product, ProductId};

/// A product snapshot and the quantity ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    product: Product,

    quantity: u32,
}

impl LineItem {
    /// Create a line item, or `None` when the quantity is zero.
    pub fn new(product: Product, quantity: u32) -> Option<Self> {
        (quantity > 0).then_some(Self { product, quantity })
    }

    /// Product snapshot taken when the item was added.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Product id of this line.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price captured at add time.
    pub fn price(&self) -> Decimal {
        self.product.price
    }

    /// Quantity ordered, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price multiplied by quantity.
    pub fn subtotal(&self) -> Decimal {
        self.product
            .price
            .saturating_mul(Decimal::from(self.quantity))
    }

    pub(crate) fn product_mut(&mut self) -> &mut Product {
        &mut self.product
    }
}

/// Shopping cart
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`.
    ///
    /// A product already in the cart keeps its original snapshot and only has its
    /// quantity increased. Quantities of zero or less are ignored.
    pub fn add(&mut self, product: &Product, quantity: i64) {
        let Some(quantity) = positive_quantity(quantity) else {
            return;
        };

        if let Some(item) = self.item_mut(product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(LineItem {
                product: product.clone(),
                quantity,
            });
        }
    }

    /// Remove the line for `id`, if present.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|item| item.id() != id);
    }

    /// Set the quantity for `id` exactly. Zero or less removes the line.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        let Some(quantity) = positive_quantity(quantity) else {
            self.remove(id);
            return;
        };

        if let Some(item) = self.item_mut(id) {
            item.quantity = quantity;
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(LineItem::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up the line for `id`.
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize the cart to its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a cart from its persisted JSON form.
    ///
    /// Lines are re-applied through [`Cart::add`], so zero quantities are dropped and
    /// duplicate ids are merged. Lines whose product breaks the catalog rules (see
    /// [`Product::is_valid`]) are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the input is not a valid cart snapshot.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn item_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        let mut cart = Cart::new();

        for item in items.into_iter().filter(|item| item.product.is_valid()) {
            let quantity = i64::from(item.quantity);
            cart.add(&item.product, quantity);
        }

        cart
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

fn positive_quantity(quantity: i64) -> Option<u32> {
    (quantity > 0).then(|| u32::try_from(quantity).unwrap_or(u32::MAX))
}
