//! Orders

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cart::{Cart, LineItem},
    customer::CustomerInfo,
};

pub mod checkout;
pub mod id;
pub mod response;

pub use checkout::{Checkout, CheckoutError, CheckoutState};
pub use id::{OrderId, OrderIdError, OrderIdFormat, OrderSequence};
pub use response::SinkOutcome;

/// SKU recorded on confirmed lines whose product has none.
pub const SKU_NOT_AVAILABLE: &str = "not available";

/// Order as submitted to the order sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Customer details
    #[serde(flatten)]
    pub customer: CustomerInfo,

    /// Cart lines at submission time
    pub items: Vec<LineItem>,

    /// Cart total at submission time
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl OrderDetails {
    /// Snapshot `cart` for submission on behalf of `customer`.
    pub fn new(customer: CustomerInfo, cart: &Cart) -> Self {
        Self {
            customer,
            items: cart.items().to_vec(),
            total: cart.total(),
        }
    }
}

/// Order accepted by the order sink. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OrderRecord")]
pub struct ConfirmedOrder {
    id: OrderId,
    date: Timestamp,

    #[serde(flatten)]
    details: OrderDetails,
}

impl ConfirmedOrder {
    /// Confirm `details` under `id` at `date`.
    ///
    /// Lines without a SKU are given [`SKU_NOT_AVAILABLE`].
    pub fn new(id: OrderId, date: Timestamp, mut details: OrderDetails) -> Self {
        for item in &mut details.items {
            let product = item.product_mut();

            if product.sku.as_deref().is_none_or(|sku| sku.trim().is_empty()) {
                product.sku = Some(SKU_NOT_AVAILABLE.to_string());
            }
        }

        Self { id, date, details }
    }

    /// Order identifier
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Confirmation timestamp
    pub fn date(&self) -> Timestamp {
        self.date
    }

    /// Customer details
    pub fn customer(&self) -> &CustomerInfo {
        &self.details.customer
    }

    /// Confirmed lines
    pub fn items(&self) -> &[LineItem] {
        &self.details.items
    }

    /// Total recorded at submission
    pub fn total(&self) -> Decimal {
        self.details.total
    }
}

#[derive(Deserialize)]
struct OrderRecord {
    id: OrderId,
    date: Timestamp,

    #[serde(flatten)]
    details: OrderDetails,
}

impl From<OrderRecord> for ConfirmedOrder {
    fn from(record: OrderRecord) -> Self {
        ConfirmedOrder::new(record.id, record.date, record.details)
    }
}
