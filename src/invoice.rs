//! Invoices
//!
//! An invoice is a projection of either a live cart or a confirmed order. It is
//! derived on demand and never stored; totals are always recomputed from the lines.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    cart::{Cart, LineItem},
    customer::CustomerInfo,
    orders::{ConfirmedOrder, OrderId},
};

mod render;

pub use render::InvoiceError;

/// SKU sent to the notification channel for lines without one.
pub const SKU_UNKNOWN: &str = "N/A";

/// What an invoice is derived from.
#[derive(Debug, Clone, Copy)]
pub enum InvoiceSource<'a> {
    /// An order accepted by the order sink.
    Confirmed(&'a ConfirmedOrder),

    /// A cart that has not been submitted yet.
    Draft {
        /// Cart contents
        cart: &'a Cart,

        /// Customer form contents
        customer: &'a CustomerInfo,
    },
}

impl<'a> From<&'a ConfirmedOrder> for InvoiceSource<'a> {
    fn from(order: &'a ConfirmedOrder) -> Self {
        InvoiceSource::Confirmed(order)
    }
}

/// One invoice line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    /// Product name
    pub name: String,

    /// Quantity ordered
    pub quantity: u32,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Stock keeping unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// `price * quantity`
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

impl From<&LineItem> for InvoiceLine {
    fn from(item: &LineItem) -> Self {
        let product = item.product();

        Self {
            name: product.name.clone(),
            quantity: item.quantity(),
            price: item.price(),
            sku: product.sku.clone(),
            subtotal: item.subtotal(),
        }
    }
}

/// Invoice contents, ready to render, export or share.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    /// Order id; absent for a draft.
    pub id: Option<OrderId>,

    /// Confirmation date, or derivation time for a draft.
    pub date: Timestamp,

    /// Customer details
    #[serde(flatten)]
    pub customer: CustomerInfo,

    /// Invoice lines
    pub items: Vec<InvoiceLine>,

    /// Sum of the line subtotals
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl InvoicePayload {
    /// Whether the invoice belongs to a confirmed order.
    pub fn is_confirmed(&self) -> bool {
        self.id.is_some()
    }

    /// Whether the invoice has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy of the invoice with every missing SKU set to [`SKU_UNKNOWN`], as sent to the
    /// notification channel.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut payload = self.clone();

        for line in &mut payload.items {
            if line.sku.as_deref().is_none_or(|sku| sku.trim().is_empty()) {
                line.sku = Some(SKU_UNKNOWN.to_string());
            }
        }

        payload
    }
}

/// Derive an invoice from `source`.
///
/// Confirmed orders keep their id and date; drafts have no id and are dated `now`.
/// The total is recomputed from the lines, never copied from the source.
pub fn derive_invoice(source: InvoiceSource<'_>, now: Timestamp) -> InvoicePayload {
    let (id, date, customer, items) = match source {
        InvoiceSource::Confirmed(order) => (
            Some(order.id().clone()),
            order.date(),
            order.customer(),
            order.items(),
        ),
        InvoiceSource::Draft { cart, customer } => (None, now, customer, cart.items()),
    };

    let items: Vec<InvoiceLine> = items.iter().map(InvoiceLine::from).collect();

    let total = items
        .iter()
        .map(|line| line.subtotal)
        .fold(Decimal::ZERO, Decimal::saturating_add);

    InvoicePayload {
        id,
        date,
        customer: customer.clone(),
        items,
        total,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use serde_json::json;
    use testresult::TestResult;

    use crate::products::{Product, ProductId};

    use super::*;

    fn product(id: u64, price: Decimal, sku: Option<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Part {id}"),
            price,
            image: String::new(),
            category: "Parts".to_string(),
            pieces_per_carton: None,
            sku: sku.map(str::to_string),
        }
    }

    #[test]
    fn draft_invoice_has_no_id_and_is_dated_now() {
        let mut cart = Cart::new();
        cart.add(&product(1, dec!(10), None), 1);

        let customer = CustomerInfo::new("Ahmed", "0101234567", "123 Nasr St");
        let now = Timestamp::from_second(1_700_000_000).unwrap_or(Timestamp::UNIX_EPOCH);

        let invoice = derive_invoice(
            InvoiceSource::Draft {
                cart: &cart,
                customer: &customer,
            },
            now,
        );

        assert_eq!(invoice.id, None);
        assert_eq!(invoice.date, now);
        assert_eq!(invoice.customer, customer);
        assert!(!invoice.is_confirmed());
    }

    #[test]
    fn draft_lines_carry_subtotals() {
        let mut cart = Cart::new();
        cart.add(&product(1, dec!(10), Some("A-1")), 1);
        cart.add(&product(2, dec!(20), None), 3);

        let customer = CustomerInfo::default();

        let invoice = derive_invoice(
            InvoiceSource::Draft {
                cart: &cart,
                customer: &customer,
            },
            Timestamp::UNIX_EPOCH,
        );

        let subtotals: Vec<_> = invoice.items.iter().map(|line| line.subtotal).collect();

        assert_eq!(subtotals, vec![dec!(10), dec!(60)]);
        assert_eq!(invoice.total, dec!(70));
    }

    #[test]
    fn confirmed_invoice_recomputes_stale_total() -> TestResult {
        let order: ConfirmedOrder = serde_json::from_value(json!({
            "id": "FCT-00004",
            "date": "2024-05-01T10:00:00Z",
            "customerName": "Fatima",
            "phone": "0119876543",
            "address": "456 Republic St",
            "items": [
                { "id": 1, "name": "Spark plug", "price": 10, "category": "Engine", "quantity": 1 },
                { "id": 2, "name": "Brake pad", "price": 20, "category": "Brakes", "quantity": 3 }
            ],
            "total": 999
        }))?;

        let invoice = derive_invoice(InvoiceSource::from(&order), Timestamp::now());

        assert_eq!(invoice.id.as_ref().map(ToString::to_string).as_deref(), Some("FCT-00004"));
        assert_eq!(invoice.date, order.date());
        assert_eq!(invoice.total, dec!(70));
        assert_eq!(order.total(), dec!(999));

        Ok(())
    }

    #[test]
    fn sanitized_fills_missing_skus() {
        let mut cart = Cart::new();
        cart.add(&product(1, dec!(10), Some("A-1")), 1);
        cart.add(&product(2, dec!(20), None), 1);

        let customer = CustomerInfo::default();

        let invoice = derive_invoice(
            InvoiceSource::Draft {
                cart: &cart,
                customer: &customer,
            },
            Timestamp::UNIX_EPOCH,
        )
        .sanitized();

        let skus: Vec<_> = invoice.items.iter().map(|line| line.sku.as_deref()).collect();

        assert_eq!(skus, vec![Some("A-1"), Some(SKU_UNKNOWN)]);
    }

    #[test]
    fn serializes_with_wire_field_names() -> TestResult {
        let mut cart = Cart::new();
        cart.add(&product(1, dec!(12.5), None), 2);

        let customer = CustomerInfo::new("Ahmed", "0101234567", "123 Nasr St");

        let invoice = derive_invoice(
            InvoiceSource::Draft {
                cart: &cart,
                customer: &customer,
            },
            Timestamp::UNIX_EPOCH,
        );

        let wire = serde_json::to_value(&invoice)?;

        assert_eq!(wire["id"], json!(null));
        assert_eq!(wire["customerName"], json!("Ahmed"));
        assert_eq!(wire["items"][0]["subtotal"], json!(25.0));
        assert_eq!(wire["total"], json!(25.0));

        Ok(())
    }
}
