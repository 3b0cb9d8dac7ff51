//! Integration test for the cart to invoice flow.
//!
//! A customer browses a small parts catalog, builds a cart and checks out twice
//! against an in-process order sink:
//!
//! 1. Oil filter x2 at 50 and engine oil x1 at 80, total 180. The sink confirms the
//!    order as `FCT-00003` (two historical orders already exist).
//! 2. A second order for a chain is first rejected by the sink, leaving the cart as
//!    it was, then accepted as `FCT-00004`.

use jiff::Timestamp;
use rust_decimal::{Decimal, dec};
use serde_json::json;
use smallvec::smallvec;
use storefront::prelude::*;
use testresult::TestResult;

fn catalog() -> Vec<Product> {
    parse_catalog(&json!([
        { "id": 1, "name": "Oil Filter", "price": 50, "category": "Filters", "sku": "FLT-OIL-001" },
        { "id": 7, "name": "Engine Oil 10W-40", "price": "80", "category": "Oils" },
        { "id": 9, "name": "Drive Chain", "price": 250, "category": "Drive", "piecesPerCarton": 10 },
        { "id": 0, "name": "Broken row", "price": 5 },
        { "id": 10, "name": "Free sticker", "price": 0, "category": "Misc" }
    ]))
}

fn history() -> TestResult<Vec<ConfirmedOrder>> {
    let orders = serde_json::from_value(json!([
        {
            "id": "FCT-00001", "date": "2023-01-01T00:00:00Z",
            "customerName": "Ahmed", "phone": "0101234567", "address": "123 Nasr St",
            "items": [{ "id": 1, "name": "Oil Filter", "price": 50, "category": "Filters", "quantity": 2 }],
            "total": 100
        },
        {
            "id": "FCT-00002", "date": "2023-01-02T00:00:00Z",
            "customerName": "Fatima", "phone": "0119876543", "address": "456 Republic St",
            "items": [{ "id": 9, "name": "Drive Chain", "price": 250, "category": "Drive", "quantity": 1 }],
            "total": 250
        }
    ]))?;

    Ok(orders)
}

/// In-process stand-in for the remote order sink.
struct Sink {
    sequence: OrderSequence,
    accept: bool,
}

impl Sink {
    fn submit(&mut self, details: OrderDetails) -> SinkOutcome {
        if !self.accept {
            return SinkOutcome::from_response(&json!({ "success": false, "message": "Server error" }));
        }

        let order = ConfirmedOrder::new(self.sequence.next_id(), Timestamp::UNIX_EPOCH, details);

        SinkOutcome::Confirmed(order)
    }
}

fn drive(checkout: &mut Checkout, cart: &mut Cart, sink: &mut Sink) -> TestResult<Option<ConfirmedOrder>> {
    let details = checkout.begin(cart)?;

    match sink.submit(details) {
        SinkOutcome::Confirmed(order) => Ok(Some(checkout.confirm(cart, order)?.clone())),
        SinkOutcome::Rejected(message) => {
            checkout.fail(message)?;
            Ok(None)
        }
    }
}

#[test]
fn catalog_filters_and_categories() {
    let catalog = catalog();

    assert_eq!(catalog.len(), 3);

    let labels: Vec<_> = categories(&catalog).iter().map(ToString::to_string).collect();

    assert_eq!(labels, vec!["All", "Filters", "Oils", "Drive"]);

    let oil = ProductFilter::new("OIL", CategoryFilter::All).apply(&catalog);
    let names: Vec<_> = oil.iter().map(|product| product.name.as_str()).collect();

    assert_eq!(names, vec!["Oil Filter", "Engine Oil 10W-40"]);

    let oils_only = ProductFilter::new("oil", CategoryFilter::Only("Oils".to_string())).apply(&catalog);

    assert_eq!(oils_only.len(), 1);
}

#[test]
fn confirmed_orders_follow_history_and_clear_the_cart() -> TestResult {
    let catalog = catalog();
    let history = history()?;

    let mut sink = Sink {
        sequence: OrderSequence::after_history(OrderIdFormat::default(), &history),
        accept: true,
    };

    let mut cart = Cart::new();

    for (product, quantity) in catalog.iter().zip([2, 1]) {
        cart.add(product, quantity);
    }

    assert_eq!(cart.total(), dec!(180));

    let mut checkout = Checkout::new();

    assert_eq!(
        checkout.begin(&cart),
        Err(CheckoutError::MissingCustomerDetails(smallvec![
            CustomerField::Name,
            CustomerField::Phone,
            CustomerField::Address,
        ]))
    );

    checkout.set_customer(CustomerInfo::new("Ahmed", "0101234567", "123 Nasr St"))?;

    let order = drive(&mut checkout, &mut cart, &mut sink)?.ok_or_else(|| std::io::Error::other("order was not confirmed"))?;

    assert_eq!(order.id().to_string(), "FCT-00003");
    assert_eq!(order.total(), dec!(180));
    assert!(cart.is_empty());

    let subtotals: Vec<Decimal> = order.items().iter().map(LineItem::subtotal).collect();

    assert_eq!(subtotals, vec![dec!(100), dec!(80)]);
    assert_eq!(
        order.items().iter().map(|item| item.product().sku.clone()).collect::<Vec<_>>(),
        vec![Some("FLT-OIL-001".to_string()), Some("not available".to_string())]
    );

    let invoice = derive_invoice(InvoiceSource::from(&order), Timestamp::now());

    assert_eq!(invoice.total, order.total());
    assert!(invoice.is_confirmed());

    Ok(())
}

#[test]
fn rejected_order_keeps_cart_and_can_be_retried() -> TestResult {
    let catalog = catalog();

    let mut sink = Sink {
        sequence: OrderSequence::seeded(OrderIdFormat::default(), 3),
        accept: false,
    };

    let mut cart = Cart::new();

    if let Some(chain) = catalog.iter().find(|product| product.id == ProductId::new(9)) {
        cart.add(chain, 1);
    }

    let before = cart.clone();

    let mut checkout = Checkout::with_customer(CustomerInfo::new("Fatima", "0119876543", "456 Republic St"));

    assert_eq!(drive(&mut checkout, &mut cart, &mut sink)?, None);
    assert_eq!(cart, before);
    assert_eq!(checkout.state(), &CheckoutState::Building);
    assert_eq!(checkout.last_error(), Some("Server error"));

    sink.accept = true;

    let order = drive(&mut checkout, &mut cart, &mut sink)?.ok_or_else(|| std::io::Error::other("order was not confirmed"))?;

    assert_eq!(order.id().to_string(), "FCT-00004");
    assert!(cart.is_empty());
    assert_eq!(checkout.last_error(), None);

    Ok(())
}

#[test]
fn corrupted_snapshot_restores_nothing() {
    assert!(Cart::from_json("[{\"id\": 1, \"quantity\": ").is_err());
}
