//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    access::{AccessGrant, DEFAULT_GRANT_TTL},
    cart::{Cart, LineItem},
    customer::{CustomerField, CustomerInfo, MissingFields},
    filter::{CategoryFilter, ProductFilter, categories},
    invoice::{InvoiceError, InvoiceLine, InvoicePayload, InvoiceSource, derive_invoice},
    orders::{
        Checkout, CheckoutError, CheckoutState, ConfirmedOrder, OrderDetails, OrderId,
        OrderIdError, OrderIdFormat, OrderSequence, SinkOutcome,
    },
    products::{ParsedCatalog, Product, ProductId, parse_catalog, parse_catalog_rows},
};
