//! Storefront
//!
//! Storefront is the core of a small catalog-and-order shop: an authoritative cart
//! engine, a catalog filter, the order confirmation state machine with sequential order
//! ids, invoice derivation and the promotional image feed. Everything here is pure;
//! I/O lives in `storefront-app`.

pub mod access;
pub mod cart;
pub mod customer;
pub mod filter;
pub mod invoice;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod promo;
