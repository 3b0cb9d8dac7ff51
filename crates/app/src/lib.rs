//! Storefront services, collaborator adapters and configuration.

pub mod access;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod context;
pub mod notify;
pub mod observability;
pub mod orders;
pub mod promo;
pub mod session;
pub mod storage;
