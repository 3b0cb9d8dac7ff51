//! Order sinks.
//!
//! An order sink stores submitted orders, assigns their ids and lists the order
//! history. [`LocalOrderSink`] keeps a ledger file; [`HttpOrderSink`] talks to a
//! remote backend.

use async_trait::async_trait;
use mockall::automock;
use storefront::orders::{ConfirmedOrder, OrderDetails, SinkOutcome};
use thiserror::Error;

use crate::storage::StoreError;

pub use http::{HttpOrderSink, HttpOrderSinkConfig};
pub use local::LocalOrderSink;

mod http;
mod local;

/// Errors that can occur while talking to an order sink.
#[derive(Debug, Error)]
pub enum OrderSinkError {
    /// An HTTP transport or body error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sink returned a non-2xx response or an unexpected body.
    #[error("unexpected response from order sink: {0}")]
    UnexpectedResponse(String),

    /// The local ledger could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Destination for submitted orders.
#[automock]
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Submit an order. A rejection by the sink is an `Ok` outcome; errors are
    /// transport or storage failures.
    async fn submit(&self, details: OrderDetails) -> Result<SinkOutcome, OrderSinkError>;

    /// Every order the sink has confirmed, oldest first.
    async fn history(&self) -> Result<Vec<ConfirmedOrder>, OrderSinkError>;
}
