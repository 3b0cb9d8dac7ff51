//! Checkout service.
//!
//! Drives the order confirmation state machine against an [`OrderSink`], keeping
//! the cart session in step and dispatching the order notification.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use storefront::{
    customer::CustomerInfo,
    invoice::{InvoiceSource, derive_invoice},
    orders::{Checkout, CheckoutError, ConfirmedOrder, SinkOutcome},
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    notify::{self, Notifier},
    orders::{OrderSink, OrderSinkError},
    session::CartSession,
};

/// Error recorded when a submission is abandoned before the sink answers.
pub const INTERRUPTED: &str = "order submission was interrupted";

/// Errors that can occur while checking out.
#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    /// The checkout is not ready to submit.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The order sink refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The order sink could not be reached.
    #[error("order submission failed: {0}")]
    Sink(#[from] OrderSinkError),
}

/// A confirmed submission.
#[derive(Debug)]
pub struct Submission {
    /// The confirmed order
    pub order: ConfirmedOrder,

    /// Pending notification, if a notifier is configured. Dropping it does not
    /// cancel delivery.
    pub notification: Option<JoinHandle<()>>,
}

/// Checkout for one order.
pub struct CheckoutService {
    checkout: Checkout,
    sink: Arc<dyn OrderSink>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutService")
            .field("checkout", &self.checkout)
            .field("notifies", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}

impl CheckoutService {
    /// Create a checkout submitting to `sink`.
    pub fn new(sink: Arc<dyn OrderSink>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self {
            checkout: Checkout::new(),
            sink,
            notifier,
        }
    }

    /// Underlying state machine.
    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Replace the customer form contents.
    ///
    /// # Errors
    ///
    /// Fails unless the checkout is still being built.
    pub fn set_customer(&mut self, customer: CustomerInfo) -> Result<(), CheckoutServiceError> {
        Ok(self.checkout.set_customer(customer)?)
    }

    /// Start over with an empty form after a confirmed order.
    ///
    /// # Errors
    ///
    /// Fails while a submission is in flight.
    pub fn reset(&mut self) -> Result<(), CheckoutServiceError> {
        Ok(self.checkout.reset()?)
    }

    /// Submit the session's cart.
    ///
    /// On confirmation the cart is emptied and a notification dispatched. On any
    /// failure the checkout returns to building with the error recorded and the
    /// cart untouched. If the returned future is dropped before the sink answers,
    /// the checkout also returns to building, recording [`INTERRUPTED`].
    ///
    /// # Errors
    ///
    /// - [`CheckoutServiceError::Checkout`]: validation failed; the sink was not contacted.
    /// - [`CheckoutServiceError::Rejected`]: the sink refused the order.
    /// - [`CheckoutServiceError::Sink`]: the sink could not be reached.
    pub async fn submit(
        &mut self,
        session: &mut CartSession,
    ) -> Result<Submission, CheckoutServiceError> {
        let details = self.checkout.begin(session.cart())?;

        let mut in_flight = InFlight {
            checkout: &mut self.checkout,
        };

        let outcome = self.sink.submit(details).await;

        match outcome {
            Ok(SinkOutcome::Confirmed(order)) => {
                let order = session.apply(|cart| in_flight.checkout.confirm(cart, order).cloned())?;

                info!(order = %order.id(), total = %order.total(), "order confirmed");

                let notification = self.notifier.as_ref().map(|notifier| {
                    let invoice = derive_invoice(InvoiceSource::Confirmed(&order), Timestamp::now());

                    notify::dispatch(Arc::clone(notifier), invoice)
                });

                Ok(Submission {
                    order,
                    notification,
                })
            }
            Ok(SinkOutcome::Rejected(message)) => {
                warn!("order rejected: {message}");

                in_flight.checkout.fail(message.clone())?;

                Err(CheckoutServiceError::Rejected(message))
            }
            Err(source) => {
                error!("order submission failed: {source}");

                in_flight.checkout.fail(source.to_string())?;

                Err(CheckoutServiceError::Sink(source))
            }
        }
    }
}

/// Returns an abandoned submission to building.
struct InFlight<'a> {
    checkout: &'a mut Checkout,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.checkout.is_submitting() && self.checkout.fail(INTERRUPTED).is_ok() {
            warn!("{INTERRUPTED}");
        }
    }
}
