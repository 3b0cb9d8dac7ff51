//! Order notifications.
//!
//! After an order is confirmed its invoice is sent to a notification endpoint on a
//! detached task. The result is only logged; it never affects the confirmed order.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde_json::json;
use storefront::invoice::InvoicePayload;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Errors that can occur while sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx response.
    #[error("unexpected response from notification endpoint: {0}")]
    UnexpectedResponse(String),
}

/// Receiver of confirmed order invoices.
#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `invoice`.
    async fn notify(&self, invoice: &InvoicePayload) -> Result<(), NotifyError>;
}

/// Notifier posting `{"order": invoice}` to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    url: String,
    http: Client,
}

impl HttpNotifier {
    /// Create a notifier posting to `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, invoice: &InvoicePayload) -> Result<(), NotifyError> {
        let body = json!({ "order": invoice.sanitized() });

        let response = self.http.post(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotifyError::UnexpectedResponse(format!(
                "notify request failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}

/// Send `invoice` through `notifier` on a detached task.
///
/// The returned handle may be dropped; awaiting it only waits for delivery to finish.
pub fn dispatch(notifier: Arc<dyn Notifier>, invoice: InvoicePayload) -> JoinHandle<()> {
    tokio::spawn(async move {
        let order = invoice
            .id
            .as_ref()
            .map_or_else(String::new, ToString::to_string);

        match notifier.notify(&invoice).await {
            Ok(()) => info!(%order, "order notification sent"),
            Err(source) => error!(%order, "failed to send order notification: {source}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use storefront::customer::CustomerInfo;
    use testresult::TestResult;

    use super::*;

    fn invoice() -> InvoicePayload {
        InvoicePayload {
            id: None,
            date: Timestamp::UNIX_EPOCH,
            customer: CustomerInfo::new("Ahmed", "0101234567", "123 Nasr St"),
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn dispatch_delivers_invoice() -> TestResult {
        let mut notifier = MockNotifier::new();

        notifier
            .expect_notify()
            .once()
            .withf(|invoice| invoice.customer.customer_name == "Ahmed")
            .returning(|_| Ok(()));

        dispatch(Arc::new(notifier), invoice()).await?;

        Ok(())
    }

    #[tokio::test]
    async fn dispatch_swallows_failures() -> TestResult {
        let mut notifier = MockNotifier::new();

        notifier
            .expect_notify()
            .once()
            .returning(|_| Err(NotifyError::UnexpectedResponse("503".to_string())));

        dispatch(Arc::new(notifier), invoice()).await?;

        Ok(())
    }
}
