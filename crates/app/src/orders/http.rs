//! Remote order sink client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use storefront::orders::{ConfirmedOrder, OrderDetails, SinkOutcome};
use tracing::{info, warn};

use crate::orders::{OrderSink, OrderSinkError};

/// Endpoints of a remote order sink.
#[derive(Debug, Clone)]
pub struct HttpOrderSinkConfig {
    /// Endpoint accepting `POST`ed orders.
    pub submit_url: String,

    /// Endpoint listing confirmed orders, if the backend offers one.
    pub history_url: Option<String>,
}

/// HTTP client for a remote order sink.
#[derive(Debug, Clone)]
pub struct HttpOrderSink {
    config: HttpOrderSinkConfig,
    http: Client,
}

impl HttpOrderSink {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: HttpOrderSinkConfig, http: Client) -> Self {
        Self { config, http }
    }

    async fn get_json(&self, url: &str) -> Result<Value, OrderSinkError> {
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(OrderSinkError::UnexpectedResponse(format!(
                "history request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl OrderSink for HttpOrderSink {
    async fn submit(&self, details: OrderDetails) -> Result<SinkOutcome, OrderSinkError> {
        let response = self
            .http
            .post(&self.config.submit_url)
            .json(&details)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(OrderSinkError::UnexpectedResponse(format!(
                "submit request failed with status {status}: {text}"
            )));
        }

        let body: Value = response.json().await?;
        let outcome = SinkOutcome::from_response(&body);

        match &outcome {
            SinkOutcome::Confirmed(order) => info!(order = %order.id(), "order confirmed by remote sink"),
            SinkOutcome::Rejected(message) => warn!("order rejected by remote sink: {message}"),
        }

        Ok(outcome)
    }

    async fn history(&self) -> Result<Vec<ConfirmedOrder>, OrderSinkError> {
        let Some(url) = &self.config.history_url else {
            return Ok(Vec::new());
        };

        let body = self.get_json(url).await?;

        Ok(parse_history(&body))
    }
}

/// Orders from a history payload, skipping entries that are not valid orders.
///
/// Accepts a bare array or an object with an `orders` array.
fn parse_history(body: &Value) -> Vec<ConfirmedOrder> {
    let entries = body
        .as_array()
        .or_else(|| body.get("orders").and_then(Value::as_array));

    let Some(entries) = entries else {
        warn!("order history payload is not a list");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(order) => Some(order),
            Err(source) => {
                warn!("skipping malformed order in history: {source}");
                None
            }
        })
        .collect()
}
