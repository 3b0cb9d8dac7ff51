//! Order sink answers

use serde_json::Value;

use super::ConfirmedOrder;

/// Message used when the sink rejects an order without saying why.
pub const DEFAULT_REJECTION: &str = "the order could not be submitted";

/// Message used when the sink claims success but sends no usable order.
pub const MALFORMED_CONFIRMATION: &str = "malformed confirmation";

/// Outcome reported by an order sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkOutcome {
    /// The sink accepted and stored the order.
    Confirmed(ConfirmedOrder),

    /// The sink refused the order.
    Rejected(String),
}

impl SinkOutcome {
    /// Interpret a loosely-typed sink answer.
    ///
    /// `{"success": true, "order": {..}}` confirms; anything else is a rejection carrying
    /// the sink's `message` when it sent one.
    pub fn from_response(response: &Value) -> Self {
        let success = response
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if !success {
            let message = response
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .unwrap_or(DEFAULT_REJECTION);

            return SinkOutcome::Rejected(message.to_string());
        }

        response
            .get("order")
            .cloned()
            .and_then(|order| serde_json::from_value(order).ok())
            .map_or_else(
                || SinkOutcome::Rejected(MALFORMED_CONFIRMATION.to_string()),
                SinkOutcome::Confirmed,
            )
    }

    /// The confirmed order, if the sink accepted.
    pub fn confirmed(&self) -> Option<&ConfirmedOrder> {
        match self {
            SinkOutcome::Confirmed(order) => Some(order),
            SinkOutcome::Rejected(_) => None,
        }
    }
}
