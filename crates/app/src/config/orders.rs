//! Orders Config

use clap::Args;
use storefront::orders::OrderIdFormat;

/// Order numbering and currency settings.
#[derive(Debug, Clone, Args)]
pub struct OrdersConfig {
    /// Prefix of generated order ids, separator included
    #[arg(long, env = "STOREFRONT_ORDER_ID_PREFIX", default_value = "FCT-")]
    pub order_id_prefix: String,

    /// Zero-padded width of the order id sequence number
    #[arg(long, env = "STOREFRONT_ORDER_ID_WIDTH", default_value_t = 5_usize)]
    pub order_id_width: usize,

    /// ISO 4217 code of the store currency
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "AED")]
    pub currency: String,
}

impl OrdersConfig {
    /// Format used for new order ids.
    #[must_use]
    pub fn id_format(&self) -> OrderIdFormat {
        OrderIdFormat::new(self.order_id_prefix.clone(), self.order_id_width)
    }
}
