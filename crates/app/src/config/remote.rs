//! Remote Endpoints Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

/// Remote collaborator endpoints. Unset endpoints fall back to local behaviour.
#[derive(Debug, Clone, Args)]
pub struct RemoteConfig {
    /// Catalog endpoint returning a JSON array of products
    #[arg(long, env = "STOREFRONT_CATALOG_URL", conflicts_with = "catalog_file")]
    pub catalog_url: Option<String>,

    /// Catalog JSON file, used instead of a catalog endpoint
    #[arg(long, env = "STOREFRONT_CATALOG_FILE")]
    pub catalog_file: Option<PathBuf>,

    /// Order sink endpoint; orders are kept in the local ledger when unset
    #[arg(long, env = "STOREFRONT_ORDER_SINK_URL")]
    pub order_sink_url: Option<String>,

    /// Order history endpoint of the remote order sink
    #[arg(long, env = "STOREFRONT_ORDER_HISTORY_URL", requires = "order_sink_url")]
    pub order_history_url: Option<String>,

    /// Endpoint notified with the invoice of every confirmed order
    #[arg(long, env = "STOREFRONT_NOTIFY_URL")]
    pub notify_url: Option<String>,

    /// Password check endpoint; access is open when unset
    #[arg(long, env = "STOREFRONT_ACCESS_GATE_URL")]
    pub access_gate_url: Option<String>,

    /// CSV feed whose first cell is the storefront banner image
    #[arg(long, env = "STOREFRONT_PROMO_FEED_URL")]
    pub promo_feed_url: Option<String>,

    /// Banner image used when the promo feed cannot be fetched
    #[arg(long, env = "STOREFRONT_PROMO_FALLBACK_IMAGE", requires = "promo_feed_url")]
    pub promo_fallback_image: Option<String>,

    /// Timeout for remote requests in seconds
    #[arg(long, env = "STOREFRONT_HTTP_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub http_timeout_seconds: u64,
}

impl RemoteConfig {
    /// Timeout applied to every remote request.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}
