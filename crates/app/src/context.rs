//! App Context

use std::sync::Arc;

use reqwest::Client;
use rusty_money::iso::{self, Currency};
use storefront::cart::Cart;
use thiserror::Error;

use crate::{
    access::{AccessGate, AccessService, HttpAccessGate},
    catalog::{CatalogProvider, FileCatalog, HttpCatalog},
    checkout::CheckoutService,
    config::AppConfig,
    notify::{HttpNotifier, Notifier},
    orders::{HttpOrderSink, HttpOrderSinkConfig, LocalOrderSink, OrderSink},
    promo::{HttpPromoFeed, PromoProvider},
    session::{CartSession, CartStore},
    storage::JsonFile,
};

/// Errors that can occur while wiring the application together.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The HTTP client could not be built.
    #[error("failed to build http client")]
    Http(#[source] reqwest::Error),

    /// The configured currency is not an ISO 4217 code.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),
}

/// Collaborators shared by every command.
#[derive(Clone)]
pub struct AppContext {
    /// Product catalog
    pub catalog: Arc<dyn CatalogProvider>,

    /// Order sink
    pub orders: Arc<dyn OrderSink>,

    /// Order notification channel, if configured
    pub notifier: Option<Arc<dyn Notifier>>,

    /// Banner image feed, if configured
    pub promo: Option<Arc<dyn PromoProvider>>,

    /// Access gate and stored grant
    pub access: AccessService,

    /// Cart persistence
    pub cart_store: Arc<dyn CartStore>,

    /// Store currency used when rendering amounts
    pub currency: &'static Currency,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("access", &self.access)
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// Unset remote endpoints fall back to local behaviour: a catalog file in the
    /// data directory, the local order ledger, no notifications and open access.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built or the currency is unknown.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let currency = iso::find(&config.orders.currency)
            .ok_or_else(|| AppInitError::UnknownCurrency(config.orders.currency.clone()))?;

        let http = Client::builder()
            .timeout(config.remote.http_timeout())
            .build()
            .map_err(AppInitError::Http)?;

        let remote = &config.remote;
        let storage = &config.storage;

        let catalog: Arc<dyn CatalogProvider> = match (&remote.catalog_url, &remote.catalog_file) {
            (Some(url), _) => Arc::new(HttpCatalog::new(url.clone(), http.clone())),
            (None, Some(path)) => Arc::new(FileCatalog::new(path.clone())),
            (None, None) => Arc::new(FileCatalog::new(storage.catalog_path())),
        };

        let orders: Arc<dyn OrderSink> = match &remote.order_sink_url {
            Some(url) => Arc::new(HttpOrderSink::new(
                HttpOrderSinkConfig {
                    submit_url: url.clone(),
                    history_url: remote.order_history_url.clone(),
                },
                http.clone(),
            )),
            None => Arc::new(LocalOrderSink::open(
                JsonFile::new(storage.orders_path()),
                config.orders.id_format(),
            )),
        };

        let notifier = remote
            .notify_url
            .as_ref()
            .map(|url| Arc::new(HttpNotifier::new(url.clone(), http.clone())) as Arc<dyn Notifier>);

        let promo = remote.promo_feed_url.as_ref().map(|url| {
            Arc::new(HttpPromoFeed::new(
                url.clone(),
                remote.promo_fallback_image.clone(),
                http.clone(),
            )) as Arc<dyn PromoProvider>
        });

        let gate = remote
            .access_gate_url
            .as_ref()
            .map(|url| Arc::new(HttpAccessGate::new(url.clone(), http.clone())) as Arc<dyn AccessGate>);

        Ok(Self {
            catalog,
            orders,
            notifier,
            promo,
            access: AccessService::new(gate, JsonFile::new(storage.access_path())),
            cart_store: Arc::new(JsonFile::<Cart>::new(storage.cart_path())),
            currency,
        })
    }

    /// Restore the shopper's cart.
    pub fn cart_session(&self) -> CartSession {
        CartSession::restore(Arc::clone(&self.cart_store))
    }

    /// Start a checkout against the configured order sink.
    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(Arc::clone(&self.orders), self.notifier.clone())
    }
}
