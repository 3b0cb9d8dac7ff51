//! Promotional image provider.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use storefront::promo::promo_image_from_csv;
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur while fetching the promo feed.
#[derive(Debug, Error)]
pub enum PromoError {
    /// An HTTP transport or body error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed returned a non-2xx response.
    #[error("unexpected response from promo feed: {0}")]
    UnexpectedResponse(String),
}

/// Source of the storefront banner image.
#[automock]
#[async_trait]
pub trait PromoProvider: Send + Sync {
    /// Banner image URL, if there is one.
    async fn promo_image(&self) -> Option<String>;
}

/// Promo image read from a CSV export over HTTP.
///
/// When the feed cannot be fetched the fallback image, if any, is used instead. A
/// feed whose first cell is not a URL has no image.
#[derive(Debug, Clone)]
pub struct HttpPromoFeed {
    url: String,
    fallback: Option<String>,
    http: Client,
}

impl HttpPromoFeed {
    /// Create a feed reading from `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, fallback: Option<String>, http: Client) -> Self {
        Self {
            url: url.into(),
            fallback,
            http,
        }
    }

    async fn fetch(&self) -> Result<String, PromoError> {
        let response = self.http.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PromoError::UnexpectedResponse(format!(
                "promo request failed with status {status}: {text}"
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PromoProvider for HttpPromoFeed {
    async fn promo_image(&self) -> Option<String> {
        match self.fetch().await {
            Ok(csv) => {
                let image = promo_image_from_csv(&csv);

                debug!(url = %self.url, found = image.is_some(), "fetched promo feed");

                image
            }
            Err(source) => {
                error!(url = %self.url, "failed to fetch promo feed: {source}");

                self.fallback.clone()
            }
        }
    }
}
