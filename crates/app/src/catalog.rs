//! Catalog providers.
//!
//! Providers never fail: transport and parse errors are logged and yield an empty
//! catalog, and rows that cannot be coerced into products are skipped.

use std::{fs, io, path::PathBuf};

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde_json::Value;
use storefront::products::{Product, parse_catalog_rows};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors that can occur while fetching a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An HTTP transport or body error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx response.
    #[error("unexpected response from catalog: {0}")]
    UnexpectedResponse(String),

    /// The catalog file could not be read.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] io::Error),

    /// The catalog file is not JSON.
    #[error("catalog file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of the product catalog.
#[automock]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Every valid product, in catalog order.
    async fn products(&self) -> Vec<Product>;
}

/// Catalog served as a JSON array over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    url: String,
    http: Client,
}

impl HttpCatalog {
    /// Create a catalog reading from `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    async fn fetch(&self) -> Result<Value, CatalogError> {
        let response = self.http.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(CatalogError::UnexpectedResponse(format!(
                "catalog request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalog {
    async fn products(&self) -> Vec<Product> {
        match self.fetch().await {
            Ok(payload) => {
                let products = products_from(&payload, &self.url);

                debug!(url = %self.url, count = products.len(), "fetched catalog");

                products
            }
            Err(source) => {
                error!(url = %self.url, "failed to fetch catalog: {source}");

                Vec::new()
            }
        }
    }
}

/// Catalog stored as a JSON array in a local file.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// Create a catalog reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Value, CatalogError> {
        let raw = fs::read_to_string(&self.path)?;

        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl CatalogProvider for FileCatalog {
    async fn products(&self) -> Vec<Product> {
        match self.read() {
            Ok(payload) => products_from(&payload, &self.path.display().to_string()),
            Err(source) => {
                error!(path = %self.path.display(), "failed to read catalog: {source}");

                Vec::new()
            }
        }
    }
}

/// Valid products from `payload`, logging the rows that were dropped.
fn products_from(payload: &Value, source: &str) -> Vec<Product> {
    let parsed = parse_catalog_rows(payload);

    if parsed.rejected > 0 {
        debug!(%source, rejected = parsed.rejected, "skipped invalid catalog rows");
    }

    for id in &parsed.duplicates {
        warn!(%source, %id, "ignoring catalog row with duplicate product id");
    }

    parsed.products
}
