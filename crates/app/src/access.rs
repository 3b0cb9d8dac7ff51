//! Access gate.
//!
//! A password is checked once against a remote gate; success issues an
//! [`AccessGrant`] that is stored and honoured until it expires. Without a gate
//! endpoint the storefront is open.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use storefront::access::{AccessGrant, DEFAULT_GRANT_TTL};
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{JsonFile, StoreError};

/// Errors that can occur while checking access.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The gate refused the password.
    #[error("incorrect password")]
    Denied,

    /// An HTTP transport or body error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gate returned a non-2xx response.
    #[error("unexpected response from access gate: {0}")]
    UnexpectedResponse(String),

    /// The grant could not be removed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Remote password check.
#[automock]
#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Whether `password` is accepted.
    async fn check_password(&self, password: &str) -> Result<bool, AccessError>;
}

/// HTTP client for a password gate answering `{"success": bool}`.
#[derive(Debug, Clone)]
pub struct HttpAccessGate {
    url: String,
    http: Client,
}

impl HttpAccessGate {
    /// Create a gate client posting to `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GateResponse {
    #[serde(default)]
    success: bool,
}

#[async_trait]
impl AccessGate for HttpAccessGate {
    async fn check_password(&self, password: &str) -> Result<bool, AccessError> {
        let body = serde_json::json!({ "password": password });

        let response = self.http.post(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(AccessError::UnexpectedResponse(format!(
                "password check failed with status {status}: {text}"
            )));
        }

        let parsed: GateResponse = response.json().await?;

        Ok(parsed.success)
    }
}

/// Login, logout and grant checks against a stored [`AccessGrant`].
#[derive(Clone)]
pub struct AccessService {
    gate: Option<Arc<dyn AccessGate>>,
    grants: JsonFile<AccessGrant>,
    ttl: SignedDuration,
}

impl fmt::Debug for AccessService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessService")
            .field("gated", &self.gate.is_some())
            .field("grants", &self.grants)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl AccessService {
    /// Create a service. `gate` of `None` leaves the storefront open.
    pub fn new(gate: Option<Arc<dyn AccessGate>>, grants: JsonFile<AccessGrant>) -> Self {
        Self {
            gate,
            grants,
            ttl: DEFAULT_GRANT_TTL,
        }
    }

    /// Override how long new grants last.
    #[must_use]
    pub fn with_ttl(mut self, ttl: SignedDuration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Whether a password gate is configured.
    pub fn is_gated(&self) -> bool {
        self.gate.is_some()
    }

    /// Check `password` and store a new grant on success.
    ///
    /// Storing the grant is best-effort: a grant that cannot be written is still
    /// returned, it just will not outlive this process.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Denied`] for a wrong password, or a transport error.
    pub async fn login(&self, password: &str, now: Timestamp) -> Result<AccessGrant, AccessError> {
        if let Some(gate) = &self.gate
            && !gate.check_password(password).await?
        {
            warn!("access denied");
            return Err(AccessError::Denied);
        }

        let grant = AccessGrant::issue(now, self.ttl);

        if let Err(error) = self.grants.save(&grant) {
            warn!("failed to persist access grant: {error}");
        }

        info!(expiry = %grant.expiry, "access granted");

        Ok(grant)
    }

    /// The stored grant, if it is still valid at `now`.
    ///
    /// Expired grants are discarded.
    pub fn current(&self, now: Timestamp) -> Option<AccessGrant> {
        let grant = self.grants.load()?;

        if grant.is_valid_at(now) {
            return Some(grant);
        }

        info!(expiry = %grant.expiry, "discarding expired access grant");

        if let Err(error) = self.grants.clear() {
            warn!("failed to discard access grant: {error}");
        }

        None
    }

    /// Whether the storefront may be used at `now`.
    pub fn is_authorized(&self, now: Timestamp) -> bool {
        !self.is_gated() || self.current(now).is_some()
    }

    /// Discard the stored grant.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Store`] if the grant file cannot be removed.
    pub fn logout(&self) -> Result<(), AccessError> {
        self.grants.clear()?;

        Ok(())
    }
}
