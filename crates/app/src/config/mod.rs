//! Application configuration
//!
//! Every setting can be given as a command line flag or an environment variable; a
//! `.env` file in the working directory is loaded first.

use clap::Args;

pub use crate::config::{
    logging::{LogFormat, LoggingConfig},
    orders::OrdersConfig,
    remote::RemoteConfig,
    storage::StorageConfig,
};

mod logging;
mod orders;
mod remote;
mod storage;

/// Storefront configuration
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Local data settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Remote collaborator endpoints.
    #[command(flatten)]
    pub remote: RemoteConfig,

    /// Order numbering and currency settings.
    #[command(flatten)]
    pub orders: OrdersConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Load a `.env` file if present.
pub fn load_env() {
    // Missing .env files are fine
    _ = dotenvy::dotenv();
}
