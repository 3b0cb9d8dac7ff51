//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Local data settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding the cart, access grant and local order ledger
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Persisted cart snapshot.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.data_dir.join("cart.json")
    }

    /// Persisted access grant.
    #[must_use]
    pub fn access_path(&self) -> PathBuf {
        self.data_dir.join("access.json")
    }

    /// Local order ledger, used when no remote order sink is configured.
    #[must_use]
    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join("orders.json")
    }

    /// Catalog file read when neither a catalog URL nor a catalog file is configured.
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("catalog.json")
    }
}
