//! Store configuration.

use rocket_cache::cache_key;
use serde::{Deserialize, Serialize};

/// Namespace the storefront uses for its local storage keys.
pub const STORAGE_NAMESPACE: &str = "@RocketShoes";

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key the cart snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    cache_key!(STORAGE_NAMESPACE, "cart")
}
