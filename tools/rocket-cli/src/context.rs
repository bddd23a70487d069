//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use rocket_cache::{Cache, FileStore};
use rocket_cart::CartStore;
use rocket_data::{ApiClient, CatalogLookup, FixtureApi, StockLookup};
use tracing::debug;

use crate::config::CliConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    catalog: Arc<dyn CatalogLookup>,
    stock: Arc<dyn StockLookup>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        let (catalog, stock) = Self::connect(&config, &cwd)?;
        Ok(Self {
            config,
            output,
            cwd,
            catalog,
            stock,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["rocket.toml", ".rocket.toml", "rocket.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Build the catalog and stock lookups the config asks for.
    #[allow(clippy::type_complexity)]
    fn connect(
        config: &CliConfig,
        cwd: &Path,
    ) -> Result<(Arc<dyn CatalogLookup>, Arc<dyn StockLookup>)> {
        if let Some(fixture) = &config.api.fixture {
            let path = resolve(cwd, fixture);
            let api = Arc::new(
                FixtureApi::load(&path)
                    .with_context(|| format!("Failed to load fixture: {}", path.display()))?,
            );
            debug!(path = %path.display(), "using fixture api");
            let catalog: Arc<dyn CatalogLookup> = api.clone();
            let stock: Arc<dyn StockLookup> = api;
            return Ok((catalog, stock));
        }

        let api = Arc::new(
            ApiClient::new(config.api.base_url.as_str())
                .with_context(|| format!("Invalid API URL: {}", config.api.base_url))?,
        );
        debug!(base_url = %config.api.base_url, "using http api");
        let catalog: Arc<dyn CatalogLookup> = api.clone();
        let stock: Arc<dyn StockLookup> = api;
        Ok((catalog, stock))
    }

    /// Catalog lookup for listing views.
    pub fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    /// Open the cart store, reading the persisted cart.
    ///
    /// Rejected operations are shown as toasts through the output handler.
    pub fn open_store(&self) -> Result<CartStore> {
        let path = self.resolve_path(&self.config.storage.path);
        let backend = FileStore::open(&path)
            .with_context(|| format!("Failed to open storage: {}", path.display()))?;
        debug!(path = %path.display(), "opened cart storage");

        Ok(CartStore::open(
            self.config.store_config(),
            self.catalog.clone(),
            self.stock.clone(),
            Cache::new(backend),
        )
        .with_notifier(Arc::new(self.output.clone())))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}
