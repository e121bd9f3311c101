//! Command implementations.
//!
//! Every command opens a [`Session`]: configuration from the environment,
//! the catalog file, and the cart restored from the session file.

pub mod cart;
pub mod checkout;

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::Utc;
use menu_cart_core::cart::CartEngine;
use menu_cart_storefront::CheckoutService;
use menu_cart_storefront::backend::HostedBackendClient;
use menu_cart_storefront::config::StorefrontConfig;
use menu_cart_storefront::persistence::JsonFileStore;
use tracing::{debug, info};

use crate::catalog::CatalogFile;

/// Everything a command works with.
pub struct Session {
    pub config: StorefrontConfig,
    pub catalog: CatalogFile,
    pub checkout: CheckoutService<JsonFileStore>,
}

impl Session {
    /// Load configuration, the catalog and the saved cart.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the catalog cannot be
    /// loaded, or the saved cart cannot be restored.
    pub fn open(catalog: &Path, session_file: Option<PathBuf>) -> Result<Self, Box<dyn Error>> {
        let mut config = StorefrontConfig::from_env()?;
        if let Some(path) = session_file {
            config.session_file = path;
        }

        let catalog = CatalogFile::load(catalog)?;
        let store = JsonFileStore::new(config.session_file.clone());
        let engine = CartEngine::restore(store)?;
        debug!(
            session = %config.session_file.display(),
            lines = engine.cart().line_count(),
            "session opened"
        );

        let checkout = CheckoutService::new(engine, config.pricing);
        Ok(Self {
            config,
            catalog,
            checkout,
        })
    }

    /// Hosted backend client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend is configured or the client cannot be built.
    pub fn backend(&self) -> Result<HostedBackendClient, Box<dyn Error>> {
        let backend = self.config.require_backend()?;
        Ok(HostedBackendClient::new(backend)?)
    }

    /// Apply a coupon for this invocation only; it is never saved.
    ///
    /// A command looks up at most one code, so the backend is queried
    /// directly rather than through a coupon cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is not configured or the coupon is rejected.
    pub async fn apply_coupon(&mut self, code: Option<&str>) -> Result<(), Box<dyn Error>> {
        let Some(code) = code else {
            return Ok(());
        };

        let backend = self.backend()?;
        let discount = self.checkout.apply_coupon(&backend, code, Utc::now()).await?;
        info!(%discount, "coupon applied for this command");
        Ok(())
    }
}
