//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required for backend checkout and coupon lookup
//! - `MENU_CART_BACKEND_URL` - Base URL of the hosted data backend
//!
//! ## Optional
//! - `MENU_CART_BACKEND_TOKEN` - Backend API token
//! - `MENU_CART_SESSION_FILE` - Saved cart session (default: .menu-cart/session.json)
//! - `MENU_CART_CURRENCY` - Display currency (default: BRL)
//! - `MENU_CART_DELIVERY_FEE` - Base delivery fee (default: 8.90)
//! - `MENU_CART_FREE_DELIVERY_THRESHOLD` - Subtotal for free delivery (default: 50.00)
//! - `MENU_CART_SERVICE_FEE_RATE` - Service fee fraction (default: 0.05)
//! - `MENU_CART_DELIVERY_LEAD_MINUTES` - Estimated delivery lead time (default: 35)
//! - `MENU_CART_COUPON_CACHE_SECS` - Coupon lookup cache TTL (default: 60)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use menu_cart_core::CurrencyCode;
use menu_cart_core::pricing::PricingConfig;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const BACKEND_URL: &str = "MENU_CART_BACKEND_URL";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Hosted backend, if configured
    pub backend: Option<BackendConfig>,
    /// Where the cart session is saved
    pub session_file: PathBuf,
    /// Fees, thresholds and display currency
    pub pricing: PricingConfig,
    /// How long a found coupon stays cached
    pub coupon_cache_ttl: Duration,
}

/// Hosted backend connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL; entity paths are joined onto it
    pub base_url: Url,
    /// Bearer token sent with every request
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend = BackendConfig::from_env()?;
        let session_file = PathBuf::from(get_env_or_default(
            "MENU_CART_SESSION_FILE",
            ".menu-cart/session.json",
        ));

        let pricing = PricingConfig {
            base_delivery_fee: parse_env("MENU_CART_DELIVERY_FEE", "8.90")?,
            free_delivery_threshold: parse_env("MENU_CART_FREE_DELIVERY_THRESHOLD", "50.00")?,
            service_fee_rate: parse_env("MENU_CART_SERVICE_FEE_RATE", "0.05")?,
            currency: parse_env("MENU_CART_CURRENCY", "BRL")?,
            delivery_lead_minutes: parse_env("MENU_CART_DELIVERY_LEAD_MINUTES", "35")?,
        };
        validate_pricing(&pricing)?;

        let coupon_cache_ttl = Duration::from_secs(parse_env("MENU_CART_COUPON_CACHE_SECS", "60")?);

        Ok(Self {
            backend,
            session_file,
            pricing,
            coupon_cache_ttl,
        })
    }

    /// The backend settings, for commands that cannot run without them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no backend URL was configured.
    pub fn require_backend(&self) -> Result<&BackendConfig, ConfigError> {
        self.backend
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar(BACKEND_URL.to_string()))
    }

    /// Display currency shorthand.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.pricing.currency
    }
}

impl BackendConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(raw) = get_optional_env(BACKEND_URL) else {
            return Ok(None);
        };
        Ok(Some(Self {
            base_url: parse_base_url(&raw)?,
            api_token: get_optional_env("MENU_CART_BACKEND_TOKEN").map(SecretString::from),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable; blank counts as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the backend base URL, forcing a trailing slash so joins append.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| ConfigError::InvalidEnvVar(BACKEND_URL.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            BACKEND_URL.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Reject fee settings that would produce negative amounts.
fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    let checks = [
        ("MENU_CART_DELIVERY_FEE", pricing.base_delivery_fee),
        ("MENU_CART_FREE_DELIVERY_THRESHOLD", pricing.free_delivery_threshold),
        ("MENU_CART_SERVICE_FEE_RATE", pricing.service_fee_rate),
    ];
    for (key, value) in checks {
        if value < Decimal::ZERO {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be negative".to_string(),
            ));
        }
    }
    Ok(())
}
