//! Tracing subscriber setup for binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "menu_cart=info,menu_cart_core=info,menu_cart_storefront=info";

/// Install the global subscriber.
///
/// Reads `RUST_LOG`, falling back to `default_filter`. Set
/// `MENU_CART_LOG_FORMAT=json` for one JSON object per line. Logs go to
/// stderr so command output on stdout stays clean.
pub fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let json = std::env::var("MENU_CART_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}
