//! Hosted data backend: coupon lookup and order creation.
//!
//! # Architecture
//!
//! - [`CouponLookup`] and [`OrderBackend`] are the seams checkout depends on
//! - [`HostedBackendClient`] implements both over the backend's REST entity API
//! - [`CachedCouponLookup`] wraps any lookup with a short-lived `moka` cache
//!
//! Tests swap in in-memory implementations of the traits; nothing here is
//! retried automatically.

mod cache;
mod client;

pub use cache::CachedCouponLookup;
pub use client::HostedBackendClient;

use menu_cart_core::coupon::{Coupon, CouponCode};
use menu_cart_core::order::OrderPayload;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build a request or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Finds coupons by normalized code.
pub trait CouponLookup {
    /// The active coupon with this code, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the lookup itself failed.
    async fn find_coupon_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, BackendError>;
}

/// Accepts assembled orders.
pub trait OrderBackend {
    /// Persist an order and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the order was not accepted.
    async fn create_order(&self, order: &OrderPayload) -> Result<OrderRecord, BackendError>;
}

impl<T: CouponLookup> CouponLookup for &T {
    async fn find_coupon_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, BackendError> {
        (**self).find_coupon_by_code(code).await
    }
}

impl<T: OrderBackend> OrderBackend for &T {
    async fn create_order(&self, order: &OrderPayload) -> Result<OrderRecord, BackendError> {
        (**self).create_order(order).await
    }
}

/// An order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Backend-assigned record id.
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub tracking_code: Option<String>,
}
