//! Unified checkout error handling.
//!
//! Every storefront operation returns [`CheckoutError`]. Callers use
//! [`CheckoutError::kind`] to decide how to present it: validation and
//! business-rule errors are shown as-is, external errors invite a retry.

use menu_cart_core::cart::CartError;
use menu_cart_core::coupon::CouponError;
use menu_cart_core::order::OrderError;
use menu_cart_core::persistence::PersistenceError;
use thiserror::Error;

use crate::backend::BackendError;
use crate::chat::ChatLinkError;

/// How an error should be handled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was incomplete or inconsistent; ask the shopper to fix it.
    Validation,
    /// The request was well-formed but a store rule refused it.
    BusinessRule,
    /// Storage or the network failed; state is unchanged and a retry may work.
    External,
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Coupon was rejected.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// Order could not be assembled.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Hosted backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Chat deep link could not be built.
    #[error(transparent)]
    ChatLink(#[from] ChatLinkError),
}

impl From<PersistenceError> for CheckoutError {
    fn from(err: PersistenceError) -> Self {
        Self::Cart(CartError::Persistence(err))
    }
}

impl CheckoutError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Cart(err) => match err {
                CartError::VendorMismatch { .. }
                | CartError::InvalidQuantity
                | CartError::QuantityTooLarge { .. }
                | CartError::Selection(_) => ErrorKind::Validation,
                CartError::ItemNotFound(_) | CartError::ItemUnavailable(_) => {
                    ErrorKind::BusinessRule
                }
                CartError::Persistence(_) => ErrorKind::External,
            },
            Self::Coupon(CouponError::EmptyCode) | Self::Order(_) | Self::ChatLink(_) => {
                ErrorKind::Validation
            }
            Self::Coupon(_) => ErrorKind::BusinessRule,
            Self::Backend(_) => ErrorKind::External,
        }
    }

    /// True if retrying the same action may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::External)
    }
}

/// Result type alias for `CheckoutError`.
pub type Result<T> = std::result::Result<T, CheckoutError>;
