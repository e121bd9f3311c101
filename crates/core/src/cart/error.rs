//! Cart error types.

use thiserror::Error;

use crate::customization::SelectionError;
use crate::persistence::PersistenceError;
use crate::types::{CartItemId, VendorId};

/// Errors that can occur when mutating the cart.
///
/// None of these leave the cart partially modified: the mutation either
/// fully applies (and is persisted) or nothing changes.
#[derive(Debug, Error)]
pub enum CartError {
    /// The item belongs to a different vendor than the one the cart is bound to.
    #[error("you can only add items from the same vendor ({cart_vendor})")]
    VendorMismatch {
        /// Name of the vendor the cart is bound to.
        cart_vendor: String,
        /// Vendor of the rejected item.
        attempted: VendorId,
    },

    /// Quantity must be at least 1 when adding.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// A quantity would exceed what a cart line can hold.
    #[error("quantity too large (at most {max} per line)")]
    QuantityTooLarge {
        /// Largest quantity a line can hold.
        max: u32,
    },

    /// No cart line with this ID.
    #[error("cart item not found: {0}")]
    ItemNotFound(CartItemId),

    /// The catalog item is not available right now.
    #[error("item not available right now: {0}")]
    ItemUnavailable(String),

    /// The customization selection is invalid for the item.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Saving the new cart state failed; the in-memory cart is unchanged.
    #[error("failed to save cart: {0}")]
    Persistence(#[from] PersistenceError),
}
