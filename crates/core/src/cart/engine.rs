//! Persisted cart engine.

use tracing::{debug, warn};

use super::{Cart, CartError, CartItemInput};
use crate::catalog::{Favorites, Orderable, VendorProfile};
use crate::customization::{Selection, resolve_customizations};
use crate::persistence::{CartStore, PersistenceError, StoredSession};
use crate::types::{CartItemId, CatalogItemId, VendorId};

/// One shopper's cart and favorites, saved through a [`CartStore`].
///
/// Construct one per session and pass it by reference to whatever drives
/// it. Each mutation runs against a copy of the state, is saved, and only
/// then replaces the live state, so a failed save leaves nothing half-done.
#[derive(Debug)]
pub struct CartEngine<S> {
    session: StoredSession,
    store: S,
}

impl<S: CartStore> CartEngine<S> {
    /// Create an engine with an empty session. Nothing is loaded or saved.
    pub fn new(store: S) -> Self {
        Self {
            session: StoredSession::default(),
            store,
        }
    }

    /// Restore the last saved session, or start empty if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the store fails or holds a cart that
    /// violates cart invariants.
    pub fn restore(store: S) -> Result<Self, PersistenceError> {
        let session = match store.load()? {
            Some(session) => {
                session.validate()?;
                debug!(lines = session.cart.line_count(), "restored cart session");
                session
            }
            None => StoredSession::default(),
        };
        Ok(Self { session, store })
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.session.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &Favorites {
        &self.session.favorites
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// True if the cart is empty or bound to `vendor_id`.
    #[must_use]
    pub fn can_add(&self, vendor_id: &VendorId) -> bool {
        self.session.cart.can_add(vendor_id)
    }

    /// Add a snapshot line to the cart. See [`Cart::add`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] on vendor mismatch, zero quantity, or save failure.
    pub fn add(&mut self, input: CartItemInput) -> Result<CartItemId, CartError> {
        self.commit(|session| session.cart.add(input))
    }

    /// Resolve customizations for a catalog item and add it.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemUnavailable`] if the item cannot be ordered now
    /// - [`CartError::VendorMismatch`] if the item belongs to a vendor other
    ///   than `vendor`, or the cart is bound to another vendor
    /// - [`CartError::Selection`] if the customization picks are invalid
    /// - anything [`CartEngine::add`] returns
    pub fn add_orderable<O: Orderable + ?Sized>(
        &mut self,
        vendor: &VendorProfile,
        item: &O,
        quantity: u32,
        selection: &Selection,
        instructions: Option<String>,
    ) -> Result<CartItemId, CartError> {
        if !item.is_available() {
            return Err(CartError::ItemUnavailable(item.name().to_string()));
        }
        if let Some(owner) = item.vendor_id()
            && *owner != vendor.id
        {
            warn!(vendor_id = %vendor.id, owner = %owner, "rejected item owned by another vendor");
            return Err(CartError::VendorMismatch {
                cart_vendor: vendor.name.clone(),
                attempted: owner.clone(),
            });
        }
        if !self.can_add(&vendor.id) {
            warn!(vendor_id = %vendor.id, "rejected item from a different vendor");
            let cart_vendor = self
                .session
                .cart
                .vendor()
                .map(|v| v.vendor_name.clone())
                .unwrap_or_default();
            return Err(CartError::VendorMismatch {
                cart_vendor,
                attempted: vendor.id.clone(),
            });
        }

        let customizations = resolve_customizations(item.customization_groups(), selection)?;
        let input = CartItemInput::from_orderable(vendor, item, quantity)
            .with_customizations(customizations)
            .with_instructions(instructions);
        self.add(input)
    }

    /// Remove a line. See [`Cart::remove`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the line does not exist or the save fails.
    pub fn remove(&mut self, id: CartItemId) -> Result<(), CartError> {
        self.commit(|session| session.cart.remove(id))
    }

    /// Set a line's quantity; <= 0 removes it. See [`Cart::update_quantity`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the line does not exist or the save fails.
    pub fn update_quantity(&mut self, id: CartItemId, quantity: i64) -> Result<(), CartError> {
        self.commit(|session| session.cart.update_quantity(id, quantity))
    }

    /// Replace a line's special instructions.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the line does not exist or the save fails.
    pub fn set_instructions(
        &mut self,
        id: CartItemId,
        instructions: Option<String>,
    ) -> Result<(), CartError> {
        self.commit(|session| session.cart.set_instructions(id, instructions))
    }

    /// Empty the cart and unbind the vendor. Favorites are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the save fails.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(|session| {
            session.cart.clear();
            Ok(())
        })
    }

    /// Toggle a favorite. Returns `true` if the item is now a favorite.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the save fails.
    pub fn toggle_favorite(&mut self, id: &CatalogItemId) -> Result<bool, CartError> {
        self.commit(|session| Ok(session.favorites.toggle(id)))
    }

    #[must_use]
    pub fn is_favorite(&self, id: &CatalogItemId) -> bool {
        self.session.favorites.contains(id)
    }

    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut StoredSession) -> Result<T, CartError>,
    ) -> Result<T, CartError> {
        let mut next = self.session.clone();
        let out = mutate(&mut next)?;
        self.store.save(&next)?;
        self.session = next;
        Ok(out)
    }
}
