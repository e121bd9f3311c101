//! Single-vendor cart.
//!
//! [`Cart`] is the plain state: an ordered list of lines plus the vendor the
//! cart is bound to. It enforces its invariants on every transition:
//!
//! - all lines share the cart's vendor (the cart is bound on first add and
//!   unbound when it becomes empty)
//! - no line has quantity 0 (setting a quantity <= 0 removes the line)
//! - adding an item whose catalog ID and customization selection match an
//!   existing line increments that line instead of appending
//!
//! [`CartEngine`] wraps a `Cart` with favorites and a [`CartStore`] so every
//! successful mutation is persisted.
//!
//! [`CartStore`]: crate::persistence::CartStore

mod engine;
mod error;

pub use engine::CartEngine;
pub use error::CartError;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Orderable, VendorProfile};
use crate::customization::Customization;
use crate::types::{CartItemId, CatalogItemId, VendorId};

/// Vendor a non-empty cart is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorBinding {
    pub vendor_id: VendorId,
    pub vendor_name: String,
}

/// Input for adding a line to the cart.
///
/// Name, price and vendor are snapshots: later catalog edits do not change
/// lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemInput {
    pub catalog_item_id: CatalogItemId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub image_url: Option<String>,
    pub customizations: Vec<Customization>,
    pub special_instructions: Option<String>,
}

impl CartItemInput {
    /// Snapshot an orderable item for the given vendor, without customizations.
    ///
    /// The line is labelled with `vendor`; callers that accept items from
    /// outside a single catalog should go through [`CartEngine::add_orderable`],
    /// which checks the item's own vendor first.
    #[must_use]
    pub fn from_orderable<O: Orderable + ?Sized>(
        vendor: &VendorProfile,
        item: &O,
        quantity: u32,
    ) -> Self {
        Self {
            catalog_item_id: item.catalog_item_id().clone(),
            name: item.name().to_string(),
            unit_price: item.unit_price(),
            quantity,
            vendor_id: vendor.id.clone(),
            vendor_name: vendor.name.clone(),
            image_url: item.image_url().map(str::to_string),
            customizations: Vec::new(),
            special_instructions: None,
        }
    }

    #[must_use]
    pub fn with_customizations(mut self, customizations: Vec<Customization>) -> Self {
        self.customizations = customizations;
        self
    }

    /// Attach special instructions; blank text is treated as none.
    #[must_use]
    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.special_instructions = normalize_instructions(instructions);
        self
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub catalog_item_id: CatalogItemId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub vendor_id: VendorId,
    pub vendor_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub customizations: Vec<Customization>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl CartItem {
    /// Unit price plus all customization surcharges.
    #[must_use]
    pub fn unit_price_with_customizations(&self) -> Decimal {
        self.unit_price
            + self
                .customizations
                .iter()
                .map(|c| c.surcharge)
                .sum::<Decimal>()
    }

    /// Whether this line holds the same item with the same customization picks.
    ///
    /// Customizations are compared as name-sorted (name, option set) pairs, so
    /// the order groups or options were chosen in does not matter.
    #[must_use]
    pub fn matches(&self, catalog_item_id: &CatalogItemId, customizations: &[Customization]) -> bool {
        self.catalog_item_id == *catalog_item_id
            && selection_key(&self.customizations) == selection_key(customizations)
    }
}

fn selection_key(customizations: &[Customization]) -> Vec<(&str, &std::collections::BTreeSet<String>)> {
    let mut key: Vec<_> = customizations
        .iter()
        .filter(|c| !c.selected_options.is_empty())
        .map(|c| (c.name.as_str(), &c.selected_options))
        .collect();
    key.sort_unstable();
    key
}

fn normalize_instructions(instructions: Option<String>) -> Option<String> {
    instructions
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The cart aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(default)]
    vendor: Option<VendorBinding>,
}

impl Cart {
    /// Create an empty, unbound cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Vendor the cart is bound to, if any.
    #[must_use]
    pub const fn vendor(&self) -> Option<&VendorBinding> {
        self.vendor.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    #[must_use]
    pub fn get(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// True if the cart is empty or already bound to `vendor_id`.
    #[must_use]
    pub fn can_add(&self, vendor_id: &VendorId) -> bool {
        self.vendor
            .as_ref()
            .is_none_or(|bound| bound.vendor_id == *vendor_id)
    }

    /// Add a line, merging into an identical existing line.
    ///
    /// Returns the ID of the line that now holds the item.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `input.quantity` is 0
    /// - [`CartError::QuantityTooLarge`] if merging would overflow the line
    /// - [`CartError::VendorMismatch`] if the cart is bound to another vendor
    pub fn add(&mut self, input: CartItemInput) -> Result<CartItemId, CartError> {
        if input.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if let Some(bound) = &self.vendor
            && bound.vendor_id != input.vendor_id
        {
            return Err(CartError::VendorMismatch {
                cart_vendor: bound.vendor_name.clone(),
                attempted: input.vendor_id,
            });
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.matches(&input.catalog_item_id, &input.customizations))
        {
            existing.quantity = existing
                .quantity
                .checked_add(input.quantity)
                .ok_or(CartError::QuantityTooLarge { max: u32::MAX })?;
            if let Some(instructions) = normalize_instructions(input.special_instructions) {
                existing.special_instructions = Some(instructions);
            }
            debug!(item_id = %existing.id, quantity = existing.quantity, "merged into existing cart line");
            return Ok(existing.id);
        }

        let id = CartItemId::generate();
        if self.vendor.is_none() {
            self.vendor = Some(VendorBinding {
                vendor_id: input.vendor_id.clone(),
                vendor_name: input.vendor_name.clone(),
            });
        }
        self.items.push(CartItem {
            id,
            catalog_item_id: input.catalog_item_id,
            name: input.name,
            unit_price: input.unit_price,
            quantity: input.quantity,
            vendor_id: input.vendor_id,
            vendor_name: input.vendor_name,
            image_url: input.image_url,
            customizations: input.customizations,
            special_instructions: normalize_instructions(input.special_instructions),
        });
        debug!(item_id = %id, "appended cart line");
        Ok(id)
    }

    /// Remove a line. Unbinds the vendor if the cart becomes empty.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this ID.
    pub fn remove(&mut self, id: CartItemId) -> Result<(), CartError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(CartError::ItemNotFound(id))?;
        self.items.remove(pos);
        if self.items.is_empty() {
            self.vendor = None;
        }
        debug!(item_id = %id, "removed cart line");
        Ok(())
    }

    /// Set a line's quantity. A quantity of 0 or less removes the line.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`] if no line has this ID
    /// - [`CartError::QuantityTooLarge`] if `quantity` does not fit a line
    pub fn update_quantity(&mut self, id: CartItemId, quantity: i64) -> Result<(), CartError> {
        let Ok(quantity) = u32::try_from(quantity) else {
            if quantity <= 0 {
                return self.remove(id);
            }
            return Err(CartError::QuantityTooLarge { max: u32::MAX });
        };
        if quantity == 0 {
            return self.remove(id);
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(CartError::ItemNotFound(id))?;
        item.quantity = quantity;
        debug!(item_id = %id, quantity, "updated cart line quantity");
        Ok(())
    }

    /// Replace a line's special instructions.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this ID.
    pub fn set_instructions(
        &mut self,
        id: CartItemId,
        instructions: Option<String>,
    ) -> Result<(), CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(CartError::ItemNotFound(id))?;
        item.special_instructions = normalize_instructions(instructions);
        Ok(())
    }

    /// Empty the cart and unbind the vendor. Idempotent.
    pub fn clear(&mut self) {
        self.items.clear();
        self.vendor = None;
    }

    /// Check the invariants of a cart loaded from outside (e.g., storage).
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.vendor, self.items.is_empty()) {
            (None, true) => return Ok(()),
            (Some(_), true) => return Err("empty cart is bound to a vendor".to_string()),
            (None, false) => return Err("non-empty cart has no vendor".to_string()),
            (Some(_), false) => {}
        }

        for item in &self.items {
            if item.quantity == 0 {
                return Err(format!("cart line {} has quantity 0", item.id));
            }
            if !self.can_add(&item.vendor_id) {
                return Err(format!(
                    "cart line {} belongs to vendor {}",
                    item.id, item.vendor_id
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn input(catalog_id: &str, vendor: &str, cents: i64, quantity: u32) -> CartItemInput {
        CartItemInput {
            catalog_item_id: CatalogItemId::new(catalog_id),
            name: format!("Item {catalog_id}"),
            unit_price: Decimal::new(cents, 2),
            quantity,
            vendor_id: VendorId::new(vendor),
            vendor_name: format!("Vendor {vendor}"),
            image_url: None,
            customizations: Vec::new(),
            special_instructions: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::fixtures::input;
    use super::*;

    fn customization(name: &str, options: &[&str], cents: i64) -> Customization {
        Customization {
            name: name.to_string(),
            selected_options: options.iter().map(|o| (*o).to_string()).collect::<BTreeSet<_>>(),
            surcharge: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_first_add_binds_vendor() {
        let mut cart = Cart::new();
        assert!(cart.vendor().is_none());

        cart.add(input("burger-1", "v1", 2590, 1)).unwrap();

        let bound = cart.vendor().unwrap();
        assert_eq!(bound.vendor_id.as_str(), "v1");
        assert_eq!(bound.vendor_name, "Vendor v1");
    }

    #[test]
    fn test_identical_add_merges() {
        let mut cart = Cart::new();
        let first = cart.add(input("burger-1", "v1", 2590, 1)).unwrap();
        let second = cart.add(input("burger-1", "v1", 2590, 2)).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_merge_ignores_option_order() {
        let mut cart = Cart::new();
        let a = input("burger-1", "v1", 2590, 1).with_customizations(vec![
            customization("Size", &["Large"], 500),
            customization("Extras", &["Bacon", "Cheese"], 700),
        ]);
        let b = input("burger-1", "v1", 2590, 1).with_customizations(vec![
            customization("Extras", &["Cheese", "Bacon"], 700),
            customization("Size", &["Large"], 500),
        ]);

        cart.add(a).unwrap();
        cart.add(b).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_different_customization_creates_new_line() {
        let mut cart = Cart::new();
        cart.add(
            input("burger-1", "v1", 2590, 1)
                .with_customizations(vec![customization("Size", &["Large"], 500)]),
        )
        .unwrap();
        cart.add(
            input("burger-1", "v1", 2590, 1)
                .with_customizations(vec![customization("Size", &["Small"], 0)]),
        )
        .unwrap();
        cart.add(input("burger-1", "v1", 2590, 1)).unwrap();

        assert_eq!(cart.line_count(), 3);
    }

    #[test]
    fn test_vendor_mismatch_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add(input("burger-1", "v1", 2590, 1)).unwrap();
        let before = cart.clone();

        let err = cart.add(input("pizza-1", "v2", 4000, 1)).unwrap_err();
        assert!(matches!(err, CartError::VendorMismatch { ref attempted, .. } if attempted.as_str() == "v2"));
        assert_eq!(cart, before);
        assert!(!cart.can_add(&VendorId::new("v2")));
        assert!(cart.can_add(&VendorId::new("v1")));
    }

    #[test]
    fn test_zero_quantity_add_rejected() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(input("burger-1", "v1", 2590, 0)),
            Err(CartError::InvalidQuantity)
        ));
        assert!(cart.is_empty());
        assert!(cart.vendor().is_none());
    }

    #[test]
    fn test_merge_overflow_rejected_and_cart_unchanged() {
        let mut cart = Cart::new();
        let id = cart.add(input("burger-1", "v1", 2590, u32::MAX)).unwrap();
        let before = cart.clone();

        assert!(matches!(
            cart.add(input("burger-1", "v1", 2590, 5)),
            Err(CartError::QuantityTooLarge { max: u32::MAX })
        ));
        assert_eq!(cart, before);
        assert_eq!(cart.get(id).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_update_quantity_beyond_line_limit_rejected() {
        let mut cart = Cart::new();
        let id = cart.add(input("burger-1", "v1", 2590, 2)).unwrap();

        assert!(matches!(
            cart.update_quantity(id, i64::from(u32::MAX) + 1),
            Err(CartError::QuantityTooLarge { .. })
        ));
        assert_eq!(cart.get(id).unwrap().quantity, 2);
    }

    #[test]
    fn test_update_quantity_is_absolute() {
        let mut cart = Cart::new();
        let id = cart.add(input("burger-1", "v1", 2590, 3)).unwrap();
        cart.update_quantity(id, 5).unwrap();
        assert_eq!(cart.get(id).unwrap().quantity, 5);
    }

    #[test]
    fn test_update_quantity_to_zero_or_negative_removes() {
        let mut cart = Cart::new();
        let a = cart.add(input("a", "v1", 100, 1)).unwrap();
        let b = cart.add(input("b", "v1", 100, 1)).unwrap();

        cart.update_quantity(a, 0).unwrap();
        assert!(cart.get(a).is_none());

        cart.update_quantity(b, -3).unwrap();
        assert!(cart.is_empty());
        assert!(cart.vendor().is_none());
    }

    #[test]
    fn test_removing_last_item_unbinds_vendor() {
        let mut cart = Cart::new();
        let id = cart.add(input("burger-1", "v1", 2590, 1)).unwrap();
        cart.remove(id).unwrap();

        assert!(cart.vendor().is_none());
        cart.add(input("pizza-1", "v2", 4000, 1)).unwrap();
        assert_eq!(cart.vendor().unwrap().vendor_id.as_str(), "v2");
    }

    #[test]
    fn test_remove_unknown_item() {
        let mut cart = Cart::new();
        let id = CartItemId::generate();
        assert!(matches!(cart.remove(id), Err(CartError::ItemNotFound(missing)) if missing == id));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(input("burger-1", "v1", 2590, 1)).unwrap();
        cart.clear();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.vendor().is_none());
    }

    #[test]
    fn test_merge_keeps_or_replaces_instructions() {
        let mut cart = Cart::new();
        let id = cart
            .add(input("burger-1", "v1", 2590, 1).with_instructions(Some("no onions".into())))
            .unwrap();

        cart.add(input("burger-1", "v1", 2590, 1).with_instructions(Some("  ".into())))
            .unwrap();
        assert_eq!(
            cart.get(id).unwrap().special_instructions.as_deref(),
            Some("no onions")
        );

        cart.add(input("burger-1", "v1", 2590, 1).with_instructions(Some("well done".into())))
            .unwrap();
        assert_eq!(
            cart.get(id).unwrap().special_instructions.as_deref(),
            Some("well done")
        );
    }

    #[test]
    fn test_unit_price_with_customizations() {
        let mut cart = Cart::new();
        let id = cart
            .add(input("burger-1", "v1", 2590, 1).with_customizations(vec![
                customization("Size", &["Large"], 500),
                customization("Extras", &["Bacon"], 400),
            ]))
            .unwrap();
        assert_eq!(
            cart.get(id).unwrap().unit_price_with_customizations(),
            Decimal::new(3490, 2)
        );
    }

    #[test]
    fn test_validate_detects_foreign_vendor_line() {
        let mut cart = Cart::new();
        cart.add(input("a", "v1", 100, 1)).unwrap();
        assert!(cart.validate().is_ok());

        let mut json = serde_json::to_value(&cart).unwrap();
        json["items"][0]["vendorId"] = serde_json::Value::String("v2".into());
        let tampered: Cart = serde_json::from_value(json).unwrap();
        assert!(tampered.validate().is_err());
    }
}
