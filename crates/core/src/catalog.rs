//! Catalog types consumed read-only by the cart.
//!
//! Two kinds of storefront share one cart: a simple product catalog
//! ([`Product`]) and a restaurant menu ([`MenuItem`], with customization
//! groups). Both implement [`Orderable`], which is all the cart needs to
//! snapshot a line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::customization::CustomizationGroup;
use crate::types::{BusinessType, CatalogItemId, VendorId};

/// Theme colors of a vendor's storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(default)]
    pub accent_color: Option<String>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary_color: "#10b981".to_string(),
            secondary_color: "#059669".to_string(),
            accent_color: Some("#fbbf24".to_string()),
        }
    }
}

/// Social media links shown on the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// The store or restaurant that owns a catalog and fulfills orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub id: VendorId,
    pub name: String,
    /// Chat contact number orders are sent to (e.g., `5511999999999`).
    pub contact_number: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub working_hours: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub theme: ThemeColors,
    #[serde(default)]
    pub business_type: BusinessType,
    #[serde(default)]
    pub social_media: SocialLinks,
}

/// Anything that can be put in the cart.
pub trait Orderable {
    /// Catalog identity of the item.
    fn catalog_item_id(&self) -> &CatalogItemId;

    /// Display name, snapshotted into the cart line.
    fn name(&self) -> &str;

    /// Base unit price before customizations.
    fn unit_price(&self) -> Decimal;

    /// Whether the item can currently be ordered.
    fn is_available(&self) -> bool;

    /// Category used for catalog filtering.
    fn category(&self) -> &str;

    /// Whether the item is on promotion.
    fn is_promotion(&self) -> bool;

    /// Customization groups offered for this item.
    fn customization_groups(&self) -> &[CustomizationGroup] {
        &[]
    }

    /// Vendor that owns the item, when the item records one.
    ///
    /// Items without an owner belong to whichever vendor's catalog they are in.
    fn vendor_id(&self) -> Option<&VendorId> {
        None
    }

    /// Image shown next to the item.
    fn image_url(&self) -> Option<&str> {
        None
    }
}

/// A product in a simple retail catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: CatalogItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
    pub is_available: bool,
    #[serde(default)]
    pub is_promotion: bool,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Orderable for Product {
    fn catalog_item_id(&self) -> &CatalogItemId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn is_available(&self) -> bool {
        self.is_available
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn is_promotion(&self) -> bool {
        self.is_promotion
    }

    fn image_url(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// An item on a restaurant menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(alias = "_id")]
    pub id: CatalogItemId,
    pub restaurant_id: VendorId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub is_available: bool,
    /// Preparation time in minutes.
    #[serde(default)]
    pub preparation_time: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub customizations: Vec<CustomizationGroup>,
    #[serde(default)]
    pub is_promotion: bool,
}

impl Orderable for MenuItem {
    fn catalog_item_id(&self) -> &CatalogItemId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn is_available(&self) -> bool {
        self.is_available
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn is_promotion(&self) -> bool {
        self.is_promotion
    }

    fn customization_groups(&self) -> &[CustomizationGroup] {
        &self.customizations
    }

    fn vendor_id(&self) -> Option<&VendorId> {
        Some(&self.restaurant_id)
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

/// Ordered set of favorite catalog items.
///
/// Insertion order is kept so favorites list in the order they were starred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<CatalogItemId>);

impl Favorites {
    /// Toggle an item. Returns `true` if it is now a favorite.
    pub fn toggle(&mut self, id: &CatalogItemId) -> bool {
        if let Some(pos) = self.0.iter().position(|f| f == id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(id.clone());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &CatalogItemId) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItemId> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A vendor's catalog of orderable items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog<T> {
    pub vendor: VendorProfile,
    pub items: Vec<T>,
}

impl<T: Orderable> Catalog<T> {
    /// Look up an item by catalog ID.
    #[must_use]
    pub fn find(&self, id: &CatalogItemId) -> Option<&T> {
        self.items.iter().find(|item| item.catalog_item_id() == id)
    }

    /// Items in a category. An empty category means "all".
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.items
            .iter()
            .filter(move |item| category.is_empty() || item.category() == category)
    }

    /// Items that are both on promotion and available.
    pub fn promotions(&self) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .filter(|item| item.is_promotion() && item.is_available())
    }

    /// Items starred as favorites, in catalog order.
    pub fn favorites<'a>(&'a self, favorites: &'a Favorites) -> impl Iterator<Item = &'a T> + 'a {
        self.items
            .iter()
            .filter(move |item| favorites.contains(item.catalog_item_id()))
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category()) {
                seen.push(item.category());
            }
        }
        seen
    }
}
