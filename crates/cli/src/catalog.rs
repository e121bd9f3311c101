//! Catalog files.
//!
//! A catalog is a YAML document describing one vendor and its items, either
//! a simple product list or a restaurant menu:
//!
//! ```yaml
//! kind: menu
//! vendor:
//!   id: burger-place
//!   name: Burger Place
//!   contactNumber: "+55 (11) 99999-9999"
//! items:
//!   - id: burger-1
//!     restaurantId: burger-place
//!     name: X-Burger
//!     price: "25.90"
//!     category: burgers
//!     isAvailable: true
//! ```

use std::path::Path;

use menu_cart_core::catalog::{Catalog, Favorites, MenuItem, Orderable, Product, VendorProfile};
use menu_cart_core::types::CatalogItemId;
use serde::Deserialize;
use thiserror::Error;

/// Errors loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No item with id {0} in the catalog")]
    UnknownItem(CatalogItemId),
}

/// A loaded catalog of either kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogFile {
    Products(Catalog<Product>),
    Menu(Catalog<MenuItem>),
}

impl CatalogFile {
    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or is not a valid catalog.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the document is not a valid catalog.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(content)?)
    }

    #[must_use]
    pub const fn vendor(&self) -> &VendorProfile {
        match self {
            Self::Products(catalog) => &catalog.vendor,
            Self::Menu(catalog) => &catalog.vendor,
        }
    }

    /// Look up an item by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownItem` if no item has this id.
    pub fn find(&self, id: &CatalogItemId) -> Result<&dyn Orderable, CatalogError> {
        let found: Option<&dyn Orderable> = match self {
            Self::Products(catalog) => catalog.find(id).map(|p| p as &dyn Orderable),
            Self::Menu(catalog) => catalog.find(id).map(|m| m as &dyn Orderable),
        };
        found.ok_or_else(|| CatalogError::UnknownItem(id.clone()))
    }

    /// Items matching a listing filter, in catalog order.
    #[must_use]
    pub fn list<'a>(&'a self, filter: &ListFilter<'a>) -> Vec<&'a dyn Orderable> {
        match self {
            Self::Products(catalog) => select(catalog, filter),
            Self::Menu(catalog) => select(catalog, filter),
        }
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        match self {
            Self::Products(catalog) => catalog.categories(),
            Self::Menu(catalog) => catalog.categories(),
        }
    }
}

/// Which catalog items to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter<'a> {
    /// Items in a category; empty means all.
    Category(&'a str),
    /// Available items on promotion.
    Promotions,
    /// Starred items.
    Favorites(&'a Favorites),
}

fn select<'a, T: Orderable>(
    catalog: &'a Catalog<T>,
    filter: &ListFilter<'a>,
) -> Vec<&'a dyn Orderable> {
    match *filter {
        ListFilter::Category(category) => catalog
            .by_category(category)
            .map(|item| item as &dyn Orderable)
            .collect(),
        ListFilter::Promotions => catalog
            .promotions()
            .map(|item| item as &dyn Orderable)
            .collect(),
        ListFilter::Favorites(favorites) => catalog
            .favorites(favorites)
            .map(|item| item as &dyn Orderable)
            .collect(),
    }
}
