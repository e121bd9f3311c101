//! Newtype IDs for type-safe entity references.
//!
//! Catalog-side IDs are opaque strings assigned by the hosted backend, so the
//! `define_id!` macro wraps a `String`. Cart lines get their own generated
//! [`CartItemId`], distinct from the catalog item they reference.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use menu_cart_core::define_id;
/// define_id!(VendorId);
/// define_id!(CatalogItemId);
///
/// let vendor = VendorId::new("v1");
/// let item = CatalogItemId::new("v1");
///
/// // These are different types, so this won't compile:
/// // let _: VendorId = item;
/// # assert_eq!(vendor.as_str(), item.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(VendorId);
define_id!(CatalogItemId);
define_id!(CouponId);

/// Identity of a single cart line.
///
/// Generated at insertion time; two lines for the same catalog item (with
/// different customizations) have different `CartItemId`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(Uuid);

impl CartItemId {
    /// Generate a fresh random ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for CartItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CartItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id_display_and_serde() {
        let id = VendorId::new("pizzaria-1");
        assert_eq!(id.to_string(), "pizzaria-1");

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pizzaria-1\"");

        let parsed: VendorId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_cart_item_ids_are_unique() {
        let a = CartItemId::generate();
        let b = CartItemId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cart_item_id_parses_own_display() {
        let id = CartItemId::generate();
        let parsed: CartItemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
