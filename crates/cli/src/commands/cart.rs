//! Cart commands: list the catalog, change the cart, show totals.

use std::error::Error;
use std::fmt::Write as _;

use menu_cart_core::CurrencyCode;
use menu_cart_core::cart::Cart;
use menu_cart_core::catalog::{Favorites, Orderable};
use menu_cart_core::coupon::Coupon;
use menu_cart_core::customization::{Selection, SelectionKind};
use menu_cart_core::pricing::{PricingBreakdown, item_line_total};
use menu_cart_core::types::{CartItemId, CatalogItemId};

use super::Session;
use crate::catalog::ListFilter;

/// A cart line picked on the command line: its 1-based position or its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRef {
    Position(usize),
    Id(CartItemId),
}

impl std::str::FromStr for LineRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(position) = s.parse::<usize>() {
            return Ok(Self::Position(position));
        }
        s.parse::<CartItemId>()
            .map(Self::Id)
            .map_err(|_| format!("expected a line number or line id, got '{s}'"))
    }
}

impl LineRef {
    /// The id of the referenced line.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is out of range.
    pub fn resolve(&self, cart: &Cart) -> Result<CartItemId, String> {
        match self {
            Self::Id(id) => Ok(*id),
            Self::Position(position) => position
                .checked_sub(1)
                .and_then(|index| cart.items().get(index))
                .map(|item| item.id)
                .ok_or_else(|| format!("no line {position} in the cart")),
        }
    }
}

/// Parse a `Group=Option` customization choice.
///
/// # Errors
///
/// Returns an error if either side is missing.
pub fn parse_choice(s: &str) -> Result<(String, String), String> {
    let (group, option) = s
        .split_once('=')
        .ok_or_else(|| format!("expected GROUP=OPTION, got '{s}'"))?;
    let (group, option) = (group.trim(), option.trim());
    if group.is_empty() || option.is_empty() {
        return Err(format!("expected GROUP=OPTION, got '{s}'"));
    }
    Ok((group.to_string(), option.to_string()))
}

/// Build a selection for `item`, using each group's own selection kind.
///
/// Choices for groups the item does not have are kept so that resolving
/// reports them.
#[must_use]
pub fn build_selection(item: &dyn Orderable, choices: &[(String, String)]) -> Selection {
    let mut selection = Selection::new();
    for (group, option) in choices {
        let kind = item
            .customization_groups()
            .iter()
            .find(|g| g.name == *group)
            .map_or(SelectionKind::Single, |g| g.kind);
        selection.choose(group, option, kind);
    }
    selection
}

/// List catalog items.
pub fn menu(session: &Session, category: Option<&str>, promotions: bool, favorites: bool) -> String {
    let filter = if favorites {
        ListFilter::Favorites(session.checkout.engine().favorites())
    } else if promotions {
        ListFilter::Promotions
    } else {
        ListFilter::Category(category.unwrap_or_default())
    };
    render_menu(
        &session.catalog.list(&filter),
        session.checkout.engine().favorites(),
        session.config.currency(),
    )
}

/// Add a catalog item.
///
/// # Errors
///
/// Returns an error if the item is unknown, unavailable, from another
/// vendor, or its customizations are invalid.
pub fn add(
    session: &mut Session,
    item_id: &str,
    quantity: u32,
    choices: &[(String, String)],
    note: Option<String>,
) -> Result<String, Box<dyn Error>> {
    let item = session.catalog.find(&CatalogItemId::new(item_id))?;
    let selection = build_selection(item, choices);
    let vendor = session.catalog.vendor();

    session
        .checkout
        .engine_mut()
        .add_orderable(vendor, item, quantity, &selection, note)?;
    Ok(format!("Added {quantity}x {}", item.name()))
}

/// Remove a cart line.
///
/// # Errors
///
/// Returns an error if the line does not exist or the cart cannot be saved.
pub fn remove(session: &mut Session, line: &LineRef) -> Result<String, Box<dyn Error>> {
    let engine = session.checkout.engine_mut();
    let id = line.resolve(engine.cart())?;
    engine.remove(id)?;
    Ok("Removed".to_string())
}

/// Set a line's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns an error if the line does not exist or the cart cannot be saved.
pub fn set_quantity(
    session: &mut Session,
    line: &LineRef,
    quantity: i64,
) -> Result<String, Box<dyn Error>> {
    let engine = session.checkout.engine_mut();
    let id = line.resolve(engine.cart())?;
    engine.update_quantity(id, quantity)?;
    Ok(if quantity <= 0 {
        "Removed".to_string()
    } else {
        format!("Quantity set to {quantity}")
    })
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn clear(session: &mut Session) -> Result<String, Box<dyn Error>> {
    session.checkout.engine_mut().clear()?;
    Ok("Cart cleared".to_string())
}

/// Star or unstar a catalog item.
///
/// # Errors
///
/// Returns an error if the item is unknown or favorites cannot be saved.
pub fn favorite(session: &mut Session, item_id: &str) -> Result<String, Box<dyn Error>> {
    let id = CatalogItemId::new(item_id);
    let name = session.catalog.find(&id)?.name().to_string();
    let starred = session.checkout.engine_mut().toggle_favorite(&id)?;
    Ok(if starred {
        format!("★ {name} added to favorites")
    } else {
        format!("{name} removed from favorites")
    })
}

/// Current cart with prices.
pub fn show(session: &Session) -> String {
    render_cart(
        session.checkout.engine().cart(),
        &session.checkout.quote(),
        session.checkout.applied_coupon(),
        session.config.currency(),
    )
}

// =============================================================================
// Rendering
// =============================================================================

fn render_menu(items: &[&dyn Orderable], favorites: &Favorites, currency: CurrencyCode) -> String {
    if items.is_empty() {
        return "No items".to_string();
    }

    let mut out = String::new();
    for item in items {
        let star = if favorites.contains(item.catalog_item_id()) { "★ " } else { "" };
        let mut flags = Vec::new();
        if item.is_promotion() {
            flags.push("promo");
        }
        if !item.is_available() {
            flags.push("unavailable");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        let _ = writeln!(
            out,
            "{star}{}  {}  {}  ({}){flags}",
            item.catalog_item_id(),
            item.name(),
            currency.format(item.unit_price()),
            item.category()
        );
        for group in item.customization_groups() {
            let options = group
                .options
                .iter()
                .map(|o| format!("{} +{}", o.name, currency.format(o.price)))
                .collect::<Vec<_>>()
                .join(", ");
            let required = if group.required { ", required" } else { "" };
            let kind = match group.kind {
                SelectionKind::Single => "pick one",
                SelectionKind::Multiple => "pick any",
            };
            let _ = writeln!(out, "    {} ({kind}{required}): {options}", group.name);
        }
    }
    out.trim_end().to_string()
}

/// Render the cart and its totals.
#[must_use]
pub fn render_cart(
    cart: &Cart,
    quote: &PricingBreakdown,
    coupon: Option<&Coupon>,
    currency: CurrencyCode,
) -> String {
    let Some(vendor) = cart.vendor() else {
        return "Cart is empty".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} - {} item(s) in {} line(s)",
        vendor.vendor_name,
        cart.item_count(),
        cart.line_count()
    );
    for (index, item) in cart.items().iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}x {}  {}  [{}]",
            index + 1,
            item.quantity,
            item.name,
            currency.format(item_line_total(item)),
            item.id
        );
        for customization in &item.customizations {
            let options = customization
                .selected_options
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "     {}: {options}", customization.name);
        }
        if let Some(note) = &item.special_instructions {
            let _ = writeln!(out, "     Note: {note}");
        }
    }

    let _ = writeln!(out, "Subtotal:    {}", currency.format(quote.subtotal));
    let _ = writeln!(out, "Delivery:    {}", currency.format(quote.net_delivery_fee(coupon)));
    let _ = writeln!(out, "Service fee: {}", currency.format(quote.service_fee));
    if let Some(coupon) = coupon {
        let discount = if coupon.is_free_delivery() {
            "free delivery".to_string()
        } else {
            format!("-{}", currency.format(quote.discount))
        };
        let _ = writeln!(out, "Coupon {}: {discount}", coupon.code);
    }
    let _ = write!(out, "Total:       {}", currency.format(quote.total));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use menu_cart_core::cart::CartItemInput;
    use menu_cart_core::pricing::PricingConfig;
    use menu_cart_core::types::VendorId;
    use rust_decimal::Decimal;

    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        for (id, cents, quantity) in [("burger-1", 2590, 2), ("soda-1", 600, 1)] {
            cart.add(CartItemInput {
                catalog_item_id: CatalogItemId::new(id),
                name: id.to_string(),
                unit_price: Decimal::new(cents, 2),
                quantity,
                vendor_id: VendorId::new("v1"),
                vendor_name: "Burger Place".to_string(),
                image_url: None,
                customizations: Vec::new(),
                special_instructions: None,
            })
            .unwrap();
        }
        cart
    }

    #[test]
    fn test_line_ref_parse() {
        assert_eq!("2".parse::<LineRef>().unwrap(), LineRef::Position(2));
        let id = CartItemId::generate();
        assert_eq!(id.to_string().parse::<LineRef>().unwrap(), LineRef::Id(id));
        assert!("burger".parse::<LineRef>().is_err());
    }

    #[test]
    fn test_line_ref_resolve() {
        let cart = cart();
        assert_eq!(LineRef::Position(2).resolve(&cart).unwrap(), cart.items()[1].id);
        assert!(LineRef::Position(0).resolve(&cart).is_err());
        assert!(LineRef::Position(3).resolve(&cart).is_err());
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(
            parse_choice("Size = Large").unwrap(),
            ("Size".to_string(), "Large".to_string())
        );
        assert!(parse_choice("Size").is_err());
        assert!(parse_choice("=Large").is_err());
    }

    #[test]
    fn test_render_cart_totals() {
        let cart = cart();
        let quote = PricingBreakdown::compute(&cart, &PricingConfig::default(), None);
        let text = render_cart(&cart, &quote, None, CurrencyCode::BRL);

        assert!(text.starts_with("Burger Place - 3 item(s) in 2 line(s)\n"));
        assert!(text.contains("1. 2x burger-1  R$ 51,80"));
        // 57.80 >= 50.00, so delivery is free
        assert!(text.contains("Delivery:    R$ 0,00"));
        assert!(text.ends_with("Total:       R$ 60,69"));
    }

    #[test]
    fn test_render_empty_cart() {
        let quote = PricingBreakdown::compute(&Cart::new(), &PricingConfig::default(), None);
        assert_eq!(render_cart(&Cart::new(), &quote, None, CurrencyCode::BRL), "Cart is empty");
    }
}
