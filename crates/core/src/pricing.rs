//! Pricing calculator.
//!
//! Pure functions over a cart snapshot. Sums are exact; the service fee is
//! the only rate-based amount here and is rounded to the cent.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::coupon::Coupon;
use crate::types::{CurrencyCode, round_to_cents};

/// Fee schedule and delivery settings for a storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    /// Delivery fee charged below the free-delivery threshold.
    pub base_delivery_fee: Decimal,
    /// Subtotal from which delivery is free.
    pub free_delivery_threshold: Decimal,
    /// Service fee as a fraction of the subtotal (0.05 = 5%).
    pub service_fee_rate: Decimal,
    /// Currency amounts are displayed in.
    pub currency: CurrencyCode,
    /// Minutes between order creation and estimated delivery.
    pub delivery_lead_minutes: u32,
}

impl PricingConfig {
    /// Lead time as a duration.
    #[must_use]
    pub fn delivery_lead_time(&self) -> Duration {
        Duration::minutes(i64::from(self.delivery_lead_minutes))
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_delivery_fee: Decimal::new(890, 2),
            free_delivery_threshold: Decimal::new(5000, 2),
            service_fee_rate: Decimal::new(5, 2),
            currency: CurrencyCode::BRL,
            delivery_lead_minutes: 35,
        }
    }
}

/// `(unit price + customization surcharges) * quantity`.
#[must_use]
pub fn item_line_total(item: &CartItem) -> Decimal {
    item.unit_price_with_customizations() * Decimal::from(item.quantity)
}

/// Sum of all line totals.
#[must_use]
pub fn cart_subtotal(cart: &Cart) -> Decimal {
    cart.items().iter().map(item_line_total).sum()
}

/// Zero at or above the threshold, otherwise the base fee.
#[must_use]
pub fn delivery_fee(subtotal: Decimal, base_fee: Decimal, free_threshold: Decimal) -> Decimal {
    if subtotal >= free_threshold {
        Decimal::ZERO
    } else {
        base_fee
    }
}

/// `subtotal * rate`, rounded to the cent.
#[must_use]
pub fn service_fee(subtotal: Decimal, rate: Decimal) -> Decimal {
    round_to_cents(subtotal * rate)
}

/// `subtotal + delivery + service - discount`.
///
/// Never negative as long as the discount came from the coupon evaluator,
/// which caps it at what it applies to.
#[must_use]
pub fn grand_total(
    subtotal: Decimal,
    delivery_fee: Decimal,
    service_fee: Decimal,
    discount: Decimal,
) -> Decimal {
    subtotal + delivery_fee + service_fee - discount
}

/// Every derived amount for a cart, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub subtotal: Decimal,
    /// Delivery fee before any free-delivery coupon.
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl PricingBreakdown {
    /// Price a cart, with an optional already-validated coupon.
    ///
    /// The coupon's discount is computed against the current subtotal; its
    /// eligibility was checked when it was applied.
    #[must_use]
    pub fn compute(cart: &Cart, config: &PricingConfig, coupon: Option<&Coupon>) -> Self {
        let subtotal = cart_subtotal(cart);
        let delivery_fee = delivery_fee(
            subtotal,
            config.base_delivery_fee,
            config.free_delivery_threshold,
        );
        let service_fee = service_fee(subtotal, config.service_fee_rate);
        let discount = coupon.map_or(Decimal::ZERO, |c| c.discount_for(subtotal, delivery_fee));

        Self {
            subtotal,
            delivery_fee,
            service_fee,
            discount,
            total: grand_total(subtotal, delivery_fee, service_fee, discount),
        }
    }

    /// Delivery fee the shopper actually pays once a free-delivery discount
    /// is netted out.
    #[must_use]
    pub fn net_delivery_fee(&self, coupon: Option<&Coupon>) -> Decimal {
        match coupon {
            Some(c) if c.is_free_delivery() => self.delivery_fee - self.discount,
            _ => self.delivery_fee,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::fixtures::input;

    fn cents(c: i64) -> Decimal {
        Decimal::new(c, 2)
    }

    #[test]
    fn test_line_total_includes_surcharges() {
        let mut cart = Cart::new();
        let mut line = input("burger-1", "v1", 2590, 2);
        line.customizations = vec![crate::customization::Customization {
            name: "Extras".to_string(),
            selected_options: ["Bacon".to_string()].into_iter().collect(),
            surcharge: cents(400),
        }];
        cart.add(line).unwrap();

        assert_eq!(item_line_total(&cart.items()[0]), cents(5980));
    }

    #[test]
    fn test_subtotal_independent_of_order() {
        let mut a = Cart::new();
        a.add(input("x", "v1", 1999, 3)).unwrap();
        a.add(input("y", "v1", 1, 7)).unwrap();

        let mut b = Cart::new();
        b.add(input("y", "v1", 1, 7)).unwrap();
        b.add(input("x", "v1", 1999, 3)).unwrap();

        assert_eq!(cart_subtotal(&a), cart_subtotal(&b));
        assert_eq!(cart_subtotal(&a), cents(6004));
    }

    #[test]
    fn test_delivery_fee_threshold_is_inclusive() {
        assert_eq!(delivery_fee(cents(4999), cents(890), cents(5000)), cents(890));
        assert_eq!(delivery_fee(cents(5000), cents(890), cents(5000)), Decimal::ZERO);
    }

    #[test]
    fn test_service_fee_rounds_to_cent() {
        // 25.90 * 0.05 = 1.295
        assert_eq!(service_fee(cents(2590), Decimal::new(5, 2)), cents(130));
    }

    #[test]
    fn test_empty_cart_breakdown() {
        let breakdown = PricingBreakdown::compute(&Cart::new(), &PricingConfig::default(), None);
        assert_eq!(breakdown.subtotal, Decimal::ZERO);
        assert_eq!(breakdown.delivery_fee, cents(890));
        assert_eq!(breakdown.total, cents(890));
    }

    #[test]
    fn test_default_config_matches_demo_values() {
        let config = PricingConfig::default();
        assert_eq!(config.base_delivery_fee, cents(890));
        assert_eq!(config.free_delivery_threshold, cents(5000));
        assert_eq!(config.service_fee_rate, Decimal::new(5, 2));
        assert_eq!(config.delivery_lead_time(), Duration::minutes(35));
    }
}
