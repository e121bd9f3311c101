//! Coupon evaluation.
//!
//! A coupon is checked in a fixed order and the first failure is reported:
//! not found or inactive, then minimum order value, then validity window.
//! Only one coupon applies at a time; [`AppliedCoupon`] holds it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::types::{CouponId, round_to_cents};

/// Errors from normalizing or evaluating a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    /// No code was entered.
    #[error("enter a coupon code")]
    EmptyCode,

    /// No active coupon with this code exists.
    #[error("coupon not found or invalid")]
    NotFound,

    /// Subtotal is below the coupon's minimum order value.
    #[error("minimum order of {minimum} required for this coupon ({shortfall} to go)")]
    MinimumOrderNotMet {
        /// Minimum order value.
        minimum: Decimal,
        /// How much more the shopper needs to add.
        shortfall: Decimal,
    },

    /// Current time is outside the coupon's validity window.
    #[error("coupon expired or not yet valid")]
    Expired,
}

/// A coupon code, trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalize user input into a code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptyCode`] if the input is blank.
    pub fn parse(input: &str) -> Result<Self, CouponError> {
        let code = input.trim().to_uppercase();
        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }
        Ok(Self(code))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

impl core::fmt::Display for CouponCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CouponCode {
    type Err = CouponError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// What a coupon takes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CouponType {
    /// `value` percent of the subtotal, optionally capped by `max_discount`.
    Percentage,
    /// `value` off the subtotal, never more than the subtotal.
    Fixed,
    /// Exactly offsets the delivery fee.
    FreeDelivery,
}

/// A discount rule keyed by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(default, alias = "_id")]
    pub id: Option<CouponId>,
    pub code: CouponCode,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CouponType,
    pub value: Decimal,
    #[serde(default)]
    pub minimum_order_value: Decimal,
    #[serde(default)]
    pub max_discount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
}

impl Coupon {
    #[must_use]
    pub fn is_free_delivery(&self) -> bool {
        self.kind == CouponType::FreeDelivery
    }

    /// Whether `now` falls within `[valid_from, valid_until]`.
    #[must_use]
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        now >= self.valid_from && now <= self.valid_until
    }

    /// Discount this coupon gives on a subtotal, given the current delivery fee.
    ///
    /// Does not check eligibility; see [`evaluate`].
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal, delivery_fee: Decimal) -> Decimal {
        match self.kind {
            CouponType::Percentage => {
                let mut discount = round_to_cents(subtotal * self.value / Decimal::ONE_HUNDRED);
                if let Some(cap) = self.max_discount {
                    discount = discount.min(cap);
                }
                discount.min(subtotal).max(Decimal::ZERO)
            }
            CouponType::Fixed => self.value.min(subtotal).max(Decimal::ZERO),
            CouponType::FreeDelivery => delivery_fee,
        }
    }
}

/// Check a looked-up coupon and compute its discount.
///
/// `coupon` is whatever the lookup returned for the entered code.
///
/// # Errors
///
/// The first failing check, in order: [`CouponError::NotFound`],
/// [`CouponError::MinimumOrderNotMet`], [`CouponError::Expired`].
pub fn evaluate(
    coupon: Option<&Coupon>,
    subtotal: Decimal,
    delivery_fee: Decimal,
    now: DateTime<Utc>,
) -> Result<Decimal, CouponError> {
    let coupon = coupon
        .filter(|c| c.is_active)
        .ok_or(CouponError::NotFound)?;

    if subtotal < coupon.minimum_order_value {
        return Err(CouponError::MinimumOrderNotMet {
            minimum: coupon.minimum_order_value,
            shortfall: coupon.minimum_order_value - subtotal,
        });
    }

    if !coupon.is_within_window(now) {
        return Err(CouponError::Expired);
    }

    Ok(coupon.discount_for(subtotal, delivery_fee))
}

/// The single coupon applied to the order in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedCoupon {
    current: Option<Coupon>,
}

impl AppliedCoupon {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Coupon> {
        self.current.as_ref()
    }

    /// Evaluate `candidate` and, if it passes, make it the applied coupon.
    ///
    /// On failure any previously applied coupon stays in place.
    ///
    /// # Errors
    ///
    /// Returns the [`CouponError`] from [`evaluate`].
    pub fn apply(
        &mut self,
        candidate: Option<Coupon>,
        subtotal: Decimal,
        delivery_fee: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal, CouponError> {
        let discount = evaluate(candidate.as_ref(), subtotal, delivery_fee, now)?;
        if let Some(coupon) = candidate {
            info!(code = %coupon.code, %discount, "coupon applied");
            self.current = Some(coupon);
        }
        Ok(discount)
    }

    /// Remove the applied coupon, returning it.
    pub fn remove(&mut self) -> Option<Coupon> {
        self.current.take()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).single().unwrap_or_default()
    }

    pub fn coupon(code: &str, kind: CouponType, value_cents: i64) -> Coupon {
        Coupon {
            id: None,
            code: CouponCode(code.to_string()),
            name: format!("Coupon {code}"),
            description: String::new(),
            kind,
            value: Decimal::new(value_cents, 2),
            minimum_order_value: Decimal::ZERO,
            max_discount: None,
            valid_from: now() - chrono::Duration::days(1),
            valid_until: now() + chrono::Duration::days(1),
            is_active: true,
        }
    }
}
