//! Order assembly.
//!
//! Turns the final cart, the shopper's checkout form and the computed prices
//! into an immutable [`OrderPayload`]. The payload is submitted to the hosted
//! backend as-is, or rendered with [`render_message`] for a chat deep link.
//! Nothing here stores or sends anything.

mod message;

pub use message::{encode_message, render_message};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::Cart;
use crate::coupon::{Coupon, CouponCode};
use crate::customization::Customization;
use crate::pricing::{PricingBreakdown, item_line_total};
use crate::types::{CatalogItemId, OrderStatus, PaymentStatus, VendorId};

/// Checkout fields that must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    CustomerName,
    Phone,
    Street,
    Neighborhood,
    City,
    PaymentMethod,
}

impl core::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::CustomerName => "name",
            Self::Phone => "phone",
            Self::Street => "street address",
            Self::Neighborhood => "neighborhood",
            Self::City => "city",
            Self::PaymentMethod => "payment method",
        })
    }
}

/// Errors that prevent an order from being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("{0} is required")]
    MissingField(RequiredField),

    #[error("cart is empty")]
    CartEmpty,
}

/// Who is ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
}

/// Where to deliver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub reference: Option<String>,
}

/// How the shopper pays on delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash, optionally with the note the courier needs to bring change.
    Cash {
        /// Free-form "change for" amount as typed by the shopper.
        #[serde(default, rename = "changeFor")]
        change_for: Option<String>,
    },
    CreditCard,
    DebitCard,
    Pix,
    MealVoucher,
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Cash { .. } => "Cash",
            Self::CreditCard => "Credit card",
            Self::DebitCard => "Debit card",
            Self::Pix => "PIX",
            Self::MealVoucher => "Meal voucher",
        })
    }
}

impl PaymentMethod {
    /// The "change for" text, if paying cash and one was given.
    #[must_use]
    pub fn change_for(&self) -> Option<&str> {
        match self {
            Self::Cash { change_for } => change_for
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

/// Everything the shopper fills in at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub customer: CustomerInfo,
    pub address: DeliveryAddress,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Check required fields in display order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::MissingField`] for the first blank required field.
    pub fn validate(&self) -> Result<&PaymentMethod, OrderError> {
        let required = [
            (&self.customer.name, RequiredField::CustomerName),
            (&self.customer.phone, RequiredField::Phone),
            (&self.address.street, RequiredField::Street),
            (&self.address.neighborhood, RequiredField::Neighborhood),
            (&self.address.city, RequiredField::City),
        ];
        if let Some((_, field)) = required.iter().find(|(value, _)| value.trim().is_empty()) {
            return Err(OrderError::MissingField(*field));
        }

        self.payment_method
            .as_ref()
            .ok_or(OrderError::MissingField(RequiredField::PaymentMethod))
    }
}

/// Unique, human-readable order number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// `ORD-<unix millis>-<8 random hex>`: sortable by time, unique by suffix.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("ORD-{}-{}", now.timestamp_millis(), random_suffix(8)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Code the shopper uses to follow the delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingCode(String);

impl TrackingCode {
    /// `TRK<unix millis><4 random hex>`.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("TRK{}{}", now.timestamp_millis(), random_suffix(4)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

fn random_suffix(len: usize) -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(len)
        .collect::<String>()
        .to_uppercase()
}

/// One line of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub catalog_item_id: CatalogItemId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub customizations: Vec<Customization>,
    pub special_instructions: String,
    pub line_total: Decimal,
}

/// A fully assembled order, ready to submit or render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order_number: OrderNumber,
    pub tracking_code: TrackingCode,
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub customer: CustomerInfo,
    pub items: Vec<OrderLine>,
    pub subtotal: Decimal,
    /// Delivery fee before discounts; a free-delivery coupon shows up in `discount`.
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub coupon_code: Option<CouponCode>,
    pub delivery_address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub customer_notes: String,
    pub estimated_delivery_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assemble an order from the final cart state.
///
/// `pricing` must have been computed from the same `cart` and `coupon`.
///
/// # Errors
///
/// Returns [`OrderError::MissingField`] for the first blank required field,
/// then [`OrderError::CartEmpty`] if there is nothing to order.
pub fn assemble(
    cart: &Cart,
    form: &CheckoutForm,
    pricing: &PricingBreakdown,
    coupon: Option<&Coupon>,
    lead_time: Duration,
    now: DateTime<Utc>,
) -> Result<OrderPayload, OrderError> {
    let payment_method = form.validate()?.clone();
    let vendor = cart.vendor().ok_or(OrderError::CartEmpty)?;

    let items = cart
        .items()
        .iter()
        .map(|item| OrderLine {
            catalog_item_id: item.catalog_item_id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            customizations: item.customizations.clone(),
            special_instructions: item.special_instructions.clone().unwrap_or_default(),
            line_total: item_line_total(item),
        })
        .collect();

    Ok(OrderPayload {
        order_number: OrderNumber::generate(now),
        tracking_code: TrackingCode::generate(now),
        vendor_id: vendor.vendor_id.clone(),
        vendor_name: vendor.vendor_name.clone(),
        customer: CustomerInfo {
            name: form.customer.name.trim().to_string(),
            phone: form.customer.phone.trim().to_string(),
        },
        items,
        subtotal: pricing.subtotal,
        delivery_fee: pricing.delivery_fee,
        service_fee: pricing.service_fee,
        discount: pricing.discount,
        total_amount: pricing.total,
        coupon_code: coupon.map(|c| c.code.clone()),
        delivery_address: form.address.clone(),
        payment_method,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        customer_notes: form.notes.clone().unwrap_or_default().trim().to_string(),
        estimated_delivery_time: now + lead_time,
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn form() -> CheckoutForm {
        CheckoutForm {
            customer: CustomerInfo {
                name: "Maria Silva".to_string(),
                phone: "11 98888-7777".to_string(),
            },
            address: DeliveryAddress {
                street: "Rua das Flores".to_string(),
                number: "123".to_string(),
                complement: Some("Apto 42".to_string()),
                neighborhood: "Centro".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                zip_code: "01000-000".to_string(),
                reference: None,
            },
            payment_method: Some(PaymentMethod::Pix),
            notes: None,
        }
    }
}
