//! In-memory collaborators and fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use menu_cart_core::catalog::{SocialLinks, ThemeColors, VendorProfile};
use menu_cart_core::coupon::{Coupon, CouponCode, CouponType};
use menu_cart_core::order::{CheckoutForm, CustomerInfo, DeliveryAddress, OrderPayload, PaymentMethod};
use menu_cart_core::types::{BusinessType, VendorId};
use rust_decimal::Decimal;

use crate::backend::{BackendError, CouponLookup, OrderBackend, OrderRecord};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).single().unwrap()
}

pub fn coupon(code: &str, kind: CouponType, value_cents: i64) -> Coupon {
    Coupon {
        id: None,
        code: CouponCode::parse(code).unwrap(),
        name: format!("Coupon {code}"),
        description: String::new(),
        kind,
        value: Decimal::new(value_cents, 2),
        minimum_order_value: Decimal::ZERO,
        max_discount: None,
        valid_from: now() - Duration::days(1),
        valid_until: now() + Duration::days(1),
        is_active: true,
    }
}

pub fn vendor(id: &str) -> VendorProfile {
    VendorProfile {
        id: VendorId::new(id),
        name: format!("Vendor {id}"),
        contact_number: "+55 (11) 99999-9999".to_string(),
        address: None,
        working_hours: None,
        description: None,
        logo: None,
        cover_image: None,
        theme: ThemeColors::default(),
        business_type: BusinessType::Restaurant,
        social_media: SocialLinks::default(),
    }
}

pub fn form() -> CheckoutForm {
    CheckoutForm {
        customer: CustomerInfo {
            name: "Maria Silva".to_string(),
            phone: "11 98888-7777".to_string(),
        },
        address: DeliveryAddress {
            street: "Rua das Flores".to_string(),
            number: "123".to_string(),
            neighborhood: "Centro".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            ..DeliveryAddress::default()
        },
        payment_method: Some(PaymentMethod::Pix),
        notes: None,
    }
}

/// Coupon lookup over a fixed list, recording every code asked for.
#[derive(Clone, Default)]
pub struct FakeCoupons {
    coupons: Vec<Coupon>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl FakeCoupons {
    pub fn with(coupon: Coupon) -> Self {
        Self::default().and(coupon)
    }

    pub fn and(mut self, coupon: Coupon) -> Self {
        self.coupons.push(coupon);
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl CouponLookup for FakeCoupons {
    async fn find_coupon_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, BackendError> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(code.as_str().to_string());
        }
        Ok(self
            .coupons
            .iter()
            .find(|c| c.code == *code && c.is_active)
            .cloned())
    }
}

/// Backend that accepts every order.
#[derive(Clone, Default)]
pub struct FakeBackend {
    orders: Arc<Mutex<Vec<OrderPayload>>>,
}

impl FakeBackend {
    pub fn orders(&self) -> Vec<OrderPayload> {
        self.orders.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl OrderBackend for FakeBackend {
    async fn create_order(&self, order: &OrderPayload) -> Result<OrderRecord, BackendError> {
        let mut orders = self
            .orders
            .lock()
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        orders.push(order.clone());
        Ok(OrderRecord {
            id: format!("order-{}", orders.len()),
            order_number: Some(order.order_number.to_string()),
            tracking_code: Some(order.tracking_code.as_str().to_string()),
        })
    }
}

/// Backend that is always down.
pub struct FailingBackend;

impl CouponLookup for FailingBackend {
    async fn find_coupon_by_code(&self, _code: &CouponCode) -> Result<Option<Coupon>, BackendError> {
        Err(BackendError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

impl OrderBackend for FailingBackend {
    async fn create_order(&self, _order: &OrderPayload) -> Result<OrderRecord, BackendError> {
        Err(BackendError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}
