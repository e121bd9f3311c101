//! Shared fixtures and in-memory collaborators for the end-to-end tests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p menu-cart-integration-tests
//! ```
//!
//! Nothing here touches the network; the hosted backend is replaced by
//! [`FakeBackend`] and [`FakeCoupons`].

#![allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use menu_cart_core::catalog::{MenuItem, SocialLinks, ThemeColors, VendorProfile};
use menu_cart_core::coupon::{Coupon, CouponCode, CouponType};
use menu_cart_core::customization::{CustomizationGroup, CustomizationOption, SelectionKind};
use menu_cart_core::order::{
    CheckoutForm, CustomerInfo, DeliveryAddress, OrderPayload, PaymentMethod,
};
use menu_cart_core::persistence::{CartStore, MemoryStore, PersistenceError, StoredSession};
use menu_cart_core::types::{BusinessType, CatalogItemId, VendorId};
use menu_cart_storefront::backend::{BackendError, CouponLookup, OrderBackend, OrderRecord};
use rust_decimal::Decimal;

// =============================================================================
// Fixtures
// =============================================================================

/// Fixed clock for coupon windows and order timestamps.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).single().unwrap()
}

pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
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

/// A plain menu item with no customizations.
pub fn menu_item(id: &str, vendor_id: &str, cents: i64) -> MenuItem {
    MenuItem {
        id: CatalogItemId::new(id),
        restaurant_id: VendorId::new(vendor_id),
        name: format!("Item {id}"),
        description: String::new(),
        price: money(cents),
        original_price: None,
        category: "mains".to_string(),
        image_url: None,
        is_available: true,
        preparation_time: None,
        ingredients: Vec::new(),
        allergens: Vec::new(),
        customizations: Vec::new(),
        is_promotion: false,
    }
}

/// A burger with a required size and optional extras.
pub fn burger(vendor_id: &str) -> MenuItem {
    let option = |name: &str, cents| CustomizationOption {
        name: name.to_string(),
        price: money(cents),
    };
    MenuItem {
        name: "X-Burger".to_string(),
        customizations: vec![
            CustomizationGroup {
                name: "Size".to_string(),
                kind: SelectionKind::Single,
                required: true,
                options: vec![option("Regular", 0), option("Large", 500)],
            },
            CustomizationGroup {
                name: "Extras".to_string(),
                kind: SelectionKind::Multiple,
                required: false,
                options: vec![option("Bacon", 400), option("Cheese", 300)],
            },
        ],
        ..menu_item("burger-1", vendor_id, 2590)
    }
}

pub fn coupon(code: &str, kind: CouponType, value_cents: i64) -> Coupon {
    Coupon {
        id: None,
        code: CouponCode::parse(code).unwrap(),
        name: format!("Coupon {code}"),
        description: String::new(),
        kind,
        value: money(value_cents),
        minimum_order_value: Decimal::ZERO,
        max_discount: None,
        valid_from: now() - Duration::days(7),
        valid_until: now() + Duration::days(7),
        is_active: true,
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
            complement: Some("Apto 42".to_string()),
            neighborhood: "Centro".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            ..DeliveryAddress::default()
        },
        payment_method: Some(PaymentMethod::Cash {
            change_for: Some("100".to_string()),
        }),
        notes: Some("Ring twice".to_string()),
    }
}

// =============================================================================
// Collaborators
// =============================================================================

/// Coupon lookup over a fixed list. Clones share the lookup count.
#[derive(Clone, Default)]
pub struct FakeCoupons {
    coupons: Vec<Coupon>,
    lookups: Arc<AtomicUsize>,
}

impl FakeCoupons {
    pub fn with(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        Self {
            coupons: coupons.into_iter().collect(),
            lookups: Arc::default(),
        }
    }

    /// How many times the backend was asked for a code.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl CouponLookup for FakeCoupons {
    async fn find_coupon_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, BackendError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .coupons
            .iter()
            .find(|c| c.code == *code && c.is_active)
            .cloned())
    }
}

/// Backend that accepts every order and keeps it.
#[derive(Clone, Default)]
pub struct FakeBackend {
    orders: Arc<Mutex<Vec<OrderPayload>>>,
}

impl FakeBackend {
    pub fn orders(&self) -> Vec<OrderPayload> {
        self.orders.lock().unwrap().clone()
    }
}

impl OrderBackend for FakeBackend {
    async fn create_order(&self, order: &OrderPayload) -> Result<OrderRecord, BackendError> {
        let mut orders = self.orders.lock().unwrap();
        orders.push(order.clone());
        Ok(OrderRecord {
            id: format!("order-{}", orders.len()),
            order_number: Some(order.order_number.to_string()),
            tracking_code: Some(order.tracking_code.to_string()),
        })
    }
}

/// Backend that rejects every order.
pub struct FailingBackend;

impl OrderBackend for FailingBackend {
    async fn create_order(&self, _order: &OrderPayload) -> Result<OrderRecord, BackendError> {
        Err(BackendError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

/// Memory store whose saves can be switched to fail.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Option<StoredSession> {
        self.inner.snapshot()
    }
}

impl CartStore for FlakyStore {
    fn load(&self) -> Result<Option<StoredSession>, PersistenceError> {
        self.inner.load()
    }

    fn save(&self, session: &StoredSession) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Storage("disk full".to_string()));
        }
        self.inner.save(session)
    }
}
