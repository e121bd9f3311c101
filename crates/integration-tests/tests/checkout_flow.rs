//! Chat and backend checkout, end to end.

#![allow(clippy::unwrap_used)]

use menu_cart_core::cart::{CartEngine, CartError};
use menu_cart_core::coupon::CouponType;
use menu_cart_core::customization::{Selection, SelectionKind};
use menu_cart_core::order::{OrderError, RequiredField};
use menu_cart_core::pricing::PricingConfig;
use menu_cart_core::types::{OrderStatus, PaymentStatus};
use menu_cart_integration_tests::{
    FailingBackend, FakeBackend, FakeCoupons, FlakyStore, burger, coupon, form, menu_item, money,
    now, vendor,
};
use menu_cart_storefront::{CheckoutError, CheckoutService, ErrorKind};

/// Service with a large burger with bacon (2x) and a soda, from vendor v1.
fn service() -> (CheckoutService<FlakyStore>, FlakyStore) {
    let store = FlakyStore::new();
    let mut engine = CartEngine::new(store.clone());
    let v1 = vendor("v1");
    let large = Selection::new()
        .with("Size", "Large", SelectionKind::Single)
        .with("Extras", "Bacon", SelectionKind::Multiple);
    engine
        .add_orderable(&v1, &burger("v1"), 2, &large, Some("no pickles".to_string()))
        .unwrap();
    engine
        .add_orderable(&v1, &menu_item("soda-1", "v1", 600), 1, &Selection::new(), None)
        .unwrap();
    (CheckoutService::new(engine, PricingConfig::default()), store)
}

#[tokio::test]
async fn test_chat_checkout_builds_message_and_clears_cart() {
    let (mut service, store) = service();
    let coupons = FakeCoupons::with([coupon("SAVE5", CouponType::Fixed, 500)]);
    service.apply_coupon(&coupons, "save5", now()).await.unwrap();

    let checkout = service.checkout_via_chat(&form(), &vendor("v1"), now()).unwrap();

    let order = &checkout.order;
    // 2 x (25.90 + 5.00 + 4.00) + 6.00
    assert_eq!(order.subtotal, money(7580));
    assert_eq!(order.delivery_fee, money(0));
    assert_eq!(order.service_fee, money(379));
    assert_eq!(order.discount, money(500));
    assert_eq!(order.total_amount, money(7459));
    assert_eq!(order.coupon_code.as_ref().unwrap().as_str(), "SAVE5");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].special_instructions, "no pickles");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    assert!(checkout.message.contains("Maria Silva"));
    assert!(checkout.message.contains("Rua das Flores, 123"));
    assert!(checkout.message.contains("Change for: 100"));
    assert!(checkout.message.contains("SAVE5"));
    assert!(checkout.link.as_str().starts_with("https://wa.me/5511999999999?text="));

    assert!(service.engine().cart().is_empty());
    assert!(service.applied_coupon().is_none());
    assert!(store.snapshot().unwrap().cart.is_empty());
}

#[tokio::test]
async fn test_chat_checkout_rejects_other_vendor() {
    let (mut service, _store) = service();

    let err = service
        .checkout_via_chat(&form(), &vendor("v2"), now())
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Cart(CartError::VendorMismatch { .. })));
    assert_eq!(service.engine().cart().line_count(), 2);
}

#[test]
fn test_chat_checkout_clear_failure_is_reported() {
    let (mut service, store) = service();
    store.fail_saves(true);

    let err = service
        .checkout_via_chat(&form(), &vendor("v1"), now())
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Cart(CartError::Persistence(_))));
    assert_eq!(err.kind(), ErrorKind::External);
    assert_eq!(service.engine().cart().line_count(), 2);
}

#[test]
fn test_incomplete_form_changes_nothing() {
    let (mut service, _store) = service();
    let mut incomplete = form();
    incomplete.address.city = "  ".to_string();

    let err = service
        .checkout_via_chat(&incomplete, &vendor("v1"), now())
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Order(OrderError::MissingField(RequiredField::City))
    ));
    assert_eq!(err.to_string(), "city is required");
    assert_eq!(service.engine().cart().line_count(), 2);
}

#[test]
fn test_empty_cart_cannot_check_out() {
    let store = FlakyStore::new();
    let mut service = CheckoutService::new(CartEngine::new(store), PricingConfig::default());

    let err = service
        .checkout_via_chat(&form(), &vendor("v1"), now())
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Order(OrderError::CartEmpty)));
}

#[tokio::test]
async fn test_backend_checkout_submits_then_clears() {
    let (mut service, store) = service();
    let backend = FakeBackend::default();

    let submitted = service
        .checkout_via_backend(&backend, &form(), now())
        .await
        .unwrap();

    assert_eq!(submitted.record.id, "order-1");
    let orders = backend.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0], submitted.order);
    assert_eq!(orders[0].vendor_id.as_str(), "v1");
    assert!(orders[0].order_number.as_str().starts_with("ORD-"));

    assert!(service.engine().cart().is_empty());
    assert!(store.snapshot().unwrap().cart.is_empty());
}

#[tokio::test]
async fn test_backend_failure_keeps_cart_and_coupon() {
    let (mut service, store) = service();
    let coupons = FakeCoupons::with([coupon("SAVE5", CouponType::Fixed, 500)]);
    service.apply_coupon(&coupons, "SAVE5", now()).await.unwrap();

    let err = service
        .checkout_via_backend(&FailingBackend, &form(), now())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Backend(_)));
    assert!(err.is_retryable());
    assert_eq!(service.engine().cart().line_count(), 2);
    assert!(service.applied_coupon().is_some());
    assert_eq!(store.snapshot().unwrap().cart.line_count(), 2);
}

#[tokio::test]
async fn test_backend_success_survives_clear_failure() {
    let (mut service, store) = service();
    let backend = FakeBackend::default();
    store.fail_saves(true);

    let submitted = service
        .checkout_via_backend(&backend, &form(), now())
        .await
        .unwrap();

    assert_eq!(backend.orders().len(), 1);
    assert_eq!(submitted.record.id, "order-1");
    // the saved cart could not be cleared, so the in-memory one is kept too
    assert_eq!(service.engine().cart().line_count(), 2);
}
