//! Checkout orchestration.
//!
//! [`CheckoutService`] ties the cart engine to pricing, the applied coupon
//! and the two ways an order leaves the storefront:
//!
//! - **Chat**: the order is rendered as a message inside a deep link and the
//!   cart is cleared as soon as the link exists, before anyone sends it.
//! - **Backend**: the order is submitted to the hosted backend and the cart is
//!   cleared only once the backend has accepted it.

use chrono::{DateTime, Utc};
use menu_cart_core::cart::{CartEngine, CartError};
use menu_cart_core::catalog::VendorProfile;
use menu_cart_core::coupon::{AppliedCoupon, Coupon, CouponCode};
use menu_cart_core::order::{self, CheckoutForm, OrderError, OrderPayload, render_message};
use menu_cart_core::persistence::CartStore;
use menu_cart_core::pricing::{PricingBreakdown, PricingConfig};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use url::Url;

use crate::backend::{CouponLookup, OrderBackend, OrderRecord};
use crate::chat::chat_link;
use crate::error::Result;

/// A chat checkout ready to be opened.
#[derive(Debug, Clone)]
pub struct ChatCheckout {
    pub order: OrderPayload,
    pub message: String,
    pub link: Url,
}

/// An order the backend accepted.
#[derive(Debug, Clone)]
pub struct SubmittedOrder {
    pub order: OrderPayload,
    pub record: OrderRecord,
}

/// One shopper's checkout session.
#[derive(Debug)]
pub struct CheckoutService<S> {
    engine: CartEngine<S>,
    pricing: PricingConfig,
    coupon: AppliedCoupon,
}

impl<S: CartStore> CheckoutService<S> {
    #[must_use]
    pub fn new(engine: CartEngine<S>, pricing: PricingConfig) -> Self {
        Self {
            engine,
            pricing,
            coupon: AppliedCoupon::new(),
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &CartEngine<S> {
        &self.engine
    }

    /// Cart mutations go through the engine directly.
    pub fn engine_mut(&mut self) -> &mut CartEngine<S> {
        &mut self.engine
    }

    #[must_use]
    pub const fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    #[must_use]
    pub const fn applied_coupon(&self) -> Option<&Coupon> {
        self.coupon.current()
    }

    /// Current prices, with the applied coupon's discount recomputed for the
    /// current subtotal.
    #[must_use]
    pub fn quote(&self) -> PricingBreakdown {
        PricingBreakdown::compute(self.engine.cart(), &self.pricing, self.coupon.current())
    }

    /// Look up a coupon and apply it, replacing any applied coupon.
    ///
    /// Returns the discount it gives right now. On any failure the
    /// previously applied coupon stays in place.
    ///
    /// # Errors
    ///
    /// - [`CouponError::EmptyCode`](menu_cart_core::coupon::CouponError::EmptyCode) for blank input
    /// - [`CheckoutError::Backend`](crate::error::CheckoutError::Backend) if the lookup failed
    /// - any other [`CouponError`](menu_cart_core::coupon::CouponError) from evaluation
    #[instrument(skip(self, lookup, now))]
    pub async fn apply_coupon<L: CouponLookup>(
        &mut self,
        lookup: &L,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        let code = CouponCode::parse(code)?;
        let found = lookup
            .find_coupon_by_code(&code)
            .await
            .inspect_err(|e| warn!(error = %e, "coupon lookup failed"))?;

        let base = PricingBreakdown::compute(self.engine.cart(), &self.pricing, None);
        let discount = self
            .coupon
            .apply(found, base.subtotal, base.delivery_fee, now)
            .inspect_err(|e| info!(reason = %e, "coupon rejected"))?;
        Ok(discount)
    }

    /// Remove the applied coupon, returning it.
    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        self.coupon.remove()
    }

    /// Assemble the order, render it and build the vendor's chat link.
    ///
    /// The cart and the applied coupon are cleared once the link is built.
    /// If anything before that fails, nothing changes.
    ///
    /// # Errors
    ///
    /// - [`OrderError`] if the form is incomplete or the cart is empty
    /// - [`CartError::VendorMismatch`] if `vendor` is not the cart's vendor
    /// - [`ChatLinkError`](crate::chat::ChatLinkError) if the vendor number is not dialable
    /// - [`CartError::Persistence`] if clearing the saved cart failed
    #[instrument(skip_all, fields(vendor_id = %vendor.id))]
    pub fn checkout_via_chat(
        &mut self,
        form: &CheckoutForm,
        vendor: &VendorProfile,
        now: DateTime<Utc>,
    ) -> Result<ChatCheckout> {
        let order = self.assemble(form, now)?;
        if order.vendor_id != vendor.id {
            return Err(CartError::VendorMismatch {
                cart_vendor: order.vendor_name,
                attempted: vendor.id.clone(),
            }
            .into());
        }

        let message = render_message(&order, self.pricing.currency);
        let link = chat_link(&vendor.contact_number, &message)?;

        self.engine.clear()?;
        self.coupon.remove();
        info!(order_number = %order.order_number, "chat order prepared, cart cleared");

        Ok(ChatCheckout {
            order,
            message,
            link,
        })
    }

    /// Assemble the order and submit it to the backend.
    ///
    /// The cart and the applied coupon are cleared only after the backend
    /// accepts the order. A failed submission leaves both untouched.
    ///
    /// # Errors
    ///
    /// - [`OrderError`] if the form is incomplete or the cart is empty
    /// - [`CheckoutError::Backend`](crate::error::CheckoutError::Backend) if submission failed
    #[instrument(skip_all)]
    pub async fn checkout_via_backend<B: OrderBackend>(
        &mut self,
        backend: &B,
        form: &CheckoutForm,
        now: DateTime<Utc>,
    ) -> Result<SubmittedOrder> {
        let order = self.assemble(form, now)?;
        let record = backend
            .create_order(&order)
            .await
            .inspect_err(|e| warn!(error = %e, "order submission failed, cart kept"))?;

        // The order exists now; a retry would duplicate it.
        if let Err(e) = self.engine.clear() {
            warn!(error = %e, "order submitted but the saved cart could not be cleared");
        }
        self.coupon.remove();
        info!(order_number = %order.order_number, record_id = %record.id, "order submitted");

        Ok(SubmittedOrder { order, record })
    }

    fn assemble(&self, form: &CheckoutForm, now: DateTime<Utc>) -> std::result::Result<OrderPayload, OrderError> {
        let pricing = self.quote();
        order::assemble(
            self.engine.cart(),
            form,
            &pricing,
            self.coupon.current(),
            self.pricing.delivery_lead_time(),
            now,
        )
    }
}
