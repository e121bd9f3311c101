//! Coupon lookup cache.

use std::time::Duration;

use menu_cart_core::coupon::{Coupon, CouponCode};
use moka::future::Cache;
use tracing::debug;

use super::{BackendError, CouponLookup};

/// Caches found coupons by normalized code.
///
/// Misses are not cached, so a coupon created moments ago is found on the
/// next attempt. Errors pass straight through.
#[derive(Clone)]
pub struct CachedCouponLookup<L> {
    lookup: L,
    cache: Cache<String, Coupon>,
}

impl<L: CouponLookup> CachedCouponLookup<L> {
    /// Wrap `lookup`, keeping found coupons for `ttl`.
    #[must_use]
    pub fn new(lookup: L, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(ttl)
            .build();

        Self { lookup, cache }
    }

    /// Drop a cached coupon, e.g. after it was edited in the backend.
    pub async fn invalidate(&self, code: &CouponCode) {
        self.cache.invalidate(code.as_str()).await;
    }
}

impl<L: CouponLookup> CouponLookup for CachedCouponLookup<L> {
    async fn find_coupon_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, BackendError> {
        if let Some(coupon) = self.cache.get(code.as_str()).await {
            debug!(code = %code, "Cache hit for coupon");
            return Ok(Some(coupon));
        }

        let found = self.lookup.find_coupon_by_code(code).await?;
        if let Some(coupon) = &found {
            self.cache
                .insert(code.as_str().to_string(), coupon.clone())
                .await;
        }
        Ok(found)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::testing::coupon;
    use menu_cart_core::coupon::CouponType;

    /// Counts calls and knows a single code.
    #[derive(Clone, Default)]
    struct CountingLookup {
        calls: Arc<AtomicUsize>,
    }

    impl CouponLookup for CountingLookup {
        async fn find_coupon_by_code(
            &self,
            code: &CouponCode,
        ) -> Result<Option<Coupon>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((code.as_str() == "TEN").then(|| coupon("TEN", CouponType::Fixed, 1000)))
        }
    }

    #[tokio::test]
    async fn test_hits_are_cached() {
        let inner = CountingLookup::default();
        let cached = CachedCouponLookup::new(inner.clone(), Duration::from_secs(60));
        let code = CouponCode::parse("ten").unwrap();

        assert!(cached.find_coupon_by_code(&code).await.unwrap().is_some());
        assert!(cached.find_coupon_by_code(&code).await.unwrap().is_some());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        cached.invalidate(&code).await;
        assert!(cached.find_coupon_by_code(&code).await.unwrap().is_some());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let inner = CountingLookup::default();
        let cached = CachedCouponLookup::new(inner.clone(), Duration::from_secs(60));
        let code = CouponCode::parse("nope").unwrap();

        assert!(cached.find_coupon_by_code(&code).await.unwrap().is_none());
        assert!(cached.find_coupon_by_code(&code).await.unwrap().is_none());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
