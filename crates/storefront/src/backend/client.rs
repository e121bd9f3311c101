//! REST client for the hosted data backend.
//!
//! Entities live under `<base>/entities/<name>`. Lists are filtered with a
//! JSON `filter` query parameter and come back as `{ "list": [...] }`.

use std::sync::Arc;

use menu_cart_core::coupon::{Coupon, CouponCode};
use menu_cart_core::order::OrderPayload;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{BackendError, CouponLookup, OrderBackend, OrderRecord};
use crate::config::BackendConfig;

const COUPONS_PATH: &str = "entities/coupons";
const ORDERS_PATH: &str = "entities/orders";

/// Client for the hosted data backend.
#[derive(Clone)]
pub struct HostedBackendClient {
    inner: Arc<HostedBackendClientInner>,
}

struct HostedBackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HostedBackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.api_token {
            let auth_value = format!("Bearer {}", token.expose_secret());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| BackendError::Parse(format!("Invalid API token format: {e}")))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(HostedBackendClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// URL listing active coupons with the given code.
    fn coupon_query_url(&self, code: &CouponCode) -> Result<Url, BackendError> {
        let mut url = self.endpoint(COUPONS_PATH)?;
        let filter = serde_json::json!({ "code": code.as_str(), "isActive": true });
        url.query_pairs_mut()
            .append_pair("filter", &filter.to_string());
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| BackendError::Parse(format!("Invalid endpoint {path}: {e}")))
    }
}

impl CouponLookup for HostedBackendClient {
    #[instrument(skip(self), fields(code = %code))]
    async fn find_coupon_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, BackendError> {
        let url = self.coupon_query_url(code)?;
        let response = self.inner.client.get(url).send().await?;
        let body: ListResponse<Coupon> = read_json(response).await?;

        let coupon = body
            .list
            .into_iter()
            .find(|coupon| coupon.code == *code && coupon.is_active);
        debug!(found = coupon.is_some(), "coupon lookup finished");
        Ok(coupon)
    }
}

impl OrderBackend for HostedBackendClient {
    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    async fn create_order(&self, order: &OrderPayload) -> Result<OrderRecord, BackendError> {
        let url = self.endpoint(ORDERS_PATH)?;
        let response = self.inner.client.post(url).json(order).send().await?;
        let record: OrderRecord = read_json(response).await?;

        info!(record_id = %record.id, "order created");
        Ok(record)
    }
}

/// Wrapper for entity list responses.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    list: Vec<T>,
}

/// Check the status, then decode the body, logging a snippet on failure.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "backend returned non-success status"
        );
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        warn!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "failed to parse backend response"
        );
        BackendError::Parse(e.to_string())
    })
}
