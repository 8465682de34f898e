//! HTTP client for the SellUp pricing endpoint using wreq for TLS
//! fingerprint emulation.

use crate::config::Config;
use crate::sellup::models::{ApiEnvelope, PriceData, Product, TokenData};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

const SELLUP_BASE: &str = "https://sellup.com.sg";

/// Why a pricing call failed. The retry loop treats every variant the same;
/// the split exists so failures are observable and testable without a catch-all.
#[derive(Debug, Error)]
pub enum SellupError {
    /// Transport failure or non-2xx status.
    #[error("request failed: {0}")]
    Network(String),

    /// Body was not the JSON shape the endpoint documents.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Endpoint answered with a non-zero errorCode or null data.
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },
}

/// Trait for the two-step quote exchange - enables mocking for tests.
#[async_trait]
pub trait SellupQuotes: Send + Sync {
    /// Requests a short-lived token authorizing a price lookup for `product`.
    async fn request_token(
        &self,
        product: &Product,
        selected_date: &str,
    ) -> Result<String, SellupError>;

    /// Requests dealer offers for `product` using a previously issued token.
    async fn dealer_prices(
        &self,
        product: &Product,
        token: &str,
    ) -> Result<Vec<crate::sellup::models::DealerPrice>, SellupError>;
}

/// SellUp HTTP client with browser impersonation.
///
/// The cookie store carries session state across every request of a run,
/// matching what the endpoint expects from a real browser.
pub struct SellupClient {
    client: Client,
    base_url: Option<String>,
}

impl SellupClient {
    /// Creates a new SellUp client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new SellUp client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// Returns the base URL (custom for testing, or the live endpoint).
    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| SELLUP_BASE.to_string())
    }

    /// Form-POSTs to the ajax endpoint and unwraps the response envelope.
    async fn post_action<T: DeserializeOwned>(
        &self,
        product: &Product,
        form: &[(&str, &str)],
    ) -> Result<T, SellupError> {
        let url = format!("{}/ajax.php", self.base_url());

        debug!("POST {} action={}", url, form.first().map(|(_, v)| *v).unwrap_or(""));

        let response = self
            .client
            .post(&url)
            .emulation(Emulation::Chrome131)
            .header("Referer", &product.referer)
            .header("Origin", SELLUP_BASE)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(form)
            .send()
            .await
            .map_err(|e| SellupError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(SellupError::Network(format!("status {}", status)));
        }

        let body = response.text().await.map_err(|e| SellupError::Network(e.to_string()))?;

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;

        match envelope.data {
            Some(data) if envelope.error_code == 0 => Ok(data),
            _ => {
                let message = envelope.error.unwrap_or_else(|| "no data".to_string());
                warn!("SellUp api error {}: {}", envelope.error_code, message);
                Err(SellupError::Api { code: envelope.error_code, message })
            }
        }
    }
}

#[async_trait]
impl SellupQuotes for SellupClient {
    async fn request_token(
        &self,
        product: &Product,
        selected_date: &str,
    ) -> Result<String, SellupError> {
        // "seletedDate" is the endpoint's own spelling
        let form = [
            ("action", "Calculate"),
            ("deviceType", "1"),
            ("goods_id", product.goods_id.as_str()),
            ("seletedDate", selected_date),
            ("data[]", product.data.as_str()),
        ];

        let data: TokenData = self.post_action(product, &form).await?;
        debug!("Token issued for goods_id {}", product.goods_id);
        Ok(data.token)
    }

    async fn dealer_prices(
        &self,
        product: &Product,
        token: &str,
    ) -> Result<Vec<crate::sellup::models::DealerPrice>, SellupError> {
        let form = [
            ("action", "onSite"),
            ("deviceType", "1"),
            ("goods_id", product.goods_id.as_str()),
            ("token", token),
            ("data[]", product.data.as_str()),
        ];

        let data: PriceData = self.post_action(product, &form).await?;
        Ok(data.dealer_prices)
    }
}
