//! Per-product fetch loop: token step, price step, bounded retry.

use crate::sellup::client::SellupQuotes;
use crate::sellup::models::{self, PriceQuoteRow, Product};
use std::time::Duration;
use tracing::{info, warn};

/// Retry policy for a single product.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Attempts before the product is abandoned.
    pub max_retries: u32,
    /// Fixed wait between attempts.
    pub retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { max_retries: 3, retry_delay: Duration::from_secs(5) }
    }
}

impl FetchOptions {
    /// Zero-delay options for tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self { max_retries, retry_delay: Duration::ZERO }
    }
}

/// Fetches all dealer quotes for one product.
///
/// Each attempt runs the full two-step exchange from the start: a failure in
/// either step burns one retry and waits `retry_delay` before the next token
/// request. Exhausting the cap yields an empty vec; the caller moves on to
/// the next product.
pub async fn fetch_quotes(
    client: &impl SellupQuotes,
    product: &Product,
    opts: &FetchOptions,
) -> Vec<PriceQuoteRow> {
    let mut retries = 0;

    while retries < opts.max_retries {
        let now = models::sgt_now();
        let date = models::selected_date(now);

        let offers = match client.request_token(product, &date).await {
            Ok(token) => client.dealer_prices(product, &token).await,
            Err(e) => Err(e),
        };

        match offers {
            Ok(offers) => {
                let captured_at = models::capture_stamp(now);
                let rows: Vec<PriceQuoteRow> = offers
                    .iter()
                    .map(|offer| PriceQuoteRow::from_offer(product, offer, &captured_at))
                    .collect();

                info!(
                    "Fetched {} dealer quotes for {} ({})",
                    rows.len(),
                    product.product_name,
                    product.goods_id
                );
                return rows;
            }
            Err(e) => {
                retries += 1;
                warn!(
                    "Attempt {}/{} failed for {} ({}): {}",
                    retries, opts.max_retries, product.product_name, product.goods_id, e
                );

                if retries < opts.max_retries && !opts.retry_delay.is_zero() {
                    tokio::time::sleep(opts.retry_delay).await;
                }
            }
        }
    }

    warn!("Giving up on {} ({}) after {} attempts", product.product_name, product.goods_id, retries);
    Vec::new()
}
