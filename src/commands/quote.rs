//! Interactive quote lookup: fetch selected products and print, no sheet write.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::format::Formatter;
use crate::pacing::Pacer;
use crate::sellup::client::{SellupClient, SellupQuotes};
use crate::sellup::fetcher::{self, FetchOptions};
use crate::sellup::models::PriceQuoteRow;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

/// Fetches and prints quotes for selected catalog entries.
pub struct QuoteCommand {
    config: Config,
}

impl QuoteCommand {
    /// Creates a new quote command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches quotes for the given goods ids and returns formatted output.
    pub async fn execute(&self, goods_ids: &[String]) -> Result<String> {
        let catalog = Catalog::load(&self.config.products_file)?;
        let client =
            SellupClient::new(&self.config).context("Failed to create SellUp HTTP client")?;

        self.execute_with(&client, &catalog, goods_ids, &Pacer::from(&self.config)).await
    }

    /// Fetches quotes with a provided client (for testing).
    pub async fn execute_with(
        &self,
        client: &impl SellupQuotes,
        catalog: &Catalog,
        goods_ids: &[String],
        pacer: &Pacer,
    ) -> Result<String> {
        let opts = FetchOptions {
            max_retries: self.config.max_retries,
            retry_delay: Duration::from_secs(self.config.retry_delay_secs),
        };

        let mut rows: Vec<PriceQuoteRow> = Vec::new();
        let mut processed = 0;

        for goods_id in goods_ids {
            let Some(product) = catalog.find(goods_id) else {
                eprintln!("Skipping unknown goods_id: {}", goods_id);
                continue;
            };

            info!("Quoting {} ({})", product.product_name, product.goods_id);
            rows.extend(fetcher::fetch_quotes(client, product, &opts).await);

            processed += 1;
            let pause = pacer.pause_after(processed);
            if !pause.is_zero() && processed < goods_ids.len() {
                tokio::time::sleep(pause).await;
            }
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_rows(&rows))
    }
}
