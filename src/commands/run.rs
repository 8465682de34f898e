//! Full sync run: fetch every catalog product, pace between them, flush once.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::format::Formatter;
use crate::pacing::Pacer;
use crate::sellup::client::{SellupClient, SellupQuotes};
use crate::sellup::fetcher::{self, FetchOptions};
use crate::sellup::models::PriceQuoteRow;
use crate::sheets::client::{QuoteSink, SheetsSink};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Executes the full tracking run.
pub struct RunCommand {
    config: Config,
    dry_run: bool,
}

impl RunCommand {
    /// Creates a new run command.
    pub fn new(config: Config, dry_run: bool) -> Self {
        Self { config, dry_run }
    }

    /// Runs the job end to end with real client and sink.
    pub async fn execute(&self) -> Result<String> {
        let catalog = Catalog::load(&self.config.products_file)?;
        let client =
            SellupClient::new(&self.config).context("Failed to create SellUp HTTP client")?;

        if self.dry_run {
            let rows = self.collect(&client, &catalog, &Pacer::from(&self.config)).await;
            let formatter = Formatter::new(self.config.format);
            return Ok(formatter.format_rows(&rows));
        }

        let sink =
            SheetsSink::connect(&self.config).await.context("Failed to connect Sheets sink")?;
        self.execute_with(&client, &sink, &catalog, &Pacer::from(&self.config)).await
    }

    /// Runs with provided client/sink/pacer (for testing).
    pub async fn execute_with(
        &self,
        client: &impl SellupQuotes,
        sink: &impl QuoteSink,
        catalog: &Catalog,
        pacer: &Pacer,
    ) -> Result<String> {
        let rows = self.collect(client, catalog, pacer).await;

        sink.flush(&rows).await.context("Failed to write quotes to the sheet")?;

        Ok(format!("Synced {} quote rows from {} products", rows.len(), self.product_count(catalog)))
    }

    fn product_count(&self, catalog: &Catalog) -> usize {
        match self.config.limit {
            Some(limit) => catalog.len().min(limit),
            None => catalog.len(),
        }
    }

    /// Sequentially fetches quotes for every product, pacing after each.
    async fn collect(
        &self,
        client: &impl SellupQuotes,
        catalog: &Catalog,
        pacer: &Pacer,
    ) -> Vec<PriceQuoteRow> {
        let opts = FetchOptions {
            max_retries: self.config.max_retries,
            retry_delay: Duration::from_secs(self.config.retry_delay_secs),
        };

        let mut rows: Vec<PriceQuoteRow> = Vec::new();
        let total = self.product_count(catalog);

        for (index, product) in catalog.products().iter().take(total).enumerate() {
            let processed = index + 1;
            info!(
                "Processing {} ({}) - {} of {}",
                product.product_name, product.goods_id, processed, total
            );

            let fetched = fetcher::fetch_quotes(client, product, &opts).await;
            rows.extend(fetched);

            let pause = pacer.pause_after(processed);
            if !pause.is_zero() {
                debug!("Pausing {:?} after {} products", pause, processed);
                tokio::time::sleep(pause).await;
            }
        }

        info!("Collected {} quote rows", rows.len());
        rows
    }
}
