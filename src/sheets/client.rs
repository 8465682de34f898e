//! Clear-and-rewrite sink for the Sheets v4 values API.

use crate::config::Config;
use crate::sellup::models::PriceQuoteRow;
use crate::sheets::auth::ServiceAccount;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

const SHEETS_BASE: &str = "https://sheets.googleapis.com";

/// Destination for a run's collected quote rows.
#[async_trait]
pub trait QuoteSink: Send + Sync {
    /// Replaces the sink's entire content with `rows` (plus the header).
    async fn flush(&self, rows: &[PriceQuoteRow]) -> Result<()>;
}

/// Google Sheets sink: wipes the tab, writes the header at A1, then the rows
/// at A2 in one bulk update. Failures are fatal and never retried.
pub struct SheetsSink {
    client: Client,
    base_url: String,
    token: String,
    spreadsheet_id: String,
    worksheet: String,
}

impl SheetsSink {
    /// Authenticates with the configured service account and builds the sink.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let account = ServiceAccount::from_file(&config.service_account_file)?;
        let token = account
            .fetch_access_token(&client)
            .await
            .context("Failed to obtain Sheets access token")?;

        Ok(Self {
            client,
            base_url: SHEETS_BASE.to_string(),
            token: token.access_token,
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
        })
    }

    /// Builds a sink against an explicit endpoint with a fixed token (for testing).
    pub fn with_parts(
        base_url: String,
        token: String,
        spreadsheet_id: String,
        worksheet: String,
    ) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, base_url, token, spreadsheet_id, worksheet })
    }

    /// A1-notation range anchored at `cell`, quoted for tab names with spaces.
    fn range(&self, cell: &str) -> String {
        format!("'{}'!{}", self.worksheet, cell)
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range),
            suffix
        )
    }

    /// Clears the whole tab.
    async fn clear(&self) -> Result<()> {
        // A quoted bare sheet name addresses the entire tab
        let url = self.values_url(&format!("'{}'", self.worksheet), ":clear");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .body("{}")
            .send()
            .await
            .context("Clear request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Clearing worksheet failed with status: {}", status);
        }

        info!("Cleared worksheet '{}'", self.worksheet);
        Ok(())
    }

    /// Writes `values` starting at `cell`.
    async fn update(&self, cell: &str, values: Vec<Vec<serde_json::Value>>) -> Result<()> {
        let range = self.range(cell);
        let url = self.values_url(&range, "?valueInputOption=RAW");
        debug!("PUT {}", url);

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .context("Update request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Worksheet update failed with status: {}", status);
        }

        Ok(())
    }
}

#[async_trait]
impl QuoteSink for SheetsSink {
    async fn flush(&self, rows: &[PriceQuoteRow]) -> Result<()> {
        self.clear().await?;

        let header: Vec<serde_json::Value> =
            PriceQuoteRow::HEADER.iter().map(|h| json!(h)).collect();
        self.update("A1", vec![header]).await?;

        if rows.is_empty() {
            info!("No quote rows to write; worksheet holds header only");
            return Ok(());
        }

        let values: Vec<Vec<serde_json::Value>> = rows.iter().map(|r| r.to_cells()).collect();
        let count = values.len();
        self.update("A2", values).await?;

        info!("Wrote {} quote rows to '{}'", count, self.worksheet);
        Ok(())
    }
}
