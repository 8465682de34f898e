//! Data models for catalog products, pricing responses, and quote rows.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// SellUp quotes are stamped in Singapore time (UTC+8, no DST).
const SGT_OFFSET_SECS: i32 = 8 * 3600;

/// Returns the current time in Singapore.
pub fn sgt_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(SGT_OFFSET_SECS).expect("valid UTC+8 offset");
    Utc::now().with_timezone(&offset)
}

/// Formats a capture timestamp the way the sheet expects it.
pub fn capture_stamp(time: DateTime<FixedOffset>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats the "selected date" sent with the token request.
pub fn selected_date(time: DateTime<FixedOffset>) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// One entry in the product catalog. Loaded once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// SellUp goods identifier
    pub goods_id: String,
    /// Human-readable product name
    pub product_name: String,
    /// Product page URL, sent as the Referer header
    pub referer: String,
    /// Opaque configuration blob the endpoint expects back verbatim
    pub data: String,
}

/// Response envelope shared by both pricing endpoints.
///
/// `errorCode == 0` with non-null `data` is success; anything else is a
/// logical API failure carrying an optional `error` message.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(rename = "errorCode")]
    pub error_code: i64,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Payload of a successful token request.
#[derive(Debug, Deserialize)]
pub struct TokenData {
    pub token: String,
}

/// Payload of a successful price request.
#[derive(Debug, Deserialize)]
pub struct PriceData {
    #[serde(rename = "dealerPrices")]
    pub dealer_prices: Vec<DealerPrice>,
}

/// One dealer's offer for the queried configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DealerPrice {
    #[serde(rename = "dealerId", deserialize_with = "string_or_number")]
    pub dealer_id: String,
    pub dealer: Dealer,
    #[serde(rename = "skuPrice")]
    pub sku_price: f64,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
}

/// Dealer metadata attached to each offer.
#[derive(Debug, Clone, Deserialize)]
pub struct Dealer {
    pub name: String,
}

// The endpoint is inconsistent about dealerId: sometimes a JSON number,
// sometimes a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

/// One output row: a single dealer quote for a single product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuoteRow {
    pub goods_id: String,
    pub product_name: String,
    #[serde(rename = "dealerId")]
    pub dealer_id: String,
    #[serde(rename = "dealerName")]
    pub dealer_name: String,
    #[serde(rename = "skuPrice")]
    pub sku_price: f64,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
    pub updated_at: String,
}

impl PriceQuoteRow {
    /// Column headers, in sheet order.
    pub const HEADER: [&'static str; 7] = [
        "goods_id",
        "product_name",
        "dealerId",
        "dealerName",
        "skuPrice",
        "totalPrice",
        "updated_at",
    ];

    /// Builds a row from a dealer offer, stamped with the capture time.
    pub fn from_offer(product: &Product, offer: &DealerPrice, captured_at: &str) -> Self {
        Self {
            goods_id: product.goods_id.clone(),
            product_name: product.product_name.clone(),
            dealer_id: offer.dealer_id.clone(),
            dealer_name: offer.dealer.name.clone(),
            sku_price: offer.sku_price,
            total_price: offer.total_price,
            updated_at: captured_at.to_string(),
        }
    }

    /// Cell values for the sheet write, in header order.
    pub fn to_cells(&self) -> Vec<serde_json::Value> {
        vec![
            serde_json::Value::String(self.goods_id.clone()),
            serde_json::Value::String(self.product_name.clone()),
            serde_json::Value::String(self.dealer_id.clone()),
            serde_json::Value::String(self.dealer_name.clone()),
            serde_json::json!(self.sku_price),
            serde_json::json!(self.total_price),
            serde_json::Value::String(self.updated_at.clone()),
        ]
    }
}
