//! SellUp-specific modules for the HTTP client, data models, and fetch loop.

pub mod client;
pub mod fetcher;
pub mod models;

pub use client::{SellupClient, SellupError, SellupQuotes};
pub use fetcher::{fetch_quotes, FetchOptions};
pub use models::{DealerPrice, PriceQuoteRow, Product};
