//! sellup-tracker - SellUp buyback price tracker
//!
//! Fetches dealer buyback quotes from the SellUp pricing endpoint and
//! performs a clear-and-rewrite sync into a Google Sheets tab.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod format;
pub mod pacing;
pub mod sellup;
pub mod sheets;

pub use config::Config;
pub use sellup::models::{DealerPrice, PriceQuoteRow, Product};
