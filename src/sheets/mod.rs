//! Google Sheets sink: service-account auth and the clear-and-rewrite client.

pub mod auth;
pub mod client;

pub use auth::{AccessToken, ServiceAccount};
pub use client::{QuoteSink, SheetsSink};
