//! Product catalog loaded from a local JSON file.

use crate::sellup::models::Product;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Ordered, immutable list of products to quote.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Loads the catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading product catalog from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read products file: {}", path.display()))?;

        let products: Vec<Product> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse products file: {}", path.display()))?;

        debug!("Loaded {} products", products.len());
        Ok(Self { products })
    }

    /// Products in file order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Finds a product by its goods id.
    pub fn find(&self, goods_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.goods_id == goods_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
