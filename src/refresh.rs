//! Batch price refresh with per-product failure isolation
//!
//! Products are refreshed on tokio's blocking pool, at most `concurrency`
//! at a time. Results come back in input order. A product that fails for
//! any reason (unsupported link, fetch, extraction, save, even a panicking
//! worker) is logged and reported as skipped; the rest of the batch is
//! unaffected.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{CatalogStore, Product};
use crate::engine::ExtractionEngine;
use crate::error::{Error, Result};

/// A product the batch could not refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedProduct {
    pub product_id: Option<u64>,
    pub link: String,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RefreshReport {
    /// Saved products, in input order
    pub updated: Vec<Product>,
    pub skipped: Vec<SkippedProduct>,
}

pub struct BatchRefresher {
    engine: Arc<ExtractionEngine>,
    store: Arc<dyn CatalogStore>,
    concurrency: usize,
}

impl BatchRefresher {
    pub fn new(
        engine: Arc<ExtractionEngine>,
        store: Arc<dyn CatalogStore>,
        concurrency: usize,
    ) -> Self {
        Self {
            engine,
            store,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn refresh(&self, products: Vec<Product>) -> RefreshReport {
        let total = products.len();
        info!(total, concurrency = self.concurrency, "refreshing products");

        let results: Vec<(Option<u64>, String, Result<Product>)> = stream::iter(products)
            .map(|product| {
                let engine = Arc::clone(&self.engine);
                let store = Arc::clone(&self.store);
                async move {
                    let id = product.id;
                    let link = product.link.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        refresh_product(&engine, store.as_ref(), product)
                    })
                    .await
                    .unwrap_or_else(|e| Err(Error::Worker(e.to_string())));
                    (id, link, result)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut report = RefreshReport::default();
        for (product_id, link, result) in results {
            match result {
                Ok(product) => report.updated.push(product),
                Err(e) => {
                    warn!(?product_id, link = %link, error = %e, "failed to refresh product");
                    report.skipped.push(SkippedProduct {
                        product_id,
                        link,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            total,
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            "refresh finished"
        );
        report
    }
}

/// Re-scrape one product and save it.
///
/// Price and image are always replaced; the name only when the product has
/// none. Any failure leaves the stored product untouched.
pub fn refresh_product(
    engine: &ExtractionEngine,
    store: &dyn CatalogStore,
    mut product: Product,
) -> Result<Product> {
    let scraper = engine.resolve(&product.link)?;

    product.current_price = Some(scraper.extract_price()?);
    product.image_url = Some(scraper.extract_image()?);
    if !product.has_name() {
        product.name = scraper.extract_name()?;
    }
    product.last_updated = Some(Utc::now());

    store.save_product(product)
}
