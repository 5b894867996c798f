//! Fetch + dispatch + extract

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::fetch::{HttpFetcher, Page, PageFetcher};
use crate::registry::StrategyRegistry;
use crate::sites::{Site, SiteStrategy};

/// Validated product fields scraped from one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionOutcome {
    pub site: Site,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
}

/// Strategy registry paired with the fetcher its strategies read from
pub struct ExtractionEngine {
    registry: StrategyRegistry,
    fetcher: Arc<dyn PageFetcher>,
}

impl ExtractionEngine {
    /// Built-in strategies over a live HTTP fetcher
    pub fn new(config: &ScraperConfig) -> Self {
        Self::with_fetcher(config, Arc::new(HttpFetcher::new(config)))
    }

    /// Built-in strategies over a caller-supplied fetcher
    pub fn with_fetcher(config: &ScraperConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::from_parts(StrategyRegistry::with_defaults(config), fetcher)
    }

    pub fn from_parts(registry: StrategyRegistry, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { registry, fetcher }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn supports(&self, url: &str) -> bool {
        self.registry.supports(url)
    }

    /// Scraper bound to `url`, or [`crate::Error::UnsupportedSite`]
    pub fn resolve(&self, url: &str) -> Result<ProductScraper<'_>> {
        let strategy = self.registry.resolve(url)?;
        debug!(url, site = %strategy.site(), "resolved strategy");
        Ok(ProductScraper {
            url: url.trim().to_string(),
            strategy,
            fetcher: &*self.fetcher,
        })
    }

    /// Name, price and image from a single fetch of `url`
    pub fn extract_product(&self, url: &str) -> Result<ExtractionOutcome> {
        let scraper = self.resolve(url)?;
        let page = scraper.fetch()?;
        let outcome = ExtractionOutcome {
            site: scraper.site(),
            name: scraper.strategy.name(&page)?,
            price: scraper.strategy.price(&page)?,
            image_url: scraper.strategy.image(&page)?,
        };
        info!(url, site = %outcome.site, price = %outcome.price, "extracted product");
        Ok(outcome)
    }
}

/// A URL paired with the strategy that handles it.
///
/// Every `extract_*` call fetches the page again; nothing is cached between
/// calls.
pub struct ProductScraper<'a> {
    url: String,
    strategy: &'a dyn SiteStrategy,
    fetcher: &'a dyn PageFetcher,
}

impl ProductScraper<'_> {
    pub fn site(&self) -> Site {
        self.strategy.site()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Page> {
        self.fetcher.fetch(&self.url)
    }

    pub fn extract_price(&self) -> Result<Decimal> {
        self.strategy.price(&self.fetch()?)
    }

    pub fn extract_name(&self) -> Result<String> {
        self.strategy.name(&self.fetch()?)
    }

    pub fn extract_image(&self) -> Result<String> {
        self.strategy.image(&self.fetch()?)
    }
}
