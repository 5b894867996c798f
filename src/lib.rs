//! Product scraper for wish lists
//!
//! Pulls name, current price and main image out of retailer product pages:
//! - per-site strategies (Amazon, Kabum, Mercado Livre, AliExpress) picked
//!   by URL host
//! - ordered extraction cascades over meta tags, JSON-LD, inline scripts,
//!   CSS selectors and raw markup
//! - locale-aware price parsing (`R$ 1.234,56`, `$1,234.56`)
//! - batch price refresh with per-product failure isolation
//!
//! Also exposes an in-memory wish-list catalog and a C ABI (see [`ffi`]).

pub mod cascade;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod ffi;
pub mod logging;
pub mod refresh;
pub mod registry;
pub mod sites;

pub use config::ScraperConfig;
pub use engine::{ExtractionEngine, ExtractionOutcome, ProductScraper};
pub use error::{Error, Field, Result};
pub use fetch::{HttpFetcher, Page, PageFetcher, StaticFetcher};
pub use refresh::{BatchRefresher, RefreshReport, SkippedProduct};
pub use registry::StrategyRegistry;
pub use sites::{Site, SiteStrategy};
