//! Runtime settings for fetching and refreshing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Desktop browser user agent; bare library agents get blocked outright by
/// most retailers.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// User-Agent header sent with every page request
    pub user_agent: String,
    /// Ceiling for a single page fetch, connect to last byte
    pub timeout_secs: u64,
    /// Prices must be strictly greater than this to be accepted
    pub min_valid_price: Decimal,
    /// Number of products refreshed in parallel by the batch refresher
    pub refresh_concurrency: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            min_valid_price: Decimal::ONE,
            refresh_concurrency: 4,
        }
    }
}

impl ScraperConfig {
    /// Parse a JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ScraperConfig =
            serde_json::from_str(json).map_err(|e| Error::parse(json, e))?;
        if config.refresh_concurrency == 0 {
            return Err(Error::Validation(
                "refresh_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}
