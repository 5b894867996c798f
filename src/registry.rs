//! URL to strategy resolution

use tracing::{debug, warn};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use crate::sites::{default_strategies, Site, SiteStrategy};

/// Ordered set of site strategies.
///
/// Resolution walks strategies in registration order and the first match
/// wins, so the answer for a given URL is always the same.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn SiteStrategy>>,
}

impl StrategyRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self { strategies: vec![] }
    }

    /// Registry holding the built-in Amazon, Kabum, Mercado Livre and
    /// AliExpress strategies
    pub fn with_defaults(config: &ScraperConfig) -> Self {
        Self {
            strategies: default_strategies(config),
        }
    }

    /// Append a strategy; it is consulted after every one already registered
    pub fn register(&mut self, strategy: Box<dyn SiteStrategy>) {
        debug!(site = %strategy.site(), "registering strategy");
        self.strategies.push(strategy);
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy responsible for `url`.
    ///
    /// URLs that don't parse, or that no strategy claims, are
    /// [`Error::UnsupportedSite`].
    pub fn resolve(&self, url: &str) -> Result<&dyn SiteStrategy> {
        let unsupported = || Error::UnsupportedSite {
            url: url.to_string(),
        };
        let parsed = Url::parse(url.trim()).map_err(|_| unsupported())?;

        let mut matching = self.strategies.iter().filter(|s| s.matches(&parsed));
        let Some(first) = matching.next() else {
            debug!(url, "no strategy matches");
            return Err(unsupported());
        };

        let others: Vec<Site> = matching.map(|s| s.site()).collect();
        if !others.is_empty() {
            warn!(url, chosen = %first.site(), ?others, "several strategies match, using the first registered");
        }
        Ok(&**first)
    }

    pub fn supports(&self, url: &str) -> bool {
        self.resolve(url).is_ok()
    }

    /// Every site whose strategy claims `url`, in registration order
    pub fn matching_sites(&self, url: &str) -> Vec<Site> {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return vec![];
        };
        self.strategies
            .iter()
            .filter(|s| s.matches(&parsed))
            .map(|s| s.site())
            .collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults(&ScraperConfig::default())
    }
}
