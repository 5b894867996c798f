//! Page retrieval and parsing
//!
//! Every extraction call fetches its own copy of the page. Nothing here
//! caches or retries; callers that want either layer it on top.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use scraper::Html;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::{Error, Result};

/// A fetched page: the raw markup plus its parsed tree.
///
/// Owned by the extraction call that fetched it and dropped when that call
/// returns.
#[derive(Debug)]
pub struct Page {
    pub url: String,
    pub source: String,
    pub document: Html,
}

impl Page {
    pub fn parse(url: &str, source: String) -> Self {
        let document = Html::parse_document(&source);
        Self {
            url: url.to_string(),
            source,
            document,
        }
    }
}

/// Source of page markup
pub trait PageFetcher: Send + Sync {
    /// Raw markup for `url`
    fn fetch_source(&self, url: &str) -> Result<String>;

    fn fetch(&self, url: &str) -> Result<Page> {
        let source = self.fetch_source(url)?;
        Ok(Page::parse(url, source))
    }
}

/// Blocking HTTP fetcher with a global timeout and browser user agent
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
                .user_agent(config.user_agent.as_str())
                .build(),
        );
        Self { agent }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch_source(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");
        let fetch_error = |reason: String| Error::Fetch {
            url: url.to_string(),
            reason,
        };

        match self.agent.get(url).call() {
            Ok(resp) => {
                if !resp.status().is_success() {
                    return Err(fetch_error(format!("HTTP {}", resp.status())));
                }
                resp.into_body()
                    .read_to_string()
                    .map_err(|e| fetch_error(format!("failed to read body: {e}")))
            }
            Err(ureq::Error::StatusCode(code)) => Err(fetch_error(format!("HTTP {code}"))),
            Err(e) => Err(fetch_error(e.to_string())),
        }
    }
}

/// Serves canned markup keyed by URL; anything else is a 404.
///
/// Used for offline runs against saved pages and in tests.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Number of fetch attempts served so far, misses included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch_source(&self, url: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| Error::Fetch {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        })
    }
}
