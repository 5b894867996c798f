//! Selector-chain strategy shared by the shallow-markup sites

use rust_decimal::Decimal;
use url::Url;

use super::{host, Site, SiteStrategy};
use crate::cascade::{run_cascade, Stage};
use crate::config::ScraperConfig;
use crate::error::{Field, Result};
use crate::extractors::{
    find_first_image_url, find_first_text, is_valid_price, join_split_price, parse_price,
    SelectorChain,
};
use crate::fetch::Page;

/// How a strategy recognises its retailer's hosts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPattern {
    /// Host contains the fragment anywhere; `amazon.` covers every regional
    /// TLD and subdomain
    Contains(String),
    /// The domain itself or any subdomain of it
    Domain(String),
}

impl HostPattern {
    pub fn matches(&self, host: &str) -> bool {
        match self {
            HostPattern::Contains(fragment) => host.contains(fragment.as_str()),
            HostPattern::Domain(domain) => {
                host == domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
        }
    }
}

/// Price split into whole and fraction elements inside one container
#[derive(Debug, Clone)]
struct SplitPrice {
    container: String,
    whole: String,
    fraction: String,
}

/// Price, name and image each come from a short selector chain.
///
/// Price runs three stages: the lead chain (structured markers such as
/// price meta tags), then the split whole/fraction elements, then the
/// generic price chain.
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    site: Site,
    hosts: Vec<HostPattern>,
    lead_price: SelectorChain,
    split_price: Option<SplitPrice>,
    price: SelectorChain,
    name: SelectorChain,
    image: SelectorChain,
    min_valid_price: Decimal,
}

const PRICE_STAGES: &[Stage<SimpleStrategy, Decimal>] = &[
    Stage {
        name: "lead price selectors",
        run: SimpleStrategy::price_from_lead,
    },
    Stage {
        name: "split price",
        run: SimpleStrategy::price_from_split,
    },
    Stage {
        name: "price selectors",
        run: SimpleStrategy::price_from_selectors,
    },
];

const NAME_STAGES: &[Stage<SimpleStrategy, String>] = &[Stage {
    name: "name selectors",
    run: SimpleStrategy::name_from_selectors,
}];

const IMAGE_STAGES: &[Stage<SimpleStrategy, String>] = &[Stage {
    name: "image selectors",
    run: SimpleStrategy::image_from_selectors,
}];

impl SimpleStrategy {
    pub fn new(site: Site, config: &ScraperConfig) -> Self {
        Self {
            site,
            hosts: vec![],
            lead_price: SelectorChain::default(),
            split_price: None,
            price: SelectorChain::default(),
            name: SelectorChain::default(),
            image: SelectorChain::default(),
            min_valid_price: config.min_valid_price,
        }
    }

    pub fn with_hosts(mut self, hosts: Vec<HostPattern>) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn with_lead_price_selectors(mut self, chain: SelectorChain) -> Self {
        self.lead_price = chain;
        self
    }

    /// Whole and fraction selectors for prices split across two elements,
    /// both read from inside the same `container`
    pub fn with_split_price(mut self, container: &str, whole: &str, fraction: &str) -> Self {
        self.split_price = Some(SplitPrice {
            container: container.to_string(),
            whole: whole.to_string(),
            fraction: fraction.to_string(),
        });
        self
    }

    pub fn with_price_selectors(mut self, chain: SelectorChain) -> Self {
        self.price = chain;
        self
    }

    pub fn with_name_selectors(mut self, chain: SelectorChain) -> Self {
        self.name = chain;
        self
    }

    pub fn with_image_selectors(mut self, chain: SelectorChain) -> Self {
        self.image = chain;
        self
    }

    fn price_from_lead(&self, page: &Page) -> Result<Option<Decimal>> {
        price_from_chain(page, &self.lead_price)
    }

    fn price_from_split(&self, page: &Page) -> Result<Option<Decimal>> {
        let Some(split) = &self.split_price else {
            return Ok(None);
        };
        join_split_price(&page.document, &split.container, &split.whole, &split.fraction)
            .map(|raw| parse_price(&raw))
            .transpose()
    }

    fn price_from_selectors(&self, page: &Page) -> Result<Option<Decimal>> {
        price_from_chain(page, &self.price)
    }

    fn name_from_selectors(&self, page: &Page) -> Result<Option<String>> {
        Ok(find_first_text(&page.document, &self.name))
    }

    fn image_from_selectors(&self, page: &Page) -> Result<Option<String>> {
        Ok(find_first_image_url(&page.document, &self.image))
    }
}

fn price_from_chain(page: &Page, chain: &SelectorChain) -> Result<Option<Decimal>> {
    find_first_text(&page.document, chain)
        .map(|raw| parse_price(&raw))
        .transpose()
}

impl SiteStrategy for SimpleStrategy {
    fn site(&self) -> Site {
        self.site
    }

    fn matches(&self, url: &Url) -> bool {
        host(url).is_some_and(|h| self.hosts.iter().any(|p| p.matches(&h)))
    }

    fn price(&self, page: &Page) -> Result<Decimal> {
        run_cascade(
            self,
            page,
            self.site,
            Field::Price,
            PRICE_STAGES,
            |price| is_valid_price(*price, self.min_valid_price),
            None,
        )
    }

    fn name(&self, page: &Page) -> Result<String> {
        run_cascade(
            self,
            page,
            self.site,
            Field::Name,
            NAME_STAGES,
            |name| !name.is_empty(),
            None,
        )
    }

    fn image(&self, page: &Page) -> Result<String> {
        run_cascade(
            self,
            page,
            self.site,
            Field::Image,
            IMAGE_STAGES,
            |src| !src.is_empty(),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extractors::Rule;
    use std::str::FromStr;

    fn strategy() -> SimpleStrategy {
        SimpleStrategy::new(Site::Kabum, &ScraperConfig::default())
            .with_hosts(vec![HostPattern::Domain("shop.test".to_string())])
            .with_lead_price_selectors(SelectorChain::of(&["meta[itemprop=price]"]))
            .with_split_price("div.amount", "span.whole", "span.cents")
            .with_price_selectors(SelectorChain::new(vec![
                Rule::css("div.price"),
                Rule::text_matching("span", r"R\$"),
            ]))
            .with_name_selectors(SelectorChain::of(&["h1.title", "h1"]))
            .with_image_selectors(SelectorChain::new(vec![
                Rule::attr("img[data-zoom]", "data-zoom"),
                Rule::css("img"),
            ]))
    }

    #[test]
    fn test_host_patterns() {
        let domain = HostPattern::Domain("ml.com".to_string());
        assert!(domain.matches("ml.com"));
        assert!(domain.matches("www.ml.com"));
        assert!(!domain.matches("html.com"));

        let contains = HostPattern::Contains("amazon.".to_string());
        assert!(contains.matches("www.amazon.co.uk"));
        assert!(!contains.matches("amazonia.org"));
    }

    #[test]
    fn test_matches_uses_host_only() {
        let s = strategy();
        assert!(s.matches(&Url::parse("https://www.shop.test/p/1").unwrap()));
        assert!(!s.matches(&Url::parse("https://other.test/?ref=shop.test").unwrap()));
    }

    #[test]
    fn test_invalid_lead_falls_through_to_split() {
        let html = r#"
        <meta itemprop="price" content="0.00">
        <div class="amount"><span class="whole">2.349</span><span class="cents">90</span></div>
        <div class="price">R$ 9,99</div>
        "#;
        let page = Page::parse("https://shop.test/p", html.to_string());
        assert_eq!(strategy().price(&page).unwrap(), Decimal::from_str("2349.90").unwrap());
    }

    #[test]
    fn test_unparsable_chain_hit_is_not_found() {
        let html = r#"<div class="price">Indisponível</div>"#;
        let page = Page::parse("https://shop.test/p", html.to_string());
        assert!(matches!(
            strategy().price(&page),
            Err(Error::NotFound { field: Field::Price, .. })
        ));
    }

    #[test]
    fn test_text_matching_price() {
        let html = r#"<span>Frete grátis</span><span>R$ 49,90</span>"#;
        let page = Page::parse("https://shop.test/p", html.to_string());
        assert_eq!(strategy().price(&page).unwrap(), Decimal::from_str("49.90").unwrap());
    }

    #[test]
    fn test_zoom_image_preferred() {
        let html = r#"
        <img src="https://cdn.shop.test/small.jpg">
        <img data-zoom="https://cdn.shop.test/zoom.jpg" src="https://cdn.shop.test/medium.jpg">
        "#;
        let page = Page::parse("https://shop.test/p", html.to_string());
        assert_eq!(strategy().image(&page).unwrap(), "https://cdn.shop.test/zoom.jpg");
    }

    #[test]
    fn test_missing_name_and_image() {
        let page = Page::parse("https://shop.test/p", "<p>vazio</p>".to_string());
        let s = strategy();
        assert!(matches!(s.name(&page), Err(Error::NotFound { field: Field::Name, .. })));
        assert!(matches!(s.image(&page), Err(Error::NotFound { field: Field::Image, .. })));
    }
}
