//! Amazon (all regional storefronts)

use super::{HostPattern, Site, SimpleStrategy};
use crate::config::ScraperConfig;
use crate::extractors::{Rule, SelectorChain};

pub fn strategy(config: &ScraperConfig) -> SimpleStrategy {
    SimpleStrategy::new(Site::Amazon, config)
        .with_hosts(vec![HostPattern::Contains("amazon.".to_string())])
        // Screen-reader copy of the buy-box price is the full formatted value
        .with_lead_price_selectors(SelectorChain::of(&["span.a-price span.a-offscreen"]))
        .with_split_price("span.a-price", "span.a-price-whole", "span.a-price-fraction")
        .with_price_selectors(SelectorChain::new(vec![
            Rule::css("span.a-price-whole"),
            Rule::text_matching("span", r"R\$"),
        ]))
        .with_name_selectors(SelectorChain::of(&[
            "#productTitle",
            "h1#title span",
            "h1 span",
            "h1",
        ]))
        .with_image_selectors(SelectorChain::new(vec![
            Rule::css("meta[property='og:image']"),
            Rule::css("#imgTagWrapperId img"),
            Rule::attr("img[data-old-hires]", "data-old-hires"),
            Rule::css("img"),
        ]))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use url::Url;

    use super::*;
    use crate::fetch::Page;
    use crate::sites::fixtures::{AMAZON_PAGE, AMAZON_URL};
    use crate::sites::SiteStrategy;

    #[test]
    fn test_matches_regional_hosts() {
        let s = strategy(&ScraperConfig::default());
        for url in [
            AMAZON_URL,
            "https://amazon.com/dp/B0000",
            "https://smile.amazon.co.uk/dp/B0000",
        ] {
            assert!(s.matches(&Url::parse(url).unwrap()), "{url}");
        }
        assert!(!s.matches(&Url::parse("https://www.kabum.com.br/produto/1").unwrap()));
    }

    #[test]
    fn test_fixture_extraction() {
        let s = strategy(&ScraperConfig::default());
        let page = Page::parse(AMAZON_URL, AMAZON_PAGE.to_string());

        assert_eq!(s.price(&page).unwrap(), Decimal::from_str("474.05").unwrap());
        assert_eq!(
            s.name(&page).unwrap(),
            "Echo Dot 5ª geração | Smart speaker com Alexa"
        );
        assert_eq!(
            s.image(&page).unwrap(),
            "https://m.media-amazon.com/images/I/echo-dot.jpg"
        );
    }

    #[test]
    fn test_whole_and_fraction_price() {
        let html = r#"
        <span class="a-price">
            <span class="a-price-whole">1.899<span class="a-price-decimal">,</span></span>
            <span class="a-price-fraction">00</span>
        </span>
        <img data-old-hires="https://m.media-amazon.com/images/I/hires.jpg" src="/spacer.gif">
        "#;
        let s = strategy(&ScraperConfig::default());
        let page = Page::parse(AMAZON_URL, html.to_string());

        assert_eq!(s.price(&page).unwrap(), Decimal::from_str("1899.00").unwrap());
        assert_eq!(
            s.image(&page).unwrap(),
            "https://m.media-amazon.com/images/I/hires.jpg"
        );
    }
}
