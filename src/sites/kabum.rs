//! Kabum

use super::{HostPattern, Site, SimpleStrategy};
use crate::config::ScraperConfig;
use crate::extractors::{Rule, SelectorChain};

pub fn strategy(config: &ScraperConfig) -> SimpleStrategy {
    SimpleStrategy::new(Site::Kabum, config)
        .with_hosts(vec![HostPattern::Contains("kabum.".to_string())])
        .with_price_selectors(SelectorChain::new(vec![
            Rule::css("h4.text-4xl.text-secondary-500.font-bold"),
            Rule::css("h4.text-secondary-500"),
            Rule::css("[class*='text-secondary'][class*='font-bold']"),
            Rule::text_matching("h4", r"R\$"),
        ]))
        .with_name_selectors(SelectorChain::of(&[
            r"h1.text-sm.desktop\:text-xl.text-black-800.font-bold",
            "h1[class*='font-bold']",
            "h1",
        ]))
        .with_image_selectors(SelectorChain::new(vec![
            Rule::css("meta[property='og:image']"),
            Rule::css("img[src*='kabum']"),
            Rule::attr("img[data-src*='kabum']", "data-src"),
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
    use crate::sites::fixtures::{KABUM_PAGE, KABUM_URL};
    use crate::sites::SiteStrategy;

    #[test]
    fn test_fixture_extraction() {
        let s = strategy(&ScraperConfig::default());
        let page = Page::parse(KABUM_URL, KABUM_PAGE.to_string());

        assert!(s.matches(&Url::parse(KABUM_URL).unwrap()));
        assert_eq!(s.price(&page).unwrap(), Decimal::from_str("119.99").unwrap());
        assert_eq!(s.name(&page).unwrap(), "Mouse Gamer Logitech G203 RGB, 8000 DPI");
        assert_eq!(
            s.image(&page).unwrap(),
            "https://images.kabum.com.br/produtos/fotos/320799/mouse.jpg"
        );
    }

    #[test]
    fn test_lazy_loaded_image() {
        let html = r#"
        <h1>Placa de Vídeo RTX 4060</h1>
        <span class="text-secondary-500 font-bold">R$ 2.199,90</span>
        <img src="/placeholder.svg" data-src="https://images.kabum.com.br/produtos/rtx.jpg">
        "#;
        let s = strategy(&ScraperConfig::default());
        let page = Page::parse(KABUM_URL, html.to_string());

        assert_eq!(s.price(&page).unwrap(), Decimal::from_str("2199.90").unwrap());
        assert_eq!(s.name(&page).unwrap(), "Placa de Vídeo RTX 4060");
        assert_eq!(s.image(&page).unwrap(), "https://images.kabum.com.br/produtos/rtx.jpg");
    }
}
