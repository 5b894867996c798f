//! Mercado Livre / Mercado Libre

use super::{HostPattern, Site, SimpleStrategy};
use crate::config::ScraperConfig;
use crate::extractors::{Rule, SelectorChain};

pub fn strategy(config: &ScraperConfig) -> SimpleStrategy {
    SimpleStrategy::new(Site::MercadoLivre, config)
        .with_hosts(vec![
            HostPattern::Contains("mercadolivre.".to_string()),
            HostPattern::Contains("mercadolibre.".to_string()),
            HostPattern::Domain("ml.com".to_string()),
        ])
        .with_lead_price_selectors(SelectorChain::of(&["meta[itemprop=price]"]))
        .with_split_price(
            "span.andes-money-amount",
            "span.andes-money-amount__fraction",
            "span.andes-money-amount__cents",
        )
        .with_price_selectors(SelectorChain::new(vec![
            Rule::css("span.andes-money-amount__fraction"),
            Rule::text_matching("span", r"R\$"),
        ]))
        .with_name_selectors(SelectorChain::of(&[
            "h1.ui-pdp-title",
            "meta[property='og:title']",
            "h1",
        ]))
        .with_image_selectors(SelectorChain::new(vec![
            Rule::attr("img[data-zoom]", "data-zoom"),
            Rule::css("meta[property='og:image']"),
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
    use crate::sites::fixtures::{MERCADO_LIVRE_PAGE, MERCADO_LIVRE_URL};
    use crate::sites::SiteStrategy;

    #[test]
    fn test_matches_hosts() {
        let s = strategy(&ScraperConfig::default());
        for url in [
            MERCADO_LIVRE_URL,
            "https://www.mercadolivre.com.br/p/MLB123",
            "https://articulo.mercadolibre.com.ar/MLA-1",
            "https://ml.com/p/1",
        ] {
            assert!(s.matches(&Url::parse(url).unwrap()), "{url}");
        }
        assert!(!s.matches(&Url::parse("https://www.html.com/ml.com").unwrap()));
    }

    #[test]
    fn test_fixture_extraction() {
        let s = strategy(&ScraperConfig::default());
        let page = Page::parse(MERCADO_LIVRE_URL, MERCADO_LIVRE_PAGE.to_string());

        assert_eq!(s.price(&page).unwrap(), Decimal::from_str("1299.90").unwrap());
        assert_eq!(s.name(&page).unwrap(), "Fone De Ouvido Bluetooth Sem Fio");
        assert_eq!(
            s.image(&page).unwrap(),
            "https://http2.mlstatic.com/D_NQ_NP_2X_fone-F.webp"
        );
    }

    #[test]
    fn test_fraction_without_cents() {
        let html = r#"
        <meta property="og:title" content="Cafeteira Expresso">
        <span class="andes-money-amount__fraction">1.299</span>
        "#;
        let s = strategy(&ScraperConfig::default());
        let page = Page::parse(MERCADO_LIVRE_URL, html.to_string());

        assert_eq!(s.price(&page).unwrap(), Decimal::from(1299));
        assert_eq!(s.name(&page).unwrap(), "Cafeteira Expresso");
    }

    #[test]
    fn test_previous_price_is_not_mixed_into_current() {
        let html = r#"
        <h1 class="ui-pdp-title">Smart TV 50"</h1>
        <div class="ui-pdp-price__second-line">
            <s class="andes-money-amount--previous">
                <span class="andes-money-amount">
                    <span class="andes-money-amount__fraction">1.499</span>
                </span>
            </s>
            <span class="andes-money-amount">
                <span class="andes-money-amount__fraction">1.299</span>
                <span class="andes-money-amount__cents">90</span>
            </span>
        </div>
        "#;
        let s = strategy(&ScraperConfig::default());
        let page = Page::parse(MERCADO_LIVRE_URL, html.to_string());

        assert_eq!(s.price(&page).unwrap(), Decimal::from_str("1299.90").unwrap());
    }
}
