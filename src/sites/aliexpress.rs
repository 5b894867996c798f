//! AliExpress
//!
//! Product pages are mostly rendered client-side and the server markup
//! changes often, so price extraction walks every signal the page might
//! carry, most reliable first:
//!
//! 1. price parameters in the product URL itself
//! 2. `product:price:amount` / `twitter:data1` meta tags
//! 3. JSON-LD `price`, then `lowPrice`/`highPrice`
//! 4. price keys in inline scripts (`window.runParams` and friends)
//! 5. rendered price elements
//! 6. currency-prefixed numbers anywhere in the raw markup

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use url::Url;

use super::{host, Site, SiteStrategy};
use crate::cascade::{run_cascade, Stage};
use crate::config::ScraperConfig;
use crate::error::{Field, Result};
use crate::extractors::{
    find_first_image_url, find_first_text, find_jsonld_any, find_jsonld_value,
    first_script_capture, is_absolute_url, is_valid_price, meta_content, numeric_key_pattern,
    parse_price, SelectorChain,
};
use crate::fetch::Page;

/// `pdp_npi=...BRL%20170.49%21BRL%20153.49`: original price first, final
/// price last
static URL_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BRL%20([0-9]+\.?[0-9]*)").unwrap());

static HAS_DECIMAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[.,]\d+").unwrap());

static SCRIPT_PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let mut patterns: Vec<Regex> = ["price", "minPrice", "maxPrice", "actMinPrice"]
        .into_iter()
        .map(numeric_key_pattern)
        .collect();
    patterns.push(Regex::new(r#"price["']?\s*:\s*["']?([0-9.]+)["']?"#).unwrap());
    patterns
});

static RAW_PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"R\$", r"US\$", "BRL", r"\$"]
        .into_iter()
        .map(|prefix| Regex::new(&format!(r"{prefix}\s*([0-9]{{2,}}[.,][0-9]{{2}})")).unwrap())
        .collect()
});

static TITLE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*AliExpress.*$").unwrap());

const PROTECTED_PAGE_HINT: &str =
    "The page may be protected or rendered with JavaScript";

const PRICE_STAGES: &[Stage<AliExpress, Decimal>] = &[
    Stage { name: "url parameters", run: AliExpress::price_from_url },
    Stage { name: "product price meta", run: AliExpress::price_from_product_meta },
    Stage { name: "twitter data meta", run: AliExpress::price_from_twitter_meta },
    Stage { name: "json-ld price", run: AliExpress::price_from_jsonld },
    Stage { name: "json-ld price range", run: AliExpress::price_range_from_jsonld },
    Stage { name: "inline scripts", run: AliExpress::price_from_scripts },
    Stage { name: "price selectors", run: AliExpress::price_from_selectors },
    Stage { name: "raw markup", run: AliExpress::price_from_markup },
];

const NAME_STAGES: &[Stage<AliExpress, String>] = &[
    Stage { name: "og:title", run: AliExpress::name_from_og },
    Stage { name: "twitter:title", run: AliExpress::name_from_twitter },
    Stage { name: "title tag", run: AliExpress::name_from_title },
    Stage { name: "heading selectors", run: AliExpress::name_from_heading },
];

const IMAGE_STAGES: &[Stage<AliExpress, String>] = &[
    Stage { name: "og:image", run: AliExpress::image_from_og },
    Stage { name: "twitter:image", run: AliExpress::image_from_twitter },
    Stage { name: "magnifier selectors", run: AliExpress::image_from_selectors },
];

#[derive(Debug, Clone)]
pub struct AliExpress {
    price_selectors: SelectorChain,
    name_selectors: SelectorChain,
    image_selectors: SelectorChain,
    min_valid_price: Decimal,
}

impl AliExpress {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            price_selectors: SelectorChain::of(&[
                "div.product-price-value",
                "span.product-price-value",
                "div.product-price-current",
                "span[class*=snow-price]",
                "div[class*=price] span",
                "meta[property='product:price:amount']",
                "meta[name='twitter:data1']",
            ]),
            name_selectors: SelectorChain::of(&[
                "h1[data-pl=product-title]",
                "h1.product-title-text",
            ]),
            image_selectors: SelectorChain::of(&[
                "img.magnifier-image",
                "img[class*=magnifier]",
                "div.image-view-magnifier-wrap img",
            ]),
            min_valid_price: config.min_valid_price,
        }
    }

    fn price_from_url(&self, page: &Page) -> Result<Option<Decimal>> {
        URL_PRICE
            .captures_iter(&page.url)
            .filter_map(|c| c.get(1))
            .last()
            .map(|m| parse_price(m.as_str()))
            .transpose()
    }

    fn price_from_product_meta(&self, page: &Page) -> Result<Option<Decimal>> {
        meta_content(&page.document, "product:price:amount")
            .map(|raw| parse_price(&raw))
            .transpose()
    }

    fn price_from_twitter_meta(&self, page: &Page) -> Result<Option<Decimal>> {
        meta_content(&page.document, "twitter:data1")
            .filter(|raw| HAS_DECIMAL_NUMBER.is_match(raw))
            .map(|raw| parse_price(&raw))
            .transpose()
    }

    fn price_from_jsonld(&self, page: &Page) -> Result<Option<Decimal>> {
        find_jsonld_value(&page.document, "price")
            .map(|raw| parse_price(&raw))
            .transpose()
    }

    fn price_range_from_jsonld(&self, page: &Page) -> Result<Option<Decimal>> {
        find_jsonld_any(&page.document, &["lowPrice", "highPrice"])
            .map(|raw| parse_price(&raw))
            .transpose()
    }

    fn price_from_scripts(&self, page: &Page) -> Result<Option<Decimal>> {
        first_script_capture(&page.document, &SCRIPT_PRICE_PATTERNS)
            .map(|raw| parse_price(&raw))
            .transpose()
    }

    fn price_from_selectors(&self, page: &Page) -> Result<Option<Decimal>> {
        find_first_text(&page.document, &self.price_selectors)
            .map(|raw| parse_price(&raw))
            .transpose()
    }

    /// First valid hit per currency prefix, prefixes in order
    fn price_from_markup(&self, page: &Page) -> Result<Option<Decimal>> {
        let found = RAW_PRICE_PATTERNS.iter().find_map(|re| {
            let raw = re.captures(&page.source)?.get(1)?.as_str();
            parse_price(raw)
                .ok()
                .filter(|price| is_valid_price(*price, self.min_valid_price))
        });
        Ok(found)
    }

    fn name_from_og(&self, page: &Page) -> Result<Option<String>> {
        Ok(meta_content(&page.document, "og:title").map(|t| strip_site_suffix(&t)))
    }

    fn name_from_twitter(&self, page: &Page) -> Result<Option<String>> {
        Ok(meta_content(&page.document, "twitter:title").map(|t| strip_site_suffix(&t)))
    }

    fn name_from_title(&self, page: &Page) -> Result<Option<String>> {
        Ok(find_first_text(&page.document, &SelectorChain::of(&["title"]))
            .map(|t| strip_site_suffix(&t)))
    }

    fn name_from_heading(&self, page: &Page) -> Result<Option<String>> {
        Ok(find_first_text(&page.document, &self.name_selectors))
    }

    fn image_from_og(&self, page: &Page) -> Result<Option<String>> {
        Ok(meta_content(&page.document, "og:image"))
    }

    fn image_from_twitter(&self, page: &Page) -> Result<Option<String>> {
        Ok(meta_content(&page.document, "twitter:image"))
    }

    fn image_from_selectors(&self, page: &Page) -> Result<Option<String>> {
        Ok(find_first_image_url(&page.document, &self.image_selectors))
    }
}

/// Drop the ` - AliExpress ...` tail page titles carry
fn strip_site_suffix(title: &str) -> String {
    TITLE_SUFFIX.replace(title, "").trim().to_string()
}

impl SiteStrategy for AliExpress {
    fn site(&self) -> Site {
        Site::AliExpress
    }

    fn matches(&self, url: &Url) -> bool {
        host(url).is_some_and(|h| h.contains("aliexpress."))
    }

    fn price(&self, page: &Page) -> Result<Decimal> {
        run_cascade(
            self,
            page,
            Site::AliExpress,
            Field::Price,
            PRICE_STAGES,
            |price| is_valid_price(*price, self.min_valid_price),
            Some(PROTECTED_PAGE_HINT),
        )
    }

    fn name(&self, page: &Page) -> Result<String> {
        run_cascade(
            self,
            page,
            Site::AliExpress,
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
            Site::AliExpress,
            Field::Image,
            IMAGE_STAGES,
            |src| is_absolute_url(src),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::error::Error;
    use crate::sites::fixtures::{ALIEXPRESS_PAGE, ALIEXPRESS_URL};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn aliexpress() -> AliExpress {
        AliExpress::new(&ScraperConfig::default())
    }

    #[test]
    fn test_matches_regional_domains() {
        let s = aliexpress();
        for url in [
            ALIEXPRESS_URL,
            "https://www.aliexpress.com/item/1.html",
            "https://aliexpress.us/item/1.html",
            "https://m.aliexpress.ru/item/1.html",
        ] {
            assert!(s.matches(&Url::parse(url).unwrap()), "{url}");
        }
        assert!(!s.matches(&Url::parse("https://www.amazon.com.br/dp/X").unwrap()));
    }

    #[test]
    fn test_fixture_extraction() {
        let s = aliexpress();
        let page = Page::parse(ALIEXPRESS_URL, ALIEXPRESS_PAGE.to_string());

        assert_eq!(s.price(&page).unwrap(), dec("189.90"));
        assert_eq!(s.name(&page).unwrap(), "Smartwatch Esportivo à Prova D'água");
        assert_eq!(s.image(&page).unwrap(), "https://ae01.alicdn.com/kf/smartwatch.jpg");
    }

    #[test]
    fn test_url_price_uses_last_match() {
        let url = "https://pt.aliexpress.com/item/1005006123456789.html?pdp_npi=4%40dis%21BRL%21BRL%20170.49%21BRL%20153.49%21%21%21";
        let page = Page::parse(url, ALIEXPRESS_PAGE.to_string());

        assert_eq!(aliexpress().price(&page).unwrap(), dec("153.49"));
    }

    #[test]
    fn test_tiny_url_price_falls_through_to_meta() {
        let url = "https://pt.aliexpress.com/item/1.html?pdp_npi=BRL%200.99";
        let html = r#"<meta property="product:price:amount" content="74.30">"#;
        let page = Page::parse(url, html.to_string());

        assert_eq!(aliexpress().price(&page).unwrap(), dec("74.30"));
    }

    #[test]
    fn test_twitter_data_requires_decimal_number() {
        let html = r#"
        <meta name="twitter:data1" content="Frete grátis">
        <script type="application/ld+json">{"@type": "Product", "offers": {"lowPrice": "61.15", "highPrice": "99.00"}}</script>
        "#;
        let page = Page::parse(ALIEXPRESS_URL, html.to_string());

        assert_eq!(aliexpress().price(&page).unwrap(), dec("61.15"));
    }

    #[test]
    fn test_inline_script_price() {
        let html = r#"
        <html><head>
        <script>window._dida_config_ = {"lang": "pt"};</script>
        <script>
            window.runParams = {
                data: {"priceModule": {"actMinPrice": "45.67", "maxPrice": "80.00"}}
            };
        </script>
        </head></html>
        "#;
        let page = Page::parse(ALIEXPRESS_URL, html.to_string());

        // "maxPrice" is checked before "actMinPrice"
        assert_eq!(aliexpress().price(&page).unwrap(), dec("80.00"));
    }

    #[test]
    fn test_rendered_price_selector() {
        let html = r#"<div class="es--wrap"><span class="product-price-value">R$ 1.045,20</span></div>"#;
        let page = Page::parse(ALIEXPRESS_URL, html.to_string());

        assert_eq!(aliexpress().price(&page).unwrap(), dec("1045.20"));
    }

    #[test]
    fn test_raw_markup_sweep_is_last_resort() {
        let html = r#"
        <html><body>
        <div data-spm="buy">Por apenas US$ 23.90 hoje</div>
        </body></html>
        "#;
        let page = Page::parse(ALIEXPRESS_URL, html.to_string());

        assert_eq!(aliexpress().price(&page).unwrap(), dec("23.90"));
    }

    #[test]
    fn test_exhausted_price_mentions_protection() {
        let html = r#"<html><body><div id="root"></div></body></html>"#;
        let page = Page::parse(ALIEXPRESS_URL, html.to_string());

        let err = aliexpress().price(&page).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound { site: Site::AliExpress, field: Field::Price, hint: Some(_) }
        ));
        assert!(err.to_string().contains("protected"));
    }

    #[test]
    fn test_name_prefers_metadata_then_title_then_heading() {
        let html = r#"
        <html><head><title>Luminária LED USB - AliExpress 39</title></head>
        <body><h1 data-pl="product-title">Luminária LED USB Recarregável</h1></body></html>
        "#;
        let page = Page::parse(ALIEXPRESS_URL, html.to_string());
        assert_eq!(aliexpress().name(&page).unwrap(), "Luminária LED USB");

        let html = r#"<h1 class="product-title-text">Capa de Celular</h1>"#;
        let page = Page::parse(ALIEXPRESS_URL, html.to_string());
        assert_eq!(aliexpress().name(&page).unwrap(), "Capa de Celular");
    }

    #[test]
    fn test_relative_og_image_falls_through() {
        let html = r#"
        <meta property="og:image" content="/kf/relative.jpg">
        <div class="image-view-magnifier-wrap"><img src="https://ae01.alicdn.com/kf/zoom.jpg"></div>
        "#;
        let page = Page::parse(ALIEXPRESS_URL, html.to_string());

        assert_eq!(aliexpress().image(&page).unwrap(), "https://ae01.alicdn.com/kf/zoom.jpg");
    }
}
