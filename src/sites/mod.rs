//! Per-site extraction strategies
//!
//! Amazon, Kabum and Mercado Livre share the selector-chain shaped
//! [`SimpleStrategy`], configured per site. AliExpress markup is volatile
//! enough to need its own deep cascade.

mod aliexpress;
mod amazon;
mod kabum;
mod mercado_livre;
mod simple;

pub use aliexpress::AliExpress;
pub use simple::{HostPattern, SimpleStrategy};

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::catalog::Store;
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::fetch::Page;

/// Identity of a supported site. Used for labels and logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Site {
    Amazon,
    Kabum,
    MercadoLivre,
    AliExpress,
}

impl Site {
    pub fn label(self) -> &'static str {
        match self {
            Site::Amazon => "Amazon",
            Site::Kabum => "Kabum",
            Site::MercadoLivre => "Mercado Livre",
            Site::AliExpress => "AliExpress",
        }
    }

    /// Store recorded on products scraped from this site
    pub fn store(self) -> Store {
        match self {
            Site::Amazon => Store::Amazon,
            Site::Kabum => Store::Kabum,
            Site::MercadoLivre => Store::MercadoLivre,
            Site::AliExpress => Store::AliExpress,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extraction capability set every supported site implements.
///
/// Strategies work on an already fetched [`Page`]; fetching belongs to
/// [`crate::engine::ProductScraper`].
pub trait SiteStrategy: Send + Sync {
    fn site(&self) -> Site;

    /// Whether this strategy handles `url` (host based)
    fn matches(&self, url: &Url) -> bool;

    /// Current price, already validated against the configured threshold
    fn price(&self, page: &Page) -> Result<Decimal>;

    fn name(&self, page: &Page) -> Result<String>;

    /// Absolute URL of the main product image
    fn image(&self, page: &Page) -> Result<String>;
}

/// Built-in strategies in registration order
pub fn default_strategies(config: &ScraperConfig) -> Vec<Box<dyn SiteStrategy>> {
    vec![
        Box::new(amazon::strategy(config)),
        Box::new(kabum::strategy(config)),
        Box::new(mercado_livre::strategy(config)),
        Box::new(AliExpress::new(config)),
    ]
}

/// Lowercased host of `url`, without a trailing dot
pub(crate) fn host(url: &Url) -> Option<String> {
    url.host_str()
        .map(|h| h.trim_end_matches('.').to_ascii_lowercase())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Trimmed-down captures of real product pages

    pub const AMAZON_URL: &str = "https://www.amazon.com.br/Echo-Dot-5a-geracao/dp/B09B8V1LZ3";
    pub const AMAZON_PAGE: &str = r#"
    <html>
    <head>
        <title>Echo Dot 5ª geração | Amazon.com.br</title>
        <meta property="og:image" content="https://m.media-amazon.com/images/I/echo-dot.jpg">
    </head>
    <body>
        <div id="centerCol">
            <h1 id="title"><span id="productTitle">  Echo Dot 5ª geração | Smart speaker com Alexa  </span></h1>
            <div id="corePrice">
                <span class="a-price"><span class="a-offscreen">R$ 474,05</span></span>
            </div>
        </div>
        <div id="imgTagWrapperId"><img src="https://m.media-amazon.com/images/I/echo-dot-large.jpg"></div>
    </body>
    </html>
    "#;

    pub const KABUM_URL: &str = "https://www.kabum.com.br/produto/320799/mouse-gamer-logitech-g203";
    pub const KABUM_PAGE: &str = r#"
    <html>
    <head>
        <meta property="og:image" content="https://images.kabum.com.br/produtos/fotos/320799/mouse.jpg">
    </head>
    <body>
        <h1 class="text-sm desktop:text-xl text-black-800 font-bold">Mouse Gamer Logitech G203 RGB, 8000 DPI</h1>
        <h4 class="text-4xl text-secondary-500 font-bold">R$ 119,99</h4>
    </body>
    </html>
    "#;

    pub const MERCADO_LIVRE_URL: &str =
        "https://produto.mercadolivre.com.br/MLB-3456789012-fone-de-ouvido-bluetooth-_JM";
    pub const MERCADO_LIVRE_PAGE: &str = r#"
    <html>
    <head>
        <meta property="og:title" content="Fone De Ouvido Bluetooth Sem Fio | MercadoLivre">
        <meta property="og:image" content="https://http2.mlstatic.com/D_NQ_NP_fone-O.webp">
    </head>
    <body>
        <h1 class="ui-pdp-title">Fone De Ouvido Bluetooth Sem Fio</h1>
        <div class="ui-pdp-price">
            <meta itemprop="price" content="1299.90">
            <span class="andes-money-amount">
                <span class="andes-money-amount__fraction">1.299</span>
                <span class="andes-money-amount__cents">90</span>
            </span>
        </div>
        <figure>
            <img data-zoom="https://http2.mlstatic.com/D_NQ_NP_2X_fone-F.webp" src="https://http2.mlstatic.com/D_Q_NP_fone-R.webp">
        </figure>
    </body>
    </html>
    "#;

    pub const ALIEXPRESS_URL: &str = "https://pt.aliexpress.com/item/1005006123456789.html";
    pub const ALIEXPRESS_PAGE: &str = r#"
    <html>
    <head>
        <title>Smartwatch Esportivo à Prova D'água - AliExpress 44</title>
        <meta property="og:title" content="Smartwatch Esportivo à Prova D'água - AliExpress">
        <meta property="og:image" content="https://ae01.alicdn.com/kf/smartwatch.jpg">
        <script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "Product", "name": "Smartwatch", "offers": {"@type": "Offer", "price": "189.90", "priceCurrency": "BRL"}}
        </script>
    </head>
    <body>
        <h1 data-pl="product-title">Smartwatch Esportivo à Prova D'água</h1>
        <div class="product-price-current"><span>R$ 189,90</span></div>
    </body>
    </html>
    "#;
}
