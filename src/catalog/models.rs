use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Retailer a product is bought from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Store {
    Amazon,
    Kabum,
    MercadoLivre,
    AliExpress,
    Shopee,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishList {
    pub id: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WishList {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            created_at: Utc::now(),
        }
    }
}

/// A wish-list entry. `id` is `None` until first saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<u64>,
    pub list_id: u64,
    pub name: String,
    pub link: String,
    pub store: Option<Store>,
    pub current_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(list_id: u64, link: impl Into<String>) -> Self {
        Self {
            id: None,
            list_id,
            name: String::new(),
            link: link.into(),
            store: None,
            current_price: None,
            image_url: None,
            last_updated: None,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Request to add a product. Only `list_id` and `link` are always required;
/// the rest override scraped values, or are mandatory when the link's site
/// has no scraper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub list_id: u64,
    pub link: String,
    pub name: Option<String>,
    pub store: Option<Store>,
    pub current_price: Option<Decimal>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSummary {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product_count: usize,
}
