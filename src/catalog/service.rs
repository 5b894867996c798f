//! List and product operations on top of a [`CatalogStore`]

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use super::models::{ListSummary, NewProduct, Product, WishList};
use super::store::CatalogStore;
use crate::engine::ExtractionEngine;
use crate::error::{Error, Field, Result};
use crate::refresh::{self, BatchRefresher, RefreshReport};

pub struct ListService {
    store: Arc<dyn CatalogStore>,
}

impl ListService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn summaries(&self) -> Result<Vec<ListSummary>> {
        self.store
            .all_lists()?
            .into_iter()
            .filter_map(|list| list.id.map(|id| (id, list)))
            .map(|(id, list)| {
                Ok(ListSummary {
                    id,
                    product_count: self.store.products_by_list(id)?.len(),
                    name: list.name,
                    description: list.description,
                    created_at: list.created_at,
                })
            })
            .collect()
    }

    pub fn create(&self, name: &str, description: Option<String>) -> Result<WishList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("list name is required".to_string()));
        }
        self.store.save_list(WishList::new(name, description))
    }

    /// Deletes the list along with its products
    pub fn remove(&self, id: u64) -> Result<()> {
        if !self.store.delete_list(id)? {
            return Err(Error::ListNotFound(id));
        }
        Ok(())
    }
}

pub struct ProductService {
    store: Arc<dyn CatalogStore>,
    engine: Arc<ExtractionEngine>,
    refresh_concurrency: usize,
}

impl ProductService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        engine: Arc<ExtractionEngine>,
        refresh_concurrency: usize,
    ) -> Self {
        Self {
            store,
            engine,
            refresh_concurrency,
        }
    }

    /// Add a product to a list.
    ///
    /// With a supported link, fields given in the request are kept and the
    /// rest are scraped. Without one, name, store, price and image must all
    /// be supplied.
    pub fn add_product(&self, request: NewProduct) -> Result<Product> {
        let link = request.link.trim();
        if link.is_empty() {
            return Err(Error::Validation("product link is required".to_string()));
        }
        if self.store.find_list(request.list_id)?.is_none() {
            return Err(Error::ListNotFound(request.list_id));
        }

        let mut product = Product::new(request.list_id, link);
        match self.engine.resolve(link) {
            Ok(scraper) => {
                product.name = match request.name.filter(|n| !n.trim().is_empty()) {
                    Some(name) => name,
                    None => {
                        let name = scraper.extract_name()?;
                        if name.trim().is_empty() {
                            return Err(Error::not_found(scraper.site(), Field::Name));
                        }
                        name
                    }
                };
                product.store = Some(request.store.unwrap_or(scraper.site().store()));
                product.current_price = Some(match request.current_price {
                    Some(price) => price,
                    None => scraper.extract_price()?,
                });
                product.image_url = Some(match request.image_url {
                    Some(url) => url,
                    None => scraper.extract_image()?,
                });
            }
            Err(e) if e.is_unsupported_site() => {
                let (Some(name), Some(store), Some(price), Some(image_url)) = (
                    request.name,
                    request.store,
                    request.current_price,
                    request.image_url,
                ) else {
                    return Err(Error::Validation(
                        "name, store, price and image are required for stores without a scraper"
                            .to_string(),
                    ));
                };
                product.name = name;
                product.store = Some(store);
                product.current_price = Some(price);
                product.image_url = Some(image_url);
            }
            Err(e) => return Err(e),
        }

        product.last_updated = Some(Utc::now());
        let saved = self.store.save_product(product)?;
        info!(product_id = ?saved.id, list_id = saved.list_id, store = ?saved.store, "added product");
        Ok(saved)
    }

    /// Set a price by hand
    pub fn update_price(&self, product_id: u64, price: Decimal) -> Result<Product> {
        let mut product = self.product(product_id)?;
        product.current_price = Some(price);
        product.last_updated = Some(Utc::now());
        self.store.save_product(product)
    }

    /// Re-scrape one product. Errors are returned as-is.
    pub fn refresh_product(&self, product_id: u64) -> Result<Product> {
        let product = self.product(product_id)?;
        refresh::refresh_product(&self.engine, self.store.as_ref(), product)
    }

    /// Re-scrape every product in a list, skipping the ones that fail
    pub async fn refresh_list(&self, list_id: u64) -> Result<RefreshReport> {
        let products = self.store.products_by_list(list_id)?;
        let refresher = BatchRefresher::new(
            Arc::clone(&self.engine),
            Arc::clone(&self.store),
            self.refresh_concurrency,
        );
        Ok(refresher.refresh(products).await)
    }

    pub fn products_in_list(&self, list_id: u64) -> Result<Vec<Product>> {
        self.store.products_by_list(list_id)
    }

    pub fn remove_product(&self, product_id: u64) -> Result<()> {
        if !self.store.delete_product(product_id)? {
            return Err(Error::ProductNotFound(product_id));
        }
        Ok(())
    }

    pub fn list_total(&self, list_id: u64) -> Result<Decimal> {
        self.store.sum_prices_by_list(list_id)
    }

    fn product(&self, id: u64) -> Result<Product> {
        self.store
            .find_product(id)?
            .ok_or(Error::ProductNotFound(id))
    }
}
