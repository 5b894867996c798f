//! Persistence boundary for lists and products

use std::collections::BTreeMap;
use std::sync::RwLock;

use rust_decimal::Decimal;
use tracing::debug;

use super::models::{Product, WishList};
use crate::error::{Error, Result};

/// Storage the catalog services and the batch refresher write through.
///
/// `save_product` must be idempotent for a product that already has an id,
/// and `products_by_list` returns a snapshot that later writes don't alter.
pub trait CatalogStore: Send + Sync {
    fn find_list(&self, id: u64) -> Result<Option<WishList>>;

    fn all_lists(&self) -> Result<Vec<WishList>>;

    /// Insert (assigning an id) or replace
    fn save_list(&self, list: WishList) -> Result<WishList>;

    /// Deletes the list and every product in it. Returns whether the list
    /// existed.
    fn delete_list(&self, id: u64) -> Result<bool>;

    fn find_product(&self, id: u64) -> Result<Option<Product>>;

    /// Insert (assigning an id) or replace. The product's list must exist.
    fn save_product(&self, product: Product) -> Result<Product>;

    fn delete_product(&self, id: u64) -> Result<bool>;

    /// Products of a list ordered by id
    fn products_by_list(&self, list_id: u64) -> Result<Vec<Product>>;

    /// Sum of known current prices in a list; zero for an empty list
    fn sum_prices_by_list(&self, list_id: u64) -> Result<Decimal>;
}

#[derive(Default)]
struct Tables {
    lists: BTreeMap<u64, WishList>,
    products: BTreeMap<u64, Product>,
    next_list_id: u64,
    next_product_id: u64,
}

/// In-process store backed by ordered maps
#[derive(Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&self.tables.read().unwrap_or_else(|e| e.into_inner()))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        f(&mut self.tables.write().unwrap_or_else(|e| e.into_inner()))
    }
}

impl CatalogStore for MemoryCatalog {
    fn find_list(&self, id: u64) -> Result<Option<WishList>> {
        Ok(self.read(|t| t.lists.get(&id).cloned()))
    }

    fn all_lists(&self) -> Result<Vec<WishList>> {
        Ok(self.read(|t| t.lists.values().cloned().collect()))
    }

    fn save_list(&self, mut list: WishList) -> Result<WishList> {
        self.write(|t| {
            let id = match list.id {
                Some(id) => {
                    t.next_list_id = t.next_list_id.max(id);
                    id
                }
                None => {
                    t.next_list_id += 1;
                    t.next_list_id
                }
            };
            list.id = Some(id);
            t.lists.insert(id, list.clone());
            Ok(list)
        })
    }

    fn delete_list(&self, id: u64) -> Result<bool> {
        self.write(|t| {
            if t.lists.remove(&id).is_none() {
                return Ok(false);
            }
            let before = t.products.len();
            t.products.retain(|_, p| p.list_id != id);
            debug!(list_id = id, removed_products = before - t.products.len(), "deleted list");
            Ok(true)
        })
    }

    fn find_product(&self, id: u64) -> Result<Option<Product>> {
        Ok(self.read(|t| t.products.get(&id).cloned()))
    }

    fn save_product(&self, mut product: Product) -> Result<Product> {
        self.write(|t| {
            if !t.lists.contains_key(&product.list_id) {
                return Err(Error::ListNotFound(product.list_id));
            }
            let id = match product.id {
                Some(id) => {
                    t.next_product_id = t.next_product_id.max(id);
                    id
                }
                None => {
                    t.next_product_id += 1;
                    t.next_product_id
                }
            };
            product.id = Some(id);
            t.products.insert(id, product.clone());
            Ok(product)
        })
    }

    fn delete_product(&self, id: u64) -> Result<bool> {
        Ok(self.write(|t| t.products.remove(&id).is_some()))
    }

    fn products_by_list(&self, list_id: u64) -> Result<Vec<Product>> {
        Ok(self.read(|t| {
            t.products
                .values()
                .filter(|p| p.list_id == list_id)
                .cloned()
                .collect()
        }))
    }

    fn sum_prices_by_list(&self, list_id: u64) -> Result<Decimal> {
        Ok(self.read(|t| {
            t.products
                .values()
                .filter(|p| p.list_id == list_id)
                .filter_map(|p| p.current_price)
                .sum()
        }))
    }
}
