//! Wish lists and the products in them

mod models;
mod service;
mod store;

pub use models::{ListSummary, NewProduct, Product, Store, WishList};
pub use service::{ListService, ProductService};
pub use store::{CatalogStore, MemoryCatalog};
