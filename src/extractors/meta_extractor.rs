//! Meta tag lookups (OpenGraph, Twitter Card, product:*)
//!
//! OpenGraph and product tags use `property`, Twitter Card tags use `name`;
//! both attributes are checked so callers only name the key.

use scraper::{Html, Selector};

/// Non-blank `content` of the first `<meta>` whose `property` or `name` is `key`
pub fn meta_content(document: &Html, key: &str) -> Option<String> {
    let selector = Selector::parse("meta[content]").ok()?;

    document
        .select(&selector)
        .filter(|el| {
            let value = el.value();
            value.attr("property") == Some(key) || value.attr("name") == Some(key)
        })
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(String::from)
}
