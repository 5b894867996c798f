//! JSON-LD lookups
//!
//! Reads <script type="application/ld+json"> blocks. Well-formed blocks are
//! searched structurally (including @graph arrays and nested offers);
//! blocks that fail to parse, which is common with templated storefronts,
//! fall back to a textual scan for the key.

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

/// Raw text of every JSON-LD block, in document order
pub fn jsonld_blocks(document: &Html) -> Vec<String> {
    let selector = match Selector::parse(r#"script[type="application/ld+json"]"#) {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// First scalar value stored under `key` in any JSON-LD block
pub fn find_jsonld_value(document: &Html, key: &str) -> Option<String> {
    jsonld_blocks(document).iter().find_map(|block| {
        match serde_json::from_str::<Value>(block.trim()) {
            Ok(json) => find_key(&json, key),
            Err(_) => scan_key(block, key),
        }
    })
}

/// First value found for any of `keys`, trying each key across all blocks
/// before moving on to the next
pub fn find_jsonld_any(document: &Html, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| find_jsonld_value(document, key))
}

/// Depth-first search for a scalar under `key`
fn find_key(value: &Value, key: &str) -> Option<String> {
    match value {
        Value::Object(map) => map
            .get(key)
            .and_then(scalar_text)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Textual `"key": value` scan for blocks serde_json rejects
fn scan_key(text: &str, key: &str) -> Option<String> {
    let pattern = format!(
        r#""{k}"\s*:\s*(?:"([^"]*)"|([^,}}\]\s]+))"#,
        k = regex::escape(key)
    );
    let re = Regex::new(&pattern).ok()?;
    let found = re
        .captures_iter(text)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .find(|v| !v.is_empty());
    found
}
