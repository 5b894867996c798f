//! Inline script scanning
//!
//! Storefronts that render client-side usually ship their product state in
//! inline scripts (`window.runParams = {...}`, hydration blobs). These are
//! frequently truncated or not valid JSON, so they are scanned as text.

use regex::Regex;
use scraper::{Html, Selector};

/// Text of every inline (no `src`) script, in document order
pub fn inline_scripts(document: &Html) -> Vec<String> {
    let selector = match Selector::parse("script:not([src])") {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Pattern capturing a numeric value stored under a quoted JS/JSON key,
/// e.g. `"minPrice": "153.49"` or `"minPrice":153.49`
pub fn numeric_key_pattern(key: &str) -> Regex {
    Regex::new(&format!(r#""{}"\s*:\s*"?([0-9.]+)"?"#, regex::escape(key)))
        .expect("escaped key is a valid pattern")
}

/// Scans scripts in document order; within a script, patterns are tried in
/// order and the first non-blank capture wins.
pub fn first_script_capture(document: &Html, patterns: &[Regex]) -> Option<String> {
    inline_scripts(document).iter().find_map(|script| {
        patterns.iter().find_map(|re| {
            re.captures(script)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|v| !v.is_empty())
        })
    })
}
