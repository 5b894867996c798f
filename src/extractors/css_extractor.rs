//! CSS selector chains
//!
//! A chain is an ordered list of lookup rules, most stable markers first and
//! generic fallbacks last. The first rule producing a non-blank value wins.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Single lookup rule within a [`SelectorChain`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// First matching element; its `content` attribute when present (meta
    /// tags), otherwise its text
    Css(String),
    /// Named attribute of the first matching element
    Attr { selector: String, attr: String },
    /// First matching element whose text matches the pattern
    TextMatching { selector: String, pattern: String },
}

impl Rule {
    pub fn css(selector: &str) -> Self {
        Rule::Css(selector.to_string())
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Rule::Attr {
            selector: selector.to_string(),
            attr: attr.to_string(),
        }
    }

    pub fn text_matching(selector: &str, pattern: &str) -> Self {
        Rule::TextMatching {
            selector: selector.to_string(),
            pattern: pattern.to_string(),
        }
    }

    fn selector(&self) -> &str {
        match self {
            Rule::Css(selector) => selector,
            Rule::Attr { selector, .. } => selector,
            Rule::TextMatching { selector, .. } => selector,
        }
    }

    fn compile(&self) -> Option<Selector> {
        match Selector::parse(self.selector()) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(selector = self.selector(), error = ?e, "skipping invalid selector");
                None
            }
        }
    }

    /// Text-ish value of the rule's first hit
    fn first_text(&self, document: &Html) -> Option<String> {
        let selector = self.compile()?;
        match self {
            Rule::Css(_) => document.select(&selector).next().map(|el| {
                el.value()
                    .attr("content")
                    .map(String::from)
                    .unwrap_or_else(|| element_text(&el))
            }),
            Rule::Attr { attr, .. } => document
                .select(&selector)
                .next()
                .and_then(|el| el.value().attr(attr).map(String::from)),
            Rule::TextMatching { pattern, .. } => {
                let re = Regex::new(pattern).ok()?;
                document
                    .select(&selector)
                    .map(|el| element_text(&el))
                    .find(|text| re.is_match(text))
            }
        }
    }

    /// Every candidate image location the rule yields, in document order
    fn image_candidates(&self, document: &Html) -> Vec<String> {
        let Some(selector) = self.compile() else {
            return vec![];
        };
        document
            .select(&selector)
            .filter_map(|el| match self {
                Rule::Attr { attr, .. } => el.value().attr(attr),
                _ => el.value().attr("content").or_else(|| el.value().attr("src")),
            })
            .map(String::from)
            .collect()
    }
}

/// Ordered rules evaluated first to last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorChain {
    rules: Vec<Rule>,
}

impl SelectorChain {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Chain of plain [`Rule::Css`] rules
    pub fn of(selectors: &[&str]) -> Self {
        Self::new(selectors.iter().map(|s| Rule::css(s)).collect())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// First non-blank value produced by the chain, trimmed
pub fn find_first_text(document: &Html, chain: &SelectorChain) -> Option<String> {
    chain
        .rules
        .iter()
        .filter_map(|rule| rule.first_text(document))
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
}

/// First absolute http(s) image URL produced by the chain.
///
/// Relative paths, data URIs and blanks are skipped, moving on to the next
/// element and then the next rule.
pub fn find_first_image_url(document: &Html, chain: &SelectorChain) -> Option<String> {
    chain
        .rules
        .iter()
        .flat_map(|rule| rule.image_candidates(document))
        .map(|src| src.trim().to_string())
        .find(|src| is_absolute_url(src))
}

/// Whether `candidate` is an absolute http(s) URL
pub fn is_absolute_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Rebuild a price some sites split across two elements (`1.234` + `56`).
///
/// Both parts are read from inside the same `container` element, taking the
/// first container that holds both. Struck-through containers (previous
/// prices inside `<s>`/`<del>` or flagged `data-a-strike`) are skipped.
/// Grouping separators in the whole part are dropped and the parts are
/// joined with a decimal comma, ready for `parse_price`.
pub fn join_split_price(
    document: &Html,
    container: &str,
    whole: &str,
    fraction: &str,
) -> Option<String> {
    let container_sel = Rule::css(container).compile()?;
    let whole_sel = Rule::css(whole).compile()?;
    let fraction_sel = Rule::css(fraction).compile()?;

    document
        .select(&container_sel)
        .filter(|el| !is_struck_through(el))
        .find_map(|el| {
            let whole_text = el.select(&whole_sel).next().map(|w| element_text(&w))?;
            let fraction = el.select(&fraction_sel).next().map(|f| element_text(&f))?;

            let whole: String = whole_text.chars().filter(|c| c.is_ascii_digit()).collect();
            if whole.is_empty() || fraction.is_empty() {
                return None;
            }
            Some(format!("{whole},{fraction}"))
        })
}

fn is_struck_through(element: &ElementRef) -> bool {
    std::iter::once(*element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| {
            matches!(el.value().name(), "s" | "del") || el.value().attr("data-a-strike").is_some()
        })
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
