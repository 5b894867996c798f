//! Locale-aware price parsing
//!
//! Retailers print prices as `R$ 1.234,56`, `US$ 1,234.56`, `BRL 170.49` or
//! plain `1.299`. The two-digit tail decides which separator is the decimal
//! one.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Currency markers stripped before parsing. `$` goes last so it doesn't
/// eat the tail of `R$`/`US$` first.
pub const CURRENCY_MARKERS: &[&str] = &["R$", "US$", "BRL", "$"];

static BRAZILIAN_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+,\d{2}$").unwrap());
static US_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d{2}$").unwrap());
static GROUPED_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:(?:\.\d{3})+|(?:,\d{3})+)$").unwrap());

/// Parse a displayed price into a decimal.
///
/// - `R$ 1.234,56` -> 1234.56 (comma decimal, dot thousands)
/// - `$1,234.56` -> 1234.56 (dot decimal, comma thousands)
/// - `1.299` / `12,500` -> grouped integers
/// - `12,5` -> 12.5
pub fn parse_price(raw: &str) -> Result<Decimal> {
    let mut cleaned = raw.to_string();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    cleaned.retain(|c| !c.is_whitespace() && c != '\u{00A0}');

    let normalized = if BRAZILIAN_TAIL.is_match(&cleaned) {
        cleaned.replace('.', "").replace(',', ".")
    } else if US_TAIL.is_match(&cleaned) {
        cleaned.replace(',', "")
    } else if GROUPED_INTEGER.is_match(&cleaned) {
        cleaned.replace(['.', ','], "")
    } else if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).map_err(|e| Error::parse(raw, e))
}

/// Rejects zero, placeholder and garbage matches
pub fn is_valid_price(price: Decimal, min_valid_price: Decimal) -> bool {
    price > min_valid_price
}
