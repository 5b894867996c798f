//! Error types shared by the extraction engine and the catalog services.

use thiserror::Error;

use crate::sites::Site;

/// Which product field a cascade was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Price,
    Name,
    Image,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Field::Price => "price",
            Field::Name => "product name",
            Field::Image => "product image",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("could not parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("{field} not found on {site}{}", hint_suffix(.hint))]
    NotFound {
        site: Site,
        field: Field,
        hint: Option<&'static str>,
    },

    #[error("no scraper supports {url}")]
    UnsupportedSite { url: String },

    #[error("{0}")]
    Validation(String),

    #[error("list {0} not found")]
    ListNotFound(u64),

    #[error("product {0} not found")]
    ProductNotFound(u64),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("worker task failed: {0}")]
    Worker(String),
}

impl Error {
    pub fn parse(input: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Parse {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(site: Site, field: Field) -> Self {
        Error::NotFound {
            site,
            field,
            hint: None,
        }
    }

    /// True when no registered strategy claims the URL, meaning product
    /// fields have to be supplied by hand.
    pub fn is_unsupported_site(&self) -> bool {
        matches!(self, Error::UnsupportedSite { .. })
    }
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    hint.map(|h| format!(". {h}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
