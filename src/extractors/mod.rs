//! Site-agnostic extraction primitives
//!
//! Each module reads one kind of signal from a parsed page. Site strategies
//! compose them into cascades; nothing here knows about specific retailers.

mod css_extractor;
mod jsonld_extractor;
mod meta_extractor;
mod price;
mod script_extractor;

pub use css_extractor::*;
pub use jsonld_extractor::*;
pub use meta_extractor::*;
pub use price::*;
pub use script_extractor::*;
