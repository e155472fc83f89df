//! HTML parsing infrastructure
//!
//! CSS-selector driven extraction of shop items from the listing page.

pub mod error;
pub mod shop_list_parser;

pub use error::ParsingError;
pub use shop_list_parser::{ShopListParser, ShopSelectors};
