//! Shop item entity extracted from the listing page

use serde::{Deserialize, Serialize};

/// Placeholder name used when a card has no name node.
pub const DEFAULT_ITEM_NAME: &str = "Unknown Item";

/// Placeholder price used when a card has no price node.
pub const DEFAULT_ITEM_PRICE: &str = "0 V-Bucks";

/// One item scraped from the shop listing page.
///
/// Produced fresh on every scrape and immutable afterwards. Items carry no
/// identity beyond their position in the extraction order; nothing is
/// persisted between cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Absolute URL of the item artwork.
    pub image_url: String,
    /// Rarity class read from the card container, e.g. `rarity-legendary`.
    /// `None` when the container carries no recognized rarity class.
    pub rarity: Option<String>,
    /// Display name, defaulted when the card has no name node.
    pub name: String,
    /// Price text exactly as shown on the page, defaulted when absent.
    pub price: String,
}