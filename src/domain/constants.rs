//! Fixed constants describing the shop site and the collage geometry
//!
//! These are the compiled-in defaults; most of them can be overridden
//! through `AppConfig`.

/// Base URL used to absolutize relative item image sources.
pub const BASE_URL: &str = "https://dropnite.com";

/// Listing page that gets scraped every cycle.
pub const SHOP_URL: &str = "https://dropnite.com/shop/";

/// Currency icon drawn next to the price on every tile.
pub const VBUCKS_ICON_URL: &str = "https://dropnite.com/img-shop/fortnite-vbucks-icon.png";

/// Edge length of one square tile, in pixels.
pub const TILE_EDGE: u32 = 600;

/// Number of tiles per collage row.
pub const COLUMNS: u32 = 7;

/// Edge length the currency icon is resized to.
pub const ICON_EDGE: u32 = 120;

/// Pixel height of the overlay font.
pub const FONT_SCALE: f32 = 80.0;

/// Fixed output path of the collage, overwritten each cycle.
pub const OUTPUT_PATH: &str = "collage.png";

/// Seconds between cycles. One full day.
pub const CYCLE_INTERVAL_SECS: u64 = 86_400;

/// Class prefix that marks the rarity class on a card container.
pub const RARITY_CLASS_PREFIX: &str = "rarity-";

/// Static rarity class -> background asset path table, relative to the
/// configured asset root. Fixed at process start, never mutated.
pub const RARITY_BACKGROUNDS: &[(&str, &str)] = &[
    ("rarity-icon_series", "icon.png"),
    ("rarity-marvel", "marvel.jpg"),
    ("rarity-epic", "epic.jpg"),
    ("rarity-rare", "rare.jpg"),
    ("rarity-uncommon", "uncommon.jpg"),
    ("rarity-dark", "dark.jpg"),
    ("rarity-star_wars", "starwar.png"),
    ("rarity-gaming_legends", "gaminglegend.jpg"),
    ("rarity-legendary", "legendary.jpg"),
    ("rarity-common", "common.jpg"),
];
