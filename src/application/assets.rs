//! Rarity background assets
//!
//! Maps the rarity class of a card to a local background image. Unknown
//! rarities, unmapped rarities and unreadable asset files all degrade to a
//! solid white tile so every surviving item still gets a background.
//! Missing files are additionally reported once at startup instead of
//! silently falling back every cycle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::domain::constants::RARITY_BACKGROUNDS;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Rarity class -> background file lookup, resolved against an asset root.
pub struct RarityBackgrounds {
    map: HashMap<String, PathBuf>,
    tile_edge: u32,
}

impl RarityBackgrounds {
    /// Build the lookup from the static rarity table.
    pub fn new(asset_root: &Path, tile_edge: u32) -> Self {
        let map = RARITY_BACKGROUNDS
            .iter()
            .map(|(rarity, file)| (rarity.to_string(), asset_root.join(file)))
            .collect();

        Self { map, tile_edge }
    }

    /// Warn once about expected asset files that are absent on disk.
    ///
    /// The per-cycle fallback still applies either way; this exists so a
    /// deployment mistake shows up at startup, not as a quietly white tile.
    pub fn warn_missing_assets(&self) {
        for (rarity, path) in &self.map {
            if !path.exists() {
                warn!(
                    "Background asset for {} missing at {}, will fall back to white",
                    rarity,
                    path.display()
                );
            }
        }
    }

    /// Load the background for a rarity class, resized to the tile edge.
    ///
    /// Falls back to a solid white tile when the rarity is absent, unmapped
    /// or its asset file cannot be loaded.
    pub fn load(&self, rarity: Option<&str>) -> RgbaImage {
        let Some(path) = rarity.and_then(|r| self.map.get(r)) else {
            return self.white_tile();
        };

        match image::open(path) {
            Ok(img) => img
                .resize_exact(self.tile_edge, self.tile_edge, FilterType::Lanczos3)
                .to_rgba8(),
            Err(e) => {
                debug!(
                    "Failed to load background {}: {}, using white",
                    path.display(),
                    e
                );
                self.white_tile()
            }
        }
    }

    fn white_tile(&self) -> RgbaImage {
        RgbaImage::from_pixel(self.tile_edge, self.tile_edge, WHITE)
    }
}
