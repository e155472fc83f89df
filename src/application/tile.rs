//! Per-item tile composition
//!
//! One tile per surviving item: rarity background, item artwork composited
//! through its own alpha, centered name text and the currency icon with the
//! price to its right. Decode failures surface as [`TileError`] so the
//! pipeline can collect them instead of aborting the cycle.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rusttype::Font;
use thiserror::Error;

use super::assets::RarityBackgrounds;
use super::fonts;
use crate::domain::ShopItem;
use crate::infrastructure::config::RenderConfig;

const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Horizontal shift of the currency icon off tile center.
const ICON_SHIFT_LEFT: i64 = 30;
/// Gap between the icon's right edge and the price text.
const PRICE_GAP: i64 = 7;

#[derive(Debug, Error)]
pub enum TileError {
    #[error("failed to decode item image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Why one item contributed no tile to the collage.
#[derive(Debug, Clone)]
pub struct TileFailure {
    pub name: String,
    pub image_url: String,
    pub reason: String,
}

/// Aggregated result of rendering all items of one cycle.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub tiles: Vec<RgbaImage>,
    pub failures: Vec<TileFailure>,
}

/// Renders one finished tile per item record.
pub struct TileRenderer {
    backgrounds: RarityBackgrounds,
    font: Option<Arc<Font<'static>>>,
    tile_edge: u32,
    font_scale: f32,
}

impl TileRenderer {
    /// Build a renderer from the render configuration.
    ///
    /// The overlay font is resolved here, once; a load failure falls back
    /// to a system font and, failing that, to text-free tiles.
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            backgrounds: RarityBackgrounds::new(&config.asset_dir, config.tile_edge),
            font: fonts::load_overlay_font(&config.font_path),
            tile_edge: config.tile_edge,
            font_scale: config.font_scale,
        }
    }

    #[cfg(test)]
    fn with_parts(
        backgrounds: RarityBackgrounds,
        font: Option<Arc<Font<'static>>>,
        tile_edge: u32,
        font_scale: f32,
    ) -> Self {
        Self {
            backgrounds,
            font,
            tile_edge,
            font_scale,
        }
    }

    /// Warn about expected background assets missing on disk.
    pub fn warn_missing_assets(&self) {
        self.backgrounds.warn_missing_assets();
    }

    /// Compose one tile from the item record and its fetched artwork bytes.
    pub fn compose(
        &self,
        item: &ShopItem,
        artwork_bytes: &[u8],
        icon: Option<&RgbaImage>,
    ) -> Result<RgbaImage, TileError> {
        let artwork = image::load_from_memory(artwork_bytes)?
            .resize_exact(self.tile_edge, self.tile_edge, FilterType::Lanczos3)
            .to_rgba8();

        let mut tile = self.backgrounds.load(item.rarity.as_deref());
        imageops::overlay(&mut tile, &artwork, 0, 0);

        if let Some(font) = &self.font {
            self.draw_name(&mut tile, font, &item.name);
            if let Some(icon) = icon {
                self.draw_price(&mut tile, font, icon, &item.price);
            }
        } else if let Some(icon) = icon {
            // No font: the icon still lands, the price text is skipped.
            let (icon_x, icon_y) = self.icon_position(icon);
            imageops::overlay(&mut tile, icon, icon_x, icon_y);
        }

        Ok(tile)
    }

    /// Name text, horizontally centered, anchored at 3/4 tile height.
    fn draw_name(&self, tile: &mut RgbaImage, font: &Font<'_>, name: &str) {
        let (text_w, text_h) = fonts::text_size(font, self.font_scale, name);
        let x = (self.tile_edge as i32 - text_w as i32) / 2;
        let y = self.tile_edge as i32 * 3 / 4 - text_h as i32 / 2;
        fonts::draw_text(tile, font, self.font_scale, x, y, TEXT_COLOR, name);
    }

    /// Currency icon near the bottom with the price to its right,
    /// vertically centered against the icon.
    fn draw_price(&self, tile: &mut RgbaImage, font: &Font<'_>, icon: &RgbaImage, price: &str) {
        let (icon_x, icon_y) = self.icon_position(icon);
        imageops::overlay(tile, icon, icon_x, icon_y);

        let (_, text_h) = fonts::text_size(font, self.font_scale, price);
        let price_x = icon_x + icon.width() as i64 + PRICE_GAP;
        let price_y = icon_y + (icon.height() as i64 - text_h as i64) / 2;
        fonts::draw_text(
            tile,
            font,
            self.font_scale,
            price_x as i32,
            price_y as i32,
            TEXT_COLOR,
            price,
        );
    }

    fn icon_position(&self, icon: &RgbaImage) -> (i64, i64) {
        let icon_x = (self.tile_edge as i64 - icon.width() as i64) / 2 - ICON_SHIFT_LEFT;
        let icon_y = self.tile_edge as i64 - icon.height() as i64 - 1;
        (icon_x, icon_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;

    const EDGE: u32 = 64;

    fn renderer(asset_dir: &Path) -> TileRenderer {
        TileRenderer::with_parts(RarityBackgrounds::new(asset_dir, EDGE), None, EDGE, 16.0)
    }

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn item(rarity: Option<&str>) -> ShopItem {
        ShopItem {
            image_url: "https://dropnite.com/img/x.png".to_string(),
            rarity: rarity.map(str::to_string),
            name: "Test Item".to_string(),
            price: "1200 V-Bucks".to_string(),
        }
    }

    #[test]
    fn tile_has_configured_edge() {
        let dir = tempfile::tempdir().unwrap();
        let artwork = RgbaImage::from_pixel(10, 10, Rgba([200, 0, 0, 255]));

        let tile = renderer(dir.path())
            .compose(&item(None), &png_bytes(&artwork), None)
            .unwrap();
        assert_eq!(tile.dimensions(), (EDGE, EDGE));
    }

    #[test]
    fn opaque_artwork_covers_white_background() {
        let dir = tempfile::tempdir().unwrap();
        let artwork = RgbaImage::from_pixel(10, 10, Rgba([200, 0, 0, 255]));

        let tile = renderer(dir.path())
            .compose(&item(Some("rarity-unmapped")), &png_bytes(&artwork), None)
            .unwrap();
        let center = tile.get_pixel(EDGE / 2, EDGE / 2);
        assert_eq!((center[0], center[1], center[2]), (200, 0, 0));
    }

    #[test]
    fn transparent_artwork_shows_white_background() {
        let dir = tempfile::tempdir().unwrap();
        let artwork = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));

        let tile = renderer(dir.path())
            .compose(&item(None), &png_bytes(&artwork), None)
            .unwrap();
        let center = tile.get_pixel(EDGE / 2, EDGE / 2);
        assert_eq!((center[0], center[1], center[2]), (255, 255, 255));
    }

    #[test]
    fn undecodable_artwork_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = renderer(dir.path()).compose(&item(None), b"not an image", None);
        assert!(result.is_err());
    }

    #[test]
    fn icon_lands_near_bottom_without_font() {
        let dir = tempfile::tempdir().unwrap();
        let artwork = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        let icon = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]));

        let tile = renderer(dir.path())
            .compose(&item(None), &png_bytes(&artwork), Some(&icon))
            .unwrap();

        let icon_x = (EDGE as i64 - 8) / 2 - ICON_SHIFT_LEFT;
        let icon_y = EDGE as i64 - 8 - 1;
        // Icon shift pushes it left of center; clamp for the tiny test tile.
        let sample_x = icon_x.max(0) as u32;
        let px = tile.get_pixel(sample_x, icon_y as u32 + 4);
        assert_eq!((px[0], px[1], px[2]), (0, 0, 255));
    }
}
