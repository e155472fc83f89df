//! Overlay font loading and text drawing
//!
//! Fonts are parsed once and cached for the process lifetime. When the
//! configured font cannot be loaded the loader walks a short list of
//! well-known system fonts; if none of those load either, callers render
//! tiles without text overlays.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};
use once_cell::sync::Lazy;
use rusttype::{point, Font, Scale};
use tracing::warn;

static FONT_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// System fonts probed when the configured font fails to load.
const SYSTEM_FONT_FALLBACKS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the overlay font, falling back to a system font.
///
/// Returns `None` when neither the configured font nor any fallback loads;
/// the failure is logged here so callers can just skip text overlays.
pub fn load_overlay_font(primary: &Path) -> Option<Arc<Font<'static>>> {
    if let Some(font) = load_font_cached(primary) {
        return Some(font);
    }
    warn!(
        "Failed to load configured font {}, trying system fonts",
        primary.display()
    );

    for candidate in SYSTEM_FONT_FALLBACKS {
        if let Some(font) = load_font_cached(Path::new(candidate)) {
            return Some(font);
        }
    }

    warn!("No usable overlay font found, tiles will carry no text");
    None
}

/// Load and parse a single font file, memoized per path.
pub fn load_font_cached(path: &Path) -> Option<Arc<Font<'static>>> {
    let mut cache = FONT_CACHE.lock().expect("font cache lock poisoned");
    if let Some(font) = cache.get(path) {
        return Some(Arc::clone(font));
    }

    let bytes = std::fs::read(path).ok()?;
    let font = Arc::new(Font::try_from_vec(bytes)?);
    cache.insert(path.to_path_buf(), Arc::clone(&font));
    Some(font)
}

/// Measure the ink extents of a line of text at the given pixel scale.
pub fn text_size(font: &Font<'_>, scale_px: f32, text: &str) -> (u32, u32) {
    if text.is_empty() {
        return (0, 0);
    }

    let scale = Scale::uniform(scale_px);
    let v_metrics = font.v_metrics(scale);
    let mut min_x = i32::MAX;
    let mut max_x = i32::MIN;
    let mut min_y = i32::MAX;
    let mut max_y = i32::MIN;

    for glyph in font.layout(text, scale, point(0.0, v_metrics.ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            min_x = min_x.min(bb.min.x);
            max_x = max_x.max(bb.max.x);
            min_y = min_y.min(bb.min.y);
            max_y = max_y.max(bb.max.y);
        }
    }

    if min_x > max_x {
        return (0, 0);
    }
    ((max_x - min_x) as u32, (max_y - min_y) as u32)
}

/// Draw a line of text with its top-left corner at (x, y), alpha-blended
/// onto the image.
pub fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'_>,
    scale_px: f32,
    x: i32,
    y: i32,
    color: Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(scale_px);
    let v_metrics = font.v_metrics(scale);
    let baseline_y = y as f32 + v_metrics.ascent;

    for glyph in font.layout(text, scale, point(x as f32, baseline_y)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 {
                return;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= img.width() || py >= img.height() {
                return;
            }
            let alpha = coverage.clamp(0.0, 1.0);
            if alpha <= 0.0 {
                return;
            }
            let dst = img.get_pixel_mut(px, py);
            let inv = 1.0 - alpha;
            dst.0[0] = (color.0[0] as f32 * alpha + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (color.0[1] as f32 * alpha + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (color.0[2] as f32 * alpha + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_path_yields_none() {
        assert!(load_font_cached(Path::new("/definitely/not/here.ttf")).is_none());
    }

    #[test]
    fn empty_text_measures_zero() {
        // Only runs the measurement path when a system font is available.
        if let Some(font) = load_overlay_font(Path::new("/nonexistent.ttf")) {
            assert_eq!(text_size(&font, 80.0, ""), (0, 0));
            let (w, h) = text_size(&font, 80.0, "Shopshot");
            assert!(w > 0 && h > 0);
        }
    }

    #[test]
    fn draw_text_marks_pixels() {
        if let Some(font) = load_overlay_font(Path::new("/nonexistent.ttf")) {
            let mut img = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255]));
            draw_text(&mut img, &font, 40.0, 10, 10, Rgba([255, 255, 255, 255]), "Hi");
            let touched = img.pixels().any(|p| p.0[0] > 0);
            assert!(touched);
        }
    }
}
