//! Grid collage assembly and persistence
//!
//! Tiles land row-major on a white canvas of `columns x ceil(n/columns)`
//! cells. The finished collage is PNG-encoded at the strongest compression
//! and written through a temp file so readers only ever observe a complete
//! artifact.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::imageops;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage, RgbaImage};
use tracing::info;

const CANVAS_WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Assemble tiles into one row-major grid image.
///
/// Returns `None` for an empty tile list; the caller reports that as the
/// "no valid images" outcome instead of writing a file.
pub fn assemble(tiles: Vec<RgbaImage>, columns: u32, tile_edge: u32) -> Option<RgbImage> {
    if tiles.is_empty() {
        return None;
    }

    let count = tiles.len() as u32;
    let rows = count.div_ceil(columns);
    let mut canvas = RgbImage::from_pixel(columns * tile_edge, rows * tile_edge, CANVAS_WHITE);

    for (index, tile) in tiles.into_iter().enumerate() {
        let row = index as u32 / columns;
        let col = index as u32 % columns;
        let tile_rgb = DynamicImage::ImageRgba8(tile).to_rgb8();
        imageops::replace(
            &mut canvas,
            &tile_rgb,
            (col * tile_edge) as i64,
            (row * tile_edge) as i64,
        );
    }

    Some(canvas)
}

/// Persist the collage atomically at the fixed output path.
///
/// The image is written to a sibling temp file first and renamed over the
/// target, so a concurrent "show latest" read never sees a partial file.
pub fn persist(collage: &RgbImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
        }
    }

    let mut tmp_path = output_path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = Path::new(&tmp_path);

    {
        let file = File::create(tmp_path)
            .with_context(|| format!("Failed to create temp file: {}", tmp_path.display()))?;
        let writer = BufWriter::new(file);
        let encoder =
            PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
        encoder
            .write_image(
                collage.as_raw(),
                collage.width(),
                collage.height(),
                ExtendedColorType::Rgb8,
            )
            .context("Failed to encode collage PNG")?;
    }

    fs::rename(tmp_path, output_path).with_context(|| {
        format!(
            "Failed to move collage into place: {} -> {}",
            tmp_path.display(),
            output_path.display()
        )
    })?;

    info!(
        "Persisted collage {}x{} to {}",
        collage.width(),
        collage.height(),
        output_path.display()
    );
    Ok(())
}
