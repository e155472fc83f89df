//! One scrape-render-persist cycle
//!
//! The pipeline is a pure function over its injected collaborators: fetch
//! listing, extract items, render tiles one at a time in extraction order,
//! assemble the grid, persist atomically. It holds no scheduling or chat
//! state and is safe to invoke repeatedly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::RgbaImage;
use tracing::{info, warn};

use super::collage;
use super::tile::{RenderReport, TileFailure, TileRenderer};
use crate::domain::ShopItem;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::parsing::ShopListParser;

/// User-visible text when the listing has no usable items.
pub const NO_ITEMS_MESSAGE: &str = "No images found in the shop.";

/// User-visible text when every item failed to render.
pub const NO_TILES_MESSAGE: &str = "No valid images to create a collage.";

/// Result of one pipeline cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A collage was assembled and persisted.
    Collage {
        path: PathBuf,
        tile_count: usize,
        failures: Vec<TileFailure>,
    },
    /// Nothing to render; `reason` is the user-visible message.
    Empty { reason: String },
}

/// The scrape -> extract -> render -> assemble pipeline.
pub struct ShopPipeline {
    http: HttpClient,
    parser: ShopListParser,
    renderer: TileRenderer,
    listing_url: String,
    icon_url: String,
    icon_edge: u32,
    columns: u32,
    tile_edge: u32,
    output_path: PathBuf,
}

impl ShopPipeline {
    /// Wire the pipeline from the application configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = HttpClient::new(config.shop.http.clone())?;
        let parser = ShopListParser::with_selectors(&config.shop.base_url, &config.shop.selectors)
            .context("Failed to build listing parser")?;
        let renderer = TileRenderer::new(&config.render);
        renderer.warn_missing_assets();

        Ok(Self {
            http,
            parser,
            renderer,
            listing_url: config.shop.listing_url.clone(),
            icon_url: config.shop.icon_url.clone(),
            icon_edge: config.render.icon_edge,
            columns: config.render.columns,
            tile_edge: config.render.tile_edge,
            output_path: config.render.output_path.clone(),
        })
    }

    /// Path of the persisted collage, for the on-demand query.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run one full cycle.
    ///
    /// `Ok(CycleOutcome::Empty)` covers the expected "nothing to post"
    /// cases; `Err` is reserved for listing fetch and persistence failures.
    /// Neither is fatal to the caller's loop.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        info!("Starting shop cycle against {}", self.listing_url);

        let html = self
            .http
            .get_text(&self.listing_url)
            .await
            .context("Failed to fetch the shop listing page")?;

        self.process_listing(&html).await
    }

    /// Everything after the listing fetch: extract, render, assemble,
    /// persist. Split out so the cycle logic is testable on fixture HTML.
    async fn process_listing(&self, html: &str) -> Result<CycleOutcome> {
        let items = self.parser.parse(html);
        if items.is_empty() {
            info!("Listing page yielded no items");
            return Ok(CycleOutcome::Empty {
                reason: NO_ITEMS_MESSAGE.to_string(),
            });
        }
        info!("Extracted {} items", items.len());

        let icon = self.fetch_icon().await;
        let report = self.render_items(&items, icon.as_ref()).await;
        for failure in &report.failures {
            warn!(
                "Dropped '{}' ({}): {}",
                failure.name, failure.image_url, failure.reason
            );
        }

        let tile_count = report.tiles.len();
        let Some(canvas) = collage::assemble(report.tiles, self.columns, self.tile_edge) else {
            info!("No tiles survived rendering");
            return Ok(CycleOutcome::Empty {
                reason: NO_TILES_MESSAGE.to_string(),
            });
        };

        collage::persist(&canvas, &self.output_path)?;

        Ok(CycleOutcome::Collage {
            path: self.output_path.clone(),
            tile_count,
            failures: report.failures,
        })
    }

    /// Fetch the currency icon once per cycle.
    ///
    /// A failure here is logged and drops the icon and the price overlay
    /// for the whole cycle, never the cycle itself.
    async fn fetch_icon(&self) -> Option<RgbaImage> {
        let bytes = match self.http.get_bytes(&self.icon_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to fetch currency icon: {e:#}");
                return None;
            }
        };

        match image::load_from_memory(&bytes) {
            Ok(img) => Some(
                img.resize_exact(self.icon_edge, self.icon_edge, FilterType::Lanczos3)
                    .to_rgba8(),
            ),
            Err(e) => {
                warn!("Failed to decode currency icon: {e}");
                None
            }
        }
    }

    /// Render items strictly sequentially, in extraction order.
    ///
    /// Per-item fetch and decode failures land in the report; they never
    /// abort the loop.
    async fn render_items(&self, items: &[ShopItem], icon: Option<&RgbaImage>) -> RenderReport {
        let mut report = RenderReport::default();

        for item in items {
            let artwork = match self.http.get_bytes(&item.image_url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    report.failures.push(TileFailure {
                        name: item.name.clone(),
                        image_url: item.image_url.clone(),
                        reason: format!("fetch failed: {e:#}"),
                    });
                    continue;
                }
            };

            match self.renderer.compose(item, &artwork, icon) {
                Ok(tile) => report.tiles.push(tile),
                Err(e) => {
                    report.failures.push(TileFailure {
                        name: item.name.clone(),
                        image_url: item.image_url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_builds_from_default_config() {
        let config = AppConfig::default();
        assert!(ShopPipeline::new(&config).is_ok());
    }

    #[test]
    fn output_path_comes_from_config() {
        let mut config = AppConfig::default();
        config.render.output_path = PathBuf::from("out/daily.png");
        let pipeline = ShopPipeline::new(&config).unwrap();
        assert_eq!(pipeline.output_path(), Path::new("out/daily.png"));
    }

    #[tokio::test]
    async fn empty_listing_reports_no_items_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("collage.png");
        let mut config = AppConfig::default();
        config.render.output_path = output.clone();
        let pipeline = ShopPipeline::new(&config).unwrap();

        let outcome = pipeline
            .process_listing("<html><body><p>maintenance</p></body></html>")
            .await
            .unwrap();

        match outcome {
            CycleOutcome::Empty { reason } => assert_eq!(reason, NO_ITEMS_MESSAGE),
            other => panic!("expected empty outcome, got {other:?}"),
        }
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn cards_without_images_also_yield_no_items() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("collage.png");
        let mut config = AppConfig::default();
        config.render.output_path = output.clone();
        let pipeline = ShopPipeline::new(&config).unwrap();

        let html = r#"<html><body>
            <div class="card rarity-epic"><h3 class="card-title card-name item-name">No Art</h3></div>
        </body></html>"#;
        let outcome = pipeline.process_listing(html).await.unwrap();

        assert!(matches!(outcome, CycleOutcome::Empty { reason } if reason == NO_ITEMS_MESSAGE));
        assert!(!output.exists());
    }
}
