//! Shopshot - Daily Item-Shop Collage Bot
//!
//! Scrapes the shop listing page, renders each item onto a branded tile,
//! composes the tiles into a fixed-column collage and posts the result to
//! a chat channel once per day.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the main seams for the binary and for integration tests
pub use application::pipeline::{CycleOutcome, ShopPipeline};
pub use application::publisher::Publisher;
pub use application::scheduler::{latest_collage, respond_with_latest, LatestCollage, Scheduler};
pub use domain::ShopItem;
pub use infrastructure::config::AppConfig;
