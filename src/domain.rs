//! Domain module - Core entities and fixed constants
//!
//! This module contains the scraped item record and the constants that
//! describe the shop site and the collage geometry.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod constants;
pub mod item;

pub use item::ShopItem;
