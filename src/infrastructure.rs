//! Infrastructure module - HTTP, parsing, configuration, logging, chat
//!
//! Everything that talks to the outside world lives here; the application
//! layer only sees the types re-exported below.

pub mod config;
pub mod discord;
pub mod http_client;
pub mod logging;
pub mod parsing;

pub use config::AppConfig;
pub use http_client::{HttpClient, HttpClientConfig};
pub use parsing::ShopListParser;
