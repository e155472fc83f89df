//! Application module - the scrape-and-render pipeline and its scheduling
//!
//! The pipeline itself is a pure "one cycle" function over injected
//! collaborators; the scheduler owns the timing loop and talks to the chat
//! platform only through the [`Publisher`] trait.

pub mod assets;
pub mod collage;
pub mod fonts;
pub mod pipeline;
pub mod publisher;
pub mod scheduler;
pub mod tile;

pub use pipeline::{CycleOutcome, ShopPipeline};
pub use publisher::Publisher;
pub use scheduler::Scheduler;
