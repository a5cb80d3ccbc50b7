// src/lib.rs
// Public library surface for the service binary, the CLI and integration tests.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod engine;
pub mod ingest;
pub mod metrics;
pub mod quality;
pub mod seen;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::engine::{FeedEngine, FeedSnapshot, FeedSources};
pub use crate::ingest::types::{
    FactualityTier, FeedItem, NewsStoryItem, PaperItem, SourceInfo, SourceProvider,
};
