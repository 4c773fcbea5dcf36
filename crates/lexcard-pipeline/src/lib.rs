//! Lexcard Pipeline
//!
//! Runs documents through extraction, card generation, the quality gate and
//! deduplication, and returns one [`PipelineResult`].
//!
//! # Error handling
//!
//! | Stage | On failure |
//! |-------|------------|
//! | Config validation | fatal, single message, empty result |
//! | Ingest | fatal, single message, empty result |
//! | Extraction / chunking | message recorded, no items |
//! | Card generation | message recorded, no cards |
//! | Quality gate / dedup | message recorded, no cards |
//!
//! Malformed items or cards in model output are not errors; they are dropped
//! and logged.
//!
//! [`PipelineResult`]: lexcard_domain::PipelineResult

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;

pub use config::{PipelineConfig, DEFAULT_MODEL};
pub use error::PipelineError;
pub use orchestrator::{run_pipeline, Pipeline};
