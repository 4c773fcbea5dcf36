//! Lexcard Card Generator
//!
//! Turns extracted legal items into question/answer and cloze flashcards
//! using an LLM.
//!
//! # Overview
//!
//! Each item is sent to the model with its evidence text and document
//! context. The reply is recovered, every card entry is validated on its
//! own, and the item's provenance is attached locally:
//!
//! - `SourceDoc` / `SourceLoc` come from the item, not the model
//! - `Tags` start with the lowercased item type, then `kw:<keyword>` per hit
//! - `Evidence` is the item's own text, never regenerated
//! - `quality` is the model's score when it is a positive number, otherwise
//!   the local [`heuristic_quality`]
//!
//! # Example Usage
//!
//! ```no_run
//! use lexcard_cards::{CardGenerator, GeneratorConfig};
//! use lexcard_domain::ExtractedItem;
//! use lexcard_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Arc::new(MockProvider::new(
//!     r#"{"cards":[{"type":"basic","Question":"Q1","Answer":"A1","quality":0.9}]}"#,
//! ));
//! let generator = CardGenerator::new(model, "DeepSeek-V3", GeneratorConfig::default());
//!
//! let items = vec![ExtractedItem::raw_text("第一条 ……", "law.txt")];
//! let result = generator.generate(&items).await?;
//! assert_eq!(result.cards.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod generator;
mod parser;
pub mod prompt;
mod scoring;

pub use config::{GeneratorConfig, MAX_CARDS_PER_ITEM, MIN_CARDS_PER_ITEM};
pub use error::GeneratorError;
pub use generator::{CardGenerator, GenerationResult};
pub use parser::{build_card, parse_cards_response, CardRejection, ParsedCards};
pub use scoring::heuristic_quality;
