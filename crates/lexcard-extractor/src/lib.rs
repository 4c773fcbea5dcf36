//! Lexcard Extractor
//!
//! Turns legal documents into structured items (statutes, judicial
//! interpretations, cases, keyword hits) using an LLM.
//!
//! # Overview
//!
//! The Extractor is the first model-driven stage of the card pipeline. Each
//! document is split into overlapping windows, each window is sent to the
//! model with the requested keywords, and every reply is recovered and
//! validated item by item.
//!
//! # Architecture
//!
//! ```text
//! Document → TextChunker → prompt → ChatModel → ResponseRecovery → ItemValidator → ExtractedItem
//! ```
//!
//! # Key Features
//!
//! - **Response Recovery**: ordered, extensible chain of JSON recovery strategies
//! - **Character Windows**: overlapping chunks counted in characters
//! - **Tolerant Validation**: a malformed item never discards its siblings
//! - **Raw-text Fallback**: without keywords, windows become `RawText` items
//!   with no model call
//! - **Semantic Pass**: optional second read for semantically related content
//! - **Bounded Concurrency**: model calls fan out with a permit limit while
//!   results keep (document, chunk, item) order
//!
//! # Example Usage
//!
//! ```no_run
//! use lexcard_extractor::{Extractor, ExtractorConfig};
//! use lexcard_domain::Document;
//! use lexcard_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Arc::new(MockProvider::new(r#"{"items": [{"type": "Statute", "text": "……"}]}"#));
//! let extractor = Extractor::new(model, "DeepSeek-V3", ExtractorConfig::default());
//!
//! let docs = vec![Document::new("law.txt", "/data/law.txt", "第一条 ……", 0)];
//! let result = extractor.extract(&docs, &["垄断".to_string()]).await?;
//!
//! println!("Extracted {} items from {} chunks", result.items.len(), result.chunks_processed);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod extractor;
mod parser;
pub mod prompt;
mod recovery;
mod semantic;


pub use chunking::{chunk_documents_to_items, TextChunker};
pub use config::{ExtractorConfig, SemanticConfig};
pub use error::ExtractorError;
pub use extractor::{chunk_to_items, ExtractionResult, Extractor};
pub use parser::{parse_items_response, ItemRejection, ItemValidator, ParsedItems};
pub use recovery::{
    parse_fenced, parse_first_array, parse_first_object, parse_whole, recover,
    RecoveryStrategy, ResponseRecovery,
};
pub use semantic::{segment_text, SemanticExtractor};
