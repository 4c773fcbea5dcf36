//! Lexcard Domain Layer
//!
//! Value types and collaborator boundaries for turning legal source documents
//! into flashcards.
//!
//! ## Key Concepts
//!
//! - **Document**: loaded source text, immutable once read
//! - **ExtractedItem**: a statute, judicial interpretation, case, keyword hit
//!   or raw text window pulled out of a document, with its evidence text
//! - **Card**: a question/answer (or cloze) card grounded in an item's evidence
//! - **PipelineResult**: the single output of one pipeline run
//!
//! ## Architecture
//!
//! This crate holds no I/O. The language model, the document readers and the
//! package writer are reached only through the traits in [`traits`], so the
//! pipeline can be driven by scripted collaborators in tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod card;
pub mod document;
pub mod item;
pub mod result;
pub mod traits;

// Re-exports for convenience
pub use card::{Card, CardType};
pub use document::Document;
pub use item::{ExtractedItem, ItemType};
pub use result::{PipelineResult, PipelineStats};
pub use traits::{ChatMessage, ChatModel, ChatRequest, DocumentLoader, LoadedText, PackageExporter, Role};
