//! Lexcard Anki Export
//!
//! Writes cards into an Anki `.apkg` package: a zip archive holding an
//! SQLite `collection.anki2` and an empty `media` map.
//!
//! # Note types
//!
//! - **Legal-Basic-Model**: Question, Answer, SourceDoc, SourceLoc, Tags,
//!   Difficulty, Evidence
//! - **Legal-Cloze-Model**: Text (the card's Answer), SourceDoc, SourceLoc,
//!   Tags, Difficulty, Evidence
//!
//! Tags are rendered as badge spans and Difficulty as a classified badge.
//!
//! # Examples
//!
//! ```no_run
//! use lexcard_anki::AnkiExporter;
//! use lexcard_domain::{Card, PackageExporter};
//!
//! let exporter = AnkiExporter::new("exports");
//! let path = exporter.export("反垄断法", &[Card::basic("Q1", "A1").with_quality(0.9)])?;
//! println!("wrote {}", path.display());
//! # Ok::<(), lexcard_anki::ExportError>(())
//! ```

#![warn(missing_docs)]

mod collection;
mod error;
mod exporter;
mod model;
mod render;

pub use collection::{field_checksum, Collection, FIELD_SEPARATOR};
pub use error::{ExportError, Result};
pub use exporter::{AnkiExporter, DECK_ID};
pub use model::{NoteModel, BASIC_MODEL_ID, CLOZE_MODEL_ID};
pub use render::{cloze_indices, render_difficulty, render_tags, strip_html, DifficultyClass};
