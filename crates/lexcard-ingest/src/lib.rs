//! Lexcard Ingest
//!
//! Reads source documents from disk for the card pipeline.
//!
//! | Extension | Text | Pages |
//! |-----------|------|-------|
//! | `.txt`  | lossy UTF-8 | 0 |
//! | `.pdf`  | text of every page | page count |
//! | `.docx` | `w:t` runs, one line per paragraph | 0 |
//!
//! Extensions match case-insensitively. Anything else is skipped by
//! [`load_documents`], never reported as an error.
//!
//! # Examples
//!
//! ```no_run
//! use lexcard_ingest::{load_documents, FsDocumentLoader};
//!
//! let docs = load_documents(&FsDocumentLoader::new(), &["law.pdf", "notes.md"])?;
//! # Ok::<(), lexcard_ingest::IngestError>(())
//! ```

#![warn(missing_docs)]

mod error;
mod format;
mod loader;

pub use error::{IngestError, Result};
pub use format::FileFormat;
pub use loader::{load_documents, FsDocumentLoader};
