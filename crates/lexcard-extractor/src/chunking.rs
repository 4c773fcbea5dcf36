//! Overlapping text windows for long documents
//!
//! Sizes are counted in characters, not bytes, so CJK text is windowed the
//! same way as ASCII.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use lexcard_domain::{Document, ExtractedItem};
use tracing::debug;

/// Splits text into windows of at most `chunk_size` characters, each
/// starting `chunk_size - overlap` characters after the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a new text chunker
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::InvalidChunking`] unless
    /// `0 <= overlap < chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ExtractorError> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(ExtractorError::InvalidChunking {
                size: chunk_size,
                overlap,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Profile used for model extraction windows
    pub fn for_extraction(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Profile used for keyword-free raw-text items
    pub fn for_raw_text(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::new(config.raw_chunk_size, config.raw_chunk_overlap)
    }

    /// Window size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap in characters
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk the given text
    ///
    /// Text no longer than one window comes back whole. The last window holds
    /// whatever remains and is not padded.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcard_extractor::TextChunker;
    ///
    /// let chunker = TextChunker::new(4, 1).unwrap();
    /// assert_eq!(chunker.chunk("abcdefghij"), vec!["abcd", "defg", "ghij"]);
    /// assert_eq!(chunker.chunk("abc"), vec!["abc"]);
    /// ```
    pub fn chunk<'a>(&self, text: &'a str) -> Vec<&'a str> {
        // Byte offset of every char boundary, including the end of the text.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let n = bounds.len() - 1;

        if n <= self.chunk_size {
            return vec![text];
        }

        let step_back = self.overlap;
        let mut chunks = Vec::with_capacity(n / (self.chunk_size - self.overlap) + 1);
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(n);
            chunks.push(&text[bounds[start]..bounds[end]]);
            if end == n {
                break;
            }
            start = end - step_back;
        }
        chunks
    }
}

/// Turn documents into `RawText` items without calling a model
///
/// One item per non-blank window of each document, trimmed, with `doc_name`
/// set. Documents with no text contribute nothing.
pub fn chunk_documents_to_items(
    documents: &[Document],
    chunker: &TextChunker,
) -> Vec<ExtractedItem> {
    let mut items = Vec::new();
    for doc in documents {
        if doc.text.is_empty() {
            continue;
        }
        let before = items.len();
        items.extend(
            chunker
                .chunk(&doc.text)
                .into_iter()
                .map(str::trim)
                .filter(|chunk| !chunk.is_empty())
                .map(|chunk| ExtractedItem::raw_text(chunk, doc.name.as_str())),
        );
        debug!("Document '{}' yielded {} raw-text items", doc.name, items.len() - before);
    }
    items
}
