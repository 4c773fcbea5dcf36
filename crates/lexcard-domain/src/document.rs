//! Document module - source text loaded from disk

use serde::{Deserialize, Serialize};

/// A loaded source document
///
/// Documents are immutable once loaded. Items extracted from a document refer
/// back to it by `name` only; the document itself is not retained past
/// extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File name, used as the back-reference from items and cards
    pub name: String,

    /// Path the document was read from
    pub path: String,

    /// Full extracted text
    pub text: String,

    /// Page count (0 when the format has no pages)
    #[serde(rename = "pages")]
    pub page_count: u32,
}

impl Document {
    /// Create a new document
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcard_domain::Document;
    ///
    /// let doc = Document::new("law.txt", "/tmp/law.txt", "第一条 ……", 0);
    /// assert_eq!(doc.char_len(), 6);
    /// ```
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        text: impl Into<String>,
        page_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            text: text.into(),
            page_count,
        }
    }

    /// Length of the text in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the document has no usable text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_characters() {
        let doc = Document::new("a.txt", "a.txt", "经营者", 0);
        assert_eq!(doc.char_len(), 3);
        assert_eq!(doc.text.len(), 9);
    }

    #[test]
    fn test_blank_document() {
        assert!(Document::new("a", "a", "  \n\t", 0).is_blank());
        assert!(!Document::new("a", "a", "text", 1).is_blank());
    }

    #[test]
    fn test_serializes_page_count_as_pages() {
        let doc = Document::new("a.pdf", "/x/a.pdf", "t", 3);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["pages"], 3);
        assert_eq!(json["name"], "a.pdf");
    }
}
