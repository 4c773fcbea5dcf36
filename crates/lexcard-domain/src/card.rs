//! Card module - flashcards generated from extracted items

use serde::{Deserialize, Serialize};

/// Card kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// Question on the front, answer on the back
    #[default]
    Basic,

    /// Answer text carries `{{c1::...}}` deletions
    Cloze,
}

impl CardType {
    /// Get the type name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Basic => "basic",
            CardType::Cloze => "cloze",
        }
    }

    /// Parse a card type, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(CardType::Basic),
            "cloze" => Some(CardType::Cloze),
            _ => None,
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flashcard
///
/// Cards are value objects: once created they are only ever filtered (by the
/// quality gate and the deduplicator), never edited. Field names on the wire
/// match the note fields of the exported package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Card kind
    #[serde(rename = "type", default)]
    pub card_type: CardType,

    /// Front of the card
    #[serde(rename = "Question")]
    pub question: String,

    /// Back of the card (cloze text for cloze cards)
    #[serde(rename = "Answer")]
    pub answer: String,

    /// Name of the originating document
    #[serde(rename = "SourceDoc")]
    pub source_doc: String,

    /// Location inside the document (article, section or docket number)
    #[serde(rename = "SourceLoc")]
    pub source_loc: String,

    /// Tags: the lowercased item type plus `kw:<keyword>` entries
    #[serde(rename = "Tags", default)]
    pub tags: Vec<String>,

    /// Difficulty label as reported by the model
    #[serde(rename = "Difficulty", default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    /// Evidence text copied from the item, for reviewers to verify grounding
    #[serde(rename = "Evidence", default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,

    /// Quality score in [0, 1]
    #[serde(default)]
    pub quality: f64,
}

impl Card {
    /// Create a basic card with empty provenance
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcard_domain::Card;
    ///
    /// let card = Card::basic("Q1", "A1").with_quality(0.9);
    /// assert!(card.is_complete());
    /// assert_eq!(card.quality, 0.9);
    /// ```
    pub fn basic(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            card_type: CardType::Basic,
            question: question.into(),
            answer: answer.into(),
            source_doc: String::new(),
            source_loc: String::new(),
            tags: Vec::new(),
            difficulty: None,
            evidence: None,
            quality: 0.0,
        }
    }

    /// Set the quality score
    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    /// Whether both question and answer carry text
    pub fn is_complete(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}
