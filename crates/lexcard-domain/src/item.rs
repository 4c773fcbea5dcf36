//! Item module - structured legal items extracted from documents

use serde::{Deserialize, Serialize};

/// Kind of extracted item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// A statutory article
    Statute,

    /// A judicial interpretation
    JudicialInterpretation,

    /// A court case
    Case,

    /// A passage matching one of the requested keywords
    KeywordHit,

    /// A raw text window produced without a model call
    RawText,
}

impl ItemType {
    /// The kinds a model is allowed to report
    pub const EXTRACTABLE: [ItemType; 4] = [
        ItemType::Statute,
        ItemType::JudicialInterpretation,
        ItemType::Case,
        ItemType::KeywordHit,
    ];

    /// Get the type name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Statute => "Statute",
            ItemType::JudicialInterpretation => "JudicialInterpretation",
            ItemType::Case => "Case",
            ItemType::KeywordHit => "KeywordHit",
            ItemType::RawText => "RawText",
        }
    }

    /// Parse a type name, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "statute" => Some(ItemType::Statute),
            "judicialinterpretation" => Some(ItemType::JudicialInterpretation),
            "case" => Some(ItemType::Case),
            "keywordhit" => Some(ItemType::KeywordHit),
            "rawtext" => Some(ItemType::RawText),
            _ => None,
        }
    }

    /// Whether a model may report this kind (everything except `RawText`)
    pub fn is_extractable(&self) -> bool {
        !matches!(self, ItemType::RawText)
    }

    /// Lowercased name, used as the seed tag of generated cards
    pub fn tag(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid item type: {}", s))
    }
}

/// A structured item extracted from a document
///
/// All descriptive fields are optional; `text` is the evidence later used to
/// ground cards. `doc_name` is always set and names the originating
/// [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedItem {
    /// Item kind
    #[serde(rename = "type")]
    pub item_type: ItemType,

    /// Title of the law or interpretation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Article number, e.g. "第十条"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_no: Option<String>,

    /// Issuing source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Section or chapter heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Case name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,

    /// Deciding court
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,

    /// Judgment date as written in the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judgment_date: Option<String>,

    /// Docket number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docket_no: Option<String>,

    /// Holding of a case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holding: Option<String>,

    /// Reasoning of a case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Evidence text copied from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Page range `[first, last]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_range: Option<Vec<i64>>,

    /// Character span `[start, end]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_span: Option<Vec<i64>>,

    /// Keywords this item matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords_hit: Option<Vec<String>>,

    /// Name of the originating document
    pub doc_name: String,
}

impl ExtractedItem {
    /// Create an item with only its kind and document set
    pub fn new(item_type: ItemType, doc_name: impl Into<String>) -> Self {
        Self {
            item_type,
            title: None,
            article_no: None,
            source: None,
            section: None,
            case_name: None,
            court: None,
            judgment_date: None,
            docket_no: None,
            holding: None,
            reasoning: None,
            text: None,
            page_range: None,
            char_span: None,
            keywords_hit: None,
            doc_name: doc_name.into(),
        }
    }

    /// Create a `RawText` item for one chunk of a document
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcard_domain::{ExtractedItem, ItemType};
    ///
    /// let item = ExtractedItem::raw_text("第一条 ……", "law.txt");
    /// assert_eq!(item.item_type, ItemType::RawText);
    /// assert_eq!(item.doc_name, "law.txt");
    /// ```
    pub fn raw_text(text: impl Into<String>, doc_name: impl Into<String>) -> Self {
        let mut item = Self::new(ItemType::RawText, doc_name);
        item.text = Some(text.into());
        item
    }

    /// Evidence text, trimmed; empty when the item carries none
    pub fn evidence(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// Human-readable origin: title, then source, then case name
    pub fn source_label(&self) -> &str {
        first_present(&[&self.title, &self.source, &self.case_name])
    }

    /// Location inside the document: article number, then section, then docket number
    pub fn location(&self) -> &str {
        first_present(&[&self.article_no, &self.section, &self.docket_no])
    }

    /// Keywords recorded on this item
    pub fn keywords(&self) -> &[String] {
        self.keywords_hit.as_deref().unwrap_or(&[])
    }
}

fn first_present<'a>(fields: &[&'a Option<String>]) -> &'a str {
    fields
        .iter()
        .filter_map(|f| f.as_deref())
        .find(|s| !s.is_empty())
        .unwrap_or("")
}
