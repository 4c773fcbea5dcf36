//! Parse model output into extracted items
//!
//! Each raw item is checked field by field and either becomes an
//! [`ExtractedItem`] or an [`ItemRejection`] describing why it was dropped.
//! A rejected item never affects its siblings.

use crate::recovery::ResponseRecovery;
use lexcard_domain::{ExtractedItem, ItemType};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Why a raw item was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRejection {
    /// The entry is not a JSON object
    NotAnObject,

    /// No `type` field and no default kind
    MissingType,

    /// `type` is not one of the known kinds
    UnknownType(String),

    /// `type` names a kind the model may not report
    NotExtractable(ItemType),

    /// A field has the wrong JSON shape
    InvalidField {
        /// Wire name of the field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

impl fmt::Display for ItemRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRejection::NotAnObject => write!(f, "item is not a JSON object"),
            ItemRejection::MissingType => write!(f, "missing 'type'"),
            ItemRejection::UnknownType(t) => write!(f, "unknown type '{}'", t),
            ItemRejection::NotExtractable(t) => write!(f, "type '{}' may not be extracted", t),
            ItemRejection::InvalidField { field, reason } => {
                write!(f, "invalid '{}': {}", field, reason)
            }
        }
    }
}

/// Field-by-field validator for raw model items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemValidator {
    default_type: Option<ItemType>,
    semantic_aliases: bool,
}

impl ItemValidator {
    /// Validator for the keyword-grounded extraction prompt: `type` is required
    pub fn strict() -> Self {
        Self::default()
    }

    /// Validator for the semantic pass
    ///
    /// A missing `type` means `KeywordHit`, `semantic_matches` stands in for
    /// `keywordsHit`, and `content`/`evidence` stand in for `text`.
    pub fn semantic() -> Self {
        Self {
            default_type: Some(ItemType::KeywordHit),
            semantic_aliases: true,
        }
    }

    /// Validate one raw item and stamp it with `doc_name`
    ///
    /// Unknown fields are ignored; any `docName` in the raw item is replaced.
    pub fn validate(&self, raw: &Value, doc_name: &str) -> Result<ExtractedItem, ItemRejection> {
        let obj = raw.as_object().ok_or(ItemRejection::NotAnObject)?;

        let item_type = match obj.get("type") {
            None | Some(Value::Null) => self.default_type.ok_or(ItemRejection::MissingType)?,
            Some(Value::String(s)) => {
                ItemType::parse(s).ok_or_else(|| ItemRejection::UnknownType(s.clone()))?
            }
            Some(other) => return Err(ItemRejection::UnknownType(other.to_string())),
        };
        if !item_type.is_extractable() {
            return Err(ItemRejection::NotExtractable(item_type));
        }

        let mut item = ExtractedItem::new(item_type, doc_name);
        item.title = string_field(obj, "title")?;
        item.article_no = string_field(obj, "articleNo")?;
        item.source = string_field(obj, "source")?;
        item.section = string_field(obj, "section")?;
        item.case_name = string_field(obj, "caseName")?;
        item.court = string_field(obj, "court")?;
        item.judgment_date = string_field(obj, "judgmentDate")?;
        item.docket_no = string_field(obj, "docketNo")?;
        item.holding = string_field(obj, "holding")?;
        item.reasoning = string_field(obj, "reasoning")?;
        item.text = string_field(obj, "text")?;
        item.page_range = int_list_field(obj, "pageRange")?;
        item.char_span = int_list_field(obj, "charSpan")?;
        item.keywords_hit = string_list_field(obj, "keywordsHit")?;

        if self.semantic_aliases {
            if item.text.is_none() {
                item.text = match string_field(obj, "content")? {
                    Some(text) => Some(text),
                    None => string_field(obj, "evidence")?,
                };
            }
            if item.keywords_hit.is_none() {
                item.keywords_hit = string_list_field(obj, "semantic_matches")?;
            }
        }

        Ok(item)
    }
}

/// Outcome of parsing one model reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedItems {
    /// Items that passed validation, in reply order
    pub items: Vec<ExtractedItem>,

    /// Items that were dropped, with the reason
    pub rejected: Vec<ItemRejection>,
}

/// Parse a model reply into validated items
///
/// The reply must recover to an object holding an `items` (or `Items`)
/// array; anything else yields no items and no rejections.
pub fn parse_items_response(
    response: &str,
    recovery: &ResponseRecovery,
    validator: &ItemValidator,
    doc_name: &str,
) -> ParsedItems {
    let mut parsed = ParsedItems::default();

    let Some(Value::Object(data)) = recovery.recover(response) else {
        return parsed;
    };
    let Some(raw_items) = item_list(&data) else {
        return parsed;
    };

    for (idx, raw) in raw_items.iter().enumerate() {
        match validator.validate(raw, doc_name) {
            Ok(item) => parsed.items.push(item),
            Err(reason) => {
                debug!("Dropping item {} from '{}': {}", idx, doc_name, reason);
                parsed.rejected.push(reason);
            }
        }
    }
    parsed
}

/// First non-empty `items`/`Items` array
fn item_list(data: &Map<String, Value>) -> Option<&Vec<Value>> {
    ["items", "Items"]
        .iter()
        .filter_map(|key| data.get(*key))
        .find(|value| is_truthy(value))
        .and_then(Value::as_array)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

fn string_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<String>, ItemRejection> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ItemRejection::InvalidField {
            field,
            reason: format!("expected string, got {}", kind(other)),
        }),
    }
}

fn int_list_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<Vec<i64>>, ItemRejection> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_i64().ok_or_else(|| ItemRejection::InvalidField {
                    field,
                    reason: format!("expected integer element, got {}", kind(v)),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(ItemRejection::InvalidField {
            field,
            reason: format!("expected array, got {}", kind(other)),
        }),
    }
}

fn string_list_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<Vec<String>>, ItemRejection> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(ItemRejection::InvalidField {
                    field,
                    reason: format!("expected string element, got {}", kind(other)),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(ItemRejection::InvalidField {
            field,
            reason: format!("expected array, got {}", kind(other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
