//! Parse model output into cards

use crate::scoring::heuristic_quality;
use lexcard_domain::{Card, CardType, ExtractedItem};
use lexcard_extractor::ResponseRecovery;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Why a raw card was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardRejection {
    /// The entry is not a JSON object
    NotAnObject,

    /// `Question` missing or blank
    MissingQuestion,

    /// `Answer` missing or blank
    MissingAnswer,

    /// `type` is neither `basic` nor `cloze`
    UnknownType(String),

    /// A field has the wrong JSON shape
    InvalidField {
        /// Wire name of the field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

impl fmt::Display for CardRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardRejection::NotAnObject => write!(f, "card is not a JSON object"),
            CardRejection::MissingQuestion => write!(f, "missing 'Question'"),
            CardRejection::MissingAnswer => write!(f, "missing 'Answer'"),
            CardRejection::UnknownType(t) => write!(f, "unknown card type '{}'", t),
            CardRejection::InvalidField { field, reason } => {
                write!(f, "invalid '{}': {}", field, reason)
            }
        }
    }
}

/// Outcome of parsing one model reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCards {
    /// Cards built from well-formed entries, in reply order
    pub cards: Vec<Card>,

    /// Entries that were dropped, with the reason
    pub rejected: Vec<CardRejection>,
}

/// Parse a model reply into cards for `item`
///
/// The reply must recover to an object holding a `cards` array; anything
/// else yields nothing. Provenance, tags and evidence come from the item,
/// never from the model.
pub fn parse_cards_response(
    response: &str,
    item: &ExtractedItem,
    recovery: &ResponseRecovery,
) -> ParsedCards {
    let mut parsed = ParsedCards::default();

    let Some(Value::Object(data)) = recovery.recover(response) else {
        return parsed;
    };
    let Some(raw_cards) = data.get("cards").and_then(Value::as_array) else {
        return parsed;
    };

    for (idx, raw) in raw_cards.iter().enumerate() {
        match build_card(raw, item) {
            Ok(card) => parsed.cards.push(card),
            Err(reason) => {
                debug!("Dropping card {} for '{}': {}", idx, item.doc_name, reason);
                parsed.rejected.push(reason);
            }
        }
    }
    parsed
}

/// Validate one raw card and attach the item's provenance
pub fn build_card(raw: &Value, item: &ExtractedItem) -> Result<Card, CardRejection> {
    let obj = raw.as_object().ok_or(CardRejection::NotAnObject)?;

    let question = text_field(obj, "Question")?;
    if question.is_empty() {
        return Err(CardRejection::MissingQuestion);
    }
    let answer = text_field(obj, "Answer")?;
    if answer.is_empty() {
        return Err(CardRejection::MissingAnswer);
    }

    let card_type = match obj.get("type") {
        None | Some(Value::Null) => CardType::Basic,
        Some(Value::String(s)) => {
            CardType::parse(s).ok_or_else(|| CardRejection::UnknownType(s.clone()))?
        }
        Some(other) => return Err(CardRejection::UnknownType(other.to_string())),
    };

    let difficulty = text_field(obj, "Difficulty")?;
    let evidence = item.evidence();

    let quality = match model_quality(obj.get("quality")) {
        Some(q) => q,
        None => heuristic_quality(&question, &answer, evidence),
    };

    let mut tags = vec![item.item_type.tag()];
    tags.extend(item.keywords().iter().map(|k| format!("kw:{}", k)));

    Ok(Card {
        card_type,
        question,
        answer,
        source_doc: item.doc_name.clone(),
        source_loc: item.location().to_string(),
        tags,
        difficulty: (!difficulty.is_empty()).then_some(difficulty),
        evidence: (!evidence.is_empty()).then(|| evidence.to_string()),
        quality,
    })
}

/// A model-supplied score, if it is numeric and positive; capped at 1
fn model_quality(value: Option<&Value>) -> Option<f64> {
    let score = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (score > 0.0).then(|| score.min(1.0))
}

/// Trimmed text of a string field; missing or null reads as empty
fn text_field(obj: &Map<String, Value>, field: &'static str) -> Result<String, CardRejection> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(CardRejection::InvalidField {
            field,
            reason: format!("expected string, got {}", other),
        }),
    }
}
