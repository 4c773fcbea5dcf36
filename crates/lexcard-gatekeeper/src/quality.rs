//! Quality gate

use lexcard_domain::Card;

/// Why the quality gate dropped a card
#[derive(Debug, Clone, PartialEq)]
pub enum QualityIssue {
    /// Question or Answer is blank
    MissingText,

    /// Score below the minimum
    BelowMinimum {
        /// The card's score
        quality: f64,
        /// The configured minimum
        min_quality: f64,
    },
}

/// Check one card against the gate
///
/// Returns `None` when the card passes: both texts present and
/// `quality >= min_quality`.
pub fn check_quality(card: &Card, min_quality: f64) -> Option<QualityIssue> {
    if !card.is_complete() {
        return Some(QualityIssue::MissingText);
    }
    // Written so that a NaN score fails.
    if !(card.quality >= min_quality) {
        return Some(QualityIssue::BelowMinimum {
            quality: card.quality,
            min_quality,
        });
    }
    None
}

/// Keep the cards that pass the gate, in their original order
///
/// # Examples
///
/// ```
/// use lexcard_domain::Card;
/// use lexcard_gatekeeper::quality_gate;
///
/// let cards = vec![Card::basic("Q1", "A1").with_quality(0.9), Card::basic("Q2", "A2").with_quality(0.2)];
/// let kept = quality_gate(cards, 0.3);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].question, "Q1");
/// ```
pub fn quality_gate(cards: Vec<Card>, min_quality: f64) -> Vec<Card> {
    cards
        .into_iter()
        .filter(|card| check_quality(card, min_quality).is_none())
        .collect()
}
