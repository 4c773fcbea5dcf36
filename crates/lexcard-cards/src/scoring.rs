//! Local quality scoring for cards the model did not score

/// Base score of any complete card
const BASE: f64 = 0.55;

/// Weight of answer completeness
const COVERAGE_WEIGHT: f64 = 0.35;

/// Answer length (characters) that earns the full completeness weight
const FULL_ANSWER_CHARS: f64 = 80.0;

/// Flat bonus for grounded cards
const EVIDENCE_BONUS: f64 = 0.10;

/// Evidence length (characters) that earns the bonus
const MIN_EVIDENCE_CHARS: usize = 20;

/// Heuristic quality score in [0, 1]
///
/// `0.55 + 0.35 * min(answer_chars / 80, 1) + 0.10` when the evidence has at
/// least 20 characters. Cards missing a question or an answer score 0.
///
/// # Examples
///
/// ```
/// use lexcard_cards::heuristic_quality;
///
/// let score = heuristic_quality("Q", &"A".repeat(80), "");
/// assert!((score - 0.90).abs() < 1e-9);
/// ```
pub fn heuristic_quality(question: &str, answer: &str, evidence: &str) -> f64 {
    if question.is_empty() || answer.is_empty() {
        return 0.0;
    }
    let coverage = (answer.chars().count() as f64 / FULL_ANSWER_CHARS).min(1.0);
    let bonus = if evidence.chars().count() >= MIN_EVIDENCE_CHARS {
        EVIDENCE_BONUS
    } else {
        0.0
    };
    (BASE + COVERAGE_WEIGHT * coverage + bonus).clamp(0.0, 1.0)
}
