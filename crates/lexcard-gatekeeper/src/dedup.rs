//! Greedy near-duplicate removal
//!
//! Cards are visited in input order. A card is dropped when its Question or
//! its Answer is at least `threshold` similar to that of any card already
//! kept; the first-seen card always wins. Callers must therefore hand over
//! cards in a deterministic order.

use crate::similarity::token_set_ratio;
use lexcard_domain::Card;

/// Similarity of two cards: the larger of Question and Answer similarity
pub fn card_similarity(a: &Card, b: &Card) -> f64 {
    let question = token_set_ratio(&a.question, &b.question);
    if question >= 1.0 {
        return question;
    }
    question.max(token_set_ratio(&a.answer, &b.answer))
}

/// First kept card that `card` duplicates, with the similarity found
pub fn find_duplicate(card: &Card, kept: &[Card], threshold: f64) -> Option<(usize, f64)> {
    kept.iter().enumerate().find_map(|(idx, other)| {
        let similarity = card_similarity(card, other);
        (similarity >= threshold).then_some((idx, similarity))
    })
}

/// Remove near-duplicates, keeping the first of each group
///
/// # Examples
///
/// ```
/// use lexcard_domain::Card;
/// use lexcard_gatekeeper::deduplicate;
///
/// let cards = vec![
///     Card::basic("什么是 垄断协议", "排除、限制竞争的协议"),
///     Card::basic("垄断协议 什么是", "另一种说法"),
///     Card::basic("何为滥用市场支配地位", "……"),
/// ];
/// let kept = deduplicate(cards, 0.88);
/// assert_eq!(kept.len(), 2);
/// ```
pub fn deduplicate(cards: Vec<Card>, threshold: f64) -> Vec<Card> {
    let mut kept: Vec<Card> = Vec::with_capacity(cards.len());
    for card in cards {
        if find_duplicate(&card, &kept, threshold).is_none() {
            kept.push(card);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_card_kept_unchanged() {
        let card = Card::basic("Q1", "A1").with_quality(0.9);
        assert_eq!(deduplicate(vec![card.clone()], 0.88), vec![card]);
    }

    #[test]
    fn test_first_seen_wins() {
        let cards = vec![
            Card::basic("what is a cartel", "A1").with_quality(0.7),
            Card::basic("a cartel is what", "A2").with_quality(0.99),
        ];

        let kept = deduplicate(cards, 0.88);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].answer, "A1");
    }

    #[test]
    fn test_answer_similarity_alone_is_enough() {
        let cards = vec![
            Card::basic("问题一", "经营者不得滥用市场支配地位"),
            Card::basic("完全不同的问题", "经营者不得滥用市场支配地位"),
        ];
        assert_eq!(deduplicate(cards, 0.88).len(), 1);
    }

    #[test]
    fn test_threshold_boundary() {
        // token_set_ratio("abcd", "abce") is exactly 0.75; answers share nothing.
        let cards = vec![Card::basic("abcd", "x"), Card::basic("abce", "y")];

        assert_eq!(deduplicate(cards.clone(), 0.75).len(), 1);
        assert_eq!(deduplicate(cards, 0.76).len(), 2);
    }

    #[test]
    fn test_compared_against_every_kept_card() {
        let cards = vec![
            Card::basic("alpha", "one"),
            Card::basic("beta", "two"),
            Card::basic("beta", "three"),
        ];
        let kept = deduplicate(cards, 0.9);
        let answers: Vec<_> = kept.iter().map(|c| c.answer.as_str()).collect();
        assert_eq!(answers, vec!["one", "two"]);
    }

    #[test]
    fn test_find_duplicate_reports_index() {
        let kept = vec![Card::basic("x", "y"), Card::basic("abcd", "z")];
        let found = find_duplicate(&Card::basic("abce", "w"), &kept, 0.7);
        assert_eq!(found, Some((1, 0.75)));
    }

    fn arb_cards() -> impl Strategy<Value = Vec<Card>> {
        prop::collection::vec(
            ("[a-c]{1,3}( [a-c]{1,3}){0,2}", "[a-c]{1,4}")
                .prop_map(|(q, a)| Card::basic(q, a)),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn prop_dedup_is_idempotent(cards in arb_cards(), threshold in 0.5f64..=0.99) {
            let once = deduplicate(cards, threshold);
            let twice = deduplicate(once.clone(), threshold);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_kept_cards_are_pairwise_distinct(cards in arb_cards(), threshold in 0.5f64..=0.99) {
            let kept = deduplicate(cards, threshold);
            for (i, a) in kept.iter().enumerate() {
                for b in &kept[i + 1..] {
                    prop_assert!(card_similarity(a, b) < threshold);
                }
            }
        }

        #[test]
        fn prop_dedup_preserves_relative_order(cards in arb_cards(), threshold in 0.5f64..=0.99) {
            let kept = deduplicate(cards.clone(), threshold);
            let mut rest = cards.iter();
            for card in &kept {
                prop_assert!(rest.any(|c| c == card));
            }
        }
    }
}
