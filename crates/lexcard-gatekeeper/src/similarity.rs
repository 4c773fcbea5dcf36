//! Token-set fuzzy similarity
//!
//! Word order and repeated words do not matter, and a text whose words are
//! all contained in the other scores 1.0. Tokens are whitespace-separated
//! and compared case-sensitively; lengths are counted in characters.

use std::collections::BTreeSet;

/// Token-set similarity ratio in [0, 1]
///
/// Symmetric in its arguments. Either side having no tokens gives 0.
///
/// # Examples
///
/// ```
/// use lexcard_gatekeeper::token_set_ratio;
///
/// assert_eq!(token_set_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear"), 1.0);
/// assert_eq!(token_set_ratio("ab", "ac"), 0.5);
/// assert_eq!(token_set_ratio("", "anything"), 0.0);
/// ```
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side's words are a subset of the other's.
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 1.0;
    }

    let diff_ab_joined = diff_ab.join(" ");
    let diff_ba_joined = diff_ba.join(" ");
    let ab_len = char_len(&diff_ab_joined);
    let ba_len = char_len(&diff_ba_joined);
    let sect_len = char_len(&intersection.join(" "));

    // Lengths of "sect + ab" and "sect + ba" once joined with a separator.
    let separator = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + separator + ab_len;
    let sect_ba_len = sect_len + separator + ba_len;

    let result = normalized_similarity(
        indel_distance(&diff_ab_joined, &diff_ba_joined),
        sect_ab_len + sect_ba_len,
    );
    if sect_len == 0 {
        return result;
    }

    // Comparing "sect" with "sect + ab" costs exactly the appended part.
    let sect_ab_ratio = normalized_similarity(separator + ab_len, sect_len + sect_ab_len);
    let sect_ba_ratio = normalized_similarity(separator + ba_len, sect_len + sect_ba_len);

    result.max(sect_ab_ratio).max(sect_ba_ratio)
}

/// Plain normalized indel similarity of two strings in [0, 1]
///
/// Two empty strings are identical.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    normalized_similarity(indel_distance(a, b), char_len(a) + char_len(b))
}

/// Insertions plus deletions needed to turn `a` into `b`
pub fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * lcs_len(&a, &b)
}

/// Length of the longest common subsequence
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn normalized_similarity(distance: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        return 1.0;
    }
    1.0 - distance as f64 / total_len as f64
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_texts() {
        assert_eq!(token_set_ratio("什么是垄断协议", "什么是垄断协议"), 1.0);
        assert_eq!(token_set_ratio("a b c", "c b a"), 1.0);
    }

    #[test]
    fn test_subset_scores_one() {
        assert_eq!(token_set_ratio("new york mets", "new york mets vs atlanta braves"), 1.0);
    }

    #[test]
    fn test_no_common_tokens_is_plain_ratio() {
        // Single unspaced tokens, as in Chinese text: LCS("abcd", "abce") = 3.
        assert!(close(token_set_ratio("abcd", "abce"), 0.75));
        assert!(close(token_set_ratio("经营者不得滥用", "经营者不得垄断"), 1.0 - 4.0 / 14.0));
    }

    #[test]
    fn test_partial_overlap() {
        // sect = "b", ab = "a", ba = "c": diff ratio 1 - 2/6, sect ratios 1 - 2/4.
        assert!(close(token_set_ratio("a b", "b c"), 2.0 / 3.0));
    }

    #[test]
    fn test_sect_ratio_can_win() {
        // sect = "hello world" (11), ab = "x", ba = "yyyyyyyy".
        // diff ratio: 1 - 9/(13 + 20); sect_ab ratio: 1 - 2/(11 + 13).
        let score = token_set_ratio("hello world x", "hello world yyyyyyyy");
        assert!(close(score, 1.0 - 2.0 / 24.0));
    }

    #[test]
    fn test_tokens_split_on_whitespace_only() {
        // Spaced words are reordered freely; unspaced text is a single token.
        assert_eq!(token_set_ratio("经营者 不得 滥用", "滥用 不得 经营者"), 1.0);
        assert!(close(
            token_set_ratio("经营者不得滥用", "不得滥用经营者"),
            1.0 - 6.0 / 14.0
        ));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(token_set_ratio("Apple", "apple") < 1.0);
    }

    #[test]
    fn test_blank_inputs() {
        assert_eq!(token_set_ratio("", ""), 0.0);
        assert_eq!(token_set_ratio("   ", "a"), 0.0);
    }

    #[test]
    fn test_indel_distance() {
        assert_eq!(indel_distance("", ""), 0);
        assert_eq!(indel_distance("abc", ""), 3);
        assert_eq!(indel_distance("kitten", "sitting"), 5);
        assert_eq!(indel_ratio("", ""), 1.0);
    }

    proptest! {
        #[test]
        fn prop_symmetric_and_bounded(a in "[a-d ]{0,16}", b in "[a-d ]{0,16}") {
            let ab = token_set_ratio(&a, &b);
            let ba = token_set_ratio(&b, &a);
            prop_assert!((0.0..=1.0).contains(&ab));
            prop_assert!(close(ab, ba));
        }

        #[test]
        fn prop_self_similarity(a in "[a-z]{1,5}( [a-z]{1,5}){0,4}") {
            prop_assert_eq!(token_set_ratio(&a, &a), 1.0);
        }
    }
}
