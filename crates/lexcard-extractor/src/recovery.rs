//! Best-effort JSON recovery from model output
//!
//! Model replies should contain one JSON object or array but often arrive
//! wrapped in prose or code fences. Recovery runs an ordered list of pure
//! strategies and returns the first value any of them can parse.
//!
//! Default order:
//! 1. the whole trimmed reply, when it starts and ends with matching
//!    `{}`/`[]`
//! 2. the body of the first fenced code block (optional `json` tag, any case)
//! 3. the first balanced `{ ... }` span
//! 4. the first balanced `[ ... ]` span
//!
//! The whole-reply check runs first so that a reply which is already valid
//! JSON is never cut down to a nested fragment.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// A recovery strategy: pure function from reply text to a parsed value
pub type RecoveryStrategy = fn(&str) -> Option<Value>;

static CODE_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:jsonc|json)?\s*([\s\S]*?)```").ok());

/// Ordered chain of recovery strategies
#[derive(Debug, Clone)]
pub struct ResponseRecovery {
    strategies: Vec<(&'static str, RecoveryStrategy)>,
}

impl Default for ResponseRecovery {
    fn default() -> Self {
        Self {
            strategies: vec![
                ("whole", parse_whole as RecoveryStrategy),
                ("fenced", parse_fenced),
                ("object", parse_first_object),
                ("array", parse_first_array),
            ],
        }
    }
}

impl ResponseRecovery {
    /// Create the default strategy chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy, tried after the existing ones
    pub fn with_strategy(mut self, name: &'static str, strategy: RecoveryStrategy) -> Self {
        self.strategies.push((name, strategy));
        self
    }

    /// Names of the strategies in the order they are tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|(name, _)| *name).collect()
    }

    /// Recover a JSON value from `text`
    ///
    /// Returns `None` for empty text or when every strategy fails. Callers
    /// treat `None` as "no data", never as an error.
    pub fn recover(&self, text: &str) -> Option<Value> {
        if text.trim().is_empty() {
            return None;
        }
        for (name, strategy) in &self.strategies {
            if let Some(value) = strategy(text) {
                debug!("Recovered JSON with '{}' strategy", name);
                return Some(value);
            }
        }
        None
    }
}

/// Recover a JSON value using the default strategy chain
///
/// # Examples
///
/// ```
/// use lexcard_extractor::recover;
/// use serde_json::json;
///
/// let reply = "Sure! Here's the result:\n```json\n{\"a\":1}\n```\nHope that helps!";
/// assert_eq!(recover(reply), Some(json!({"a": 1})));
/// assert_eq!(recover("not json at all"), None);
/// ```
pub fn recover(text: &str) -> Option<Value> {
    ResponseRecovery::default().recover(text)
}

/// Parse the trimmed text directly when it is delimited like a container
pub fn parse_whole(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    let delimited = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if !delimited {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Parse the body of the first fenced code block
pub fn parse_fenced(text: &str) -> Option<Value> {
    let fence = CODE_FENCE.as_ref()?;
    let body = fence.captures(text)?.get(1)?.as_str().trim();
    serde_json::from_str(body).ok()
}

/// Parse the first balanced `{ ... }` span
pub fn parse_first_object(text: &str) -> Option<Value> {
    find_balanced(text, '{', '}').and_then(|span| serde_json::from_str(span).ok())
}

/// Parse the first balanced `[ ... ]` span
pub fn parse_first_array(text: &str) -> Option<Value> {
    find_balanced(text, '[', ']').and_then(|span| serde_json::from_str(span).ok())
}

/// Find the span from the first `open` to the delimiter that closes it
///
/// Delimiters inside double-quoted strings are ignored; backslash escapes
/// inside strings are honoured.
fn find_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                let end = start + offset + ch.len_utf8();
                return Some(&text[start..end]);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_fenced_block_with_prose() {
        let reply = "Sure! Here's the result:\n```json\n{\"a\":1}\n```\nHope that helps!";
        assert_eq!(recover(reply), Some(json!({"a": 1})));
    }

    #[test]
    fn test_fence_tag_is_case_insensitive_and_optional() {
        assert_eq!(recover("```JSON\n[1, 2]\n```"), Some(json!([1, 2])));
        assert_eq!(recover("```\n{\"b\": true}\n```"), Some(json!({"b": true})));
    }

    #[test]
    fn test_not_json() {
        assert_eq!(recover("not json at all"), None);
        assert_eq!(recover(""), None);
        assert_eq!(recover("   \n "), None);
    }

    #[test]
    fn test_embedded_object_with_garbage() {
        let reply = "结果如下 {\"items\": [{\"type\": \"Statute\"}]} 以上。";
        assert_eq!(
            recover(reply),
            Some(json!({"items": [{"type": "Statute"}]}))
        );
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let reply = r#"prefix {"text": "a } tricky { value", "q": "say \"}\""} suffix"#;
        assert_eq!(
            recover(reply),
            Some(json!({"text": "a } tricky { value", "q": "say \"}\""}))
        );
    }

    #[test]
    fn test_array_fallback_when_no_object() {
        assert_eq!(recover("list: [1, 2, 3] done"), Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_unbalanced_object_falls_through_to_array() {
        assert_eq!(recover("{ broken [4] "), Some(json!([4])));
    }

    #[test]
    fn test_broken_fence_falls_back_to_array() {
        // Only the first `{` is tried, so the broken fence body also defeats
        // the object strategy.
        let reply = "```json\n{oops}\n```\n[\"ok\"]";
        assert_eq!(recover(reply), Some(json!(["ok"])));
    }

    #[test]
    fn test_array_of_objects_is_not_truncated() {
        let text = r#"[{"a":1},{"b":2}]"#;
        assert_eq!(recover(text), Some(json!([{"a": 1}, {"b": 2}])));
    }

    #[test]
    fn test_fence_text_inside_json_string() {
        let value = json!({"s": "```1```"});
        assert_eq!(recover(&value.to_string()), Some(value));
    }

    #[test]
    fn test_custom_strategy_runs_last() {
        fn yes_means_true(text: &str) -> Option<Value> {
            (text.trim() == "yes").then(|| json!(true))
        }

        let recovery = ResponseRecovery::new().with_strategy("yes", yes_means_true);
        assert_eq!(
            recovery.strategy_names(),
            vec!["whole", "fenced", "object", "array", "yes"]
        );
        assert_eq!(recovery.recover("yes"), Some(json!(true)));
        assert_eq!(recovery.recover("{\"a\": 1}"), Some(json!({"a": 1})));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "\\PC{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("\\PC{0,6}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn arb_container() -> impl Strategy<Value = Value> {
        prop_oneof![
            prop::collection::vec(arb_json(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("\\PC{0,6}", arb_json(), 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    }

    proptest! {
        #[test]
        fn prop_recover_of_serialized_value_is_identity(value in arb_container()) {
            let text = serde_json::to_string(&value).unwrap();
            prop_assert_eq!(recover(&text), Some(value.clone()));

            let pretty = serde_json::to_string_pretty(&value).unwrap();
            prop_assert_eq!(recover(&pretty), Some(value));
        }

        #[test]
        fn prop_recover_never_panics(text in "\\PC{0,200}") {
            let _ = recover(&text);
        }
    }
}
