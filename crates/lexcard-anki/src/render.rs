//! Field rendering for note fields

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static CLOZE_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{\{c(\d+)::").ok());

static HTML_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Difficulty bucket used for badge styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyClass {
    /// easy / 简单 / 易
    Easy,
    /// medium / 中等 / 中
    Medium,
    /// hard / 困难 / 难
    Hard,
    /// Anything else
    Unknown,
}

impl DifficultyClass {
    /// Classify a difficulty label, ignoring case and surrounding whitespace
    pub fn classify(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "easy" | "简单" | "易" => DifficultyClass::Easy,
            "medium" | "中等" | "中" => DifficultyClass::Medium,
            "hard" | "困难" | "难" => DifficultyClass::Hard,
            _ => DifficultyClass::Unknown,
        }
    }

    /// CSS class of the badge
    pub fn css_class(&self) -> &'static str {
        match self {
            DifficultyClass::Easy => "diff-easy",
            DifficultyClass::Medium => "diff-medium",
            DifficultyClass::Hard => "diff-hard",
            DifficultyClass::Unknown => "diff-unknown",
        }
    }
}

/// Render tags as badge spans joined by a space
///
/// Blank tags are skipped; no tags gives the empty string.
///
/// # Examples
///
/// ```
/// use lexcard_anki::render_tags;
///
/// let tags = vec!["statute".to_string(), " ".to_string(), "kw:垄断".to_string()];
/// assert_eq!(
///     render_tags(&tags),
///     "<span class='tag'>statute</span> <span class='tag'>kw:垄断</span>"
/// );
/// ```
pub fn render_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| format!("<span class='tag'>{}</span>", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a difficulty label as a classified badge
///
/// The label is shown as given; no label gives the empty string.
pub fn render_difficulty(difficulty: Option<&str>) -> String {
    match difficulty {
        Some(label) if !label.is_empty() => format!(
            "<span class='badge {}'>{}</span>",
            DifficultyClass::classify(label).css_class(),
            label
        ),
        _ => String::new(),
    }
}

/// Distinct cloze indices in ascending order, `{{c1::…}}` giving 1
pub fn cloze_indices(text: &str) -> Vec<u32> {
    let Some(re) = CLOZE_MARKER.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Field text with HTML tags removed, as used for sorting and checksums
pub fn strip_html(text: &str) -> String {
    match HTML_TAG.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Note tag string: space-separated, whitespace inside a tag replaced by `_`
pub(crate) fn note_tags(tags: &[String]) -> String {
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join("_"))
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        String::new()
    } else {
        format!(" {} ", tags.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_buckets() {
        assert_eq!(DifficultyClass::classify(" Easy "), DifficultyClass::Easy);
        assert_eq!(DifficultyClass::classify("简单"), DifficultyClass::Easy);
        assert_eq!(DifficultyClass::classify("中"), DifficultyClass::Medium);
        assert_eq!(DifficultyClass::classify("HARD"), DifficultyClass::Hard);
        assert_eq!(DifficultyClass::classify("困难"), DifficultyClass::Hard);
        assert_eq!(DifficultyClass::classify("extreme"), DifficultyClass::Unknown);
    }

    #[test]
    fn test_render_difficulty() {
        assert_eq!(
            render_difficulty(Some("Hard")),
            "<span class='badge diff-hard'>Hard</span>"
        );
        assert_eq!(
            render_difficulty(Some("?")),
            "<span class='badge diff-unknown'>?</span>"
        );
        assert_eq!(render_difficulty(Some("")), "");
        assert_eq!(render_difficulty(None), "");
    }

    #[test]
    fn test_empty_tags() {
        assert_eq!(render_tags(&[]), "");
        assert_eq!(render_tags(&["  ".to_string()]), "");
    }

    #[test]
    fn test_cloze_indices() {
        assert_eq!(
            cloze_indices("{{c2::经营者}}不得{{c1::滥用}}{{c2::市场支配地位}}"),
            vec![1, 2]
        );
        assert!(cloze_indices("no deletions").is_empty());
        assert!(cloze_indices("{{c0::zero}}").is_empty());
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<b>第一条</b> 经营者<br/>"), "第一条 经营者");
    }

    #[test]
    fn test_note_tags() {
        let tags = vec!["statute".to_string(), "kw:unfair pricing".to_string()];
        assert_eq!(note_tags(&tags), " statute kw:unfair_pricing ");
        assert_eq!(note_tags(&[]), "");
    }
}
