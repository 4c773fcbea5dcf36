//! Optional semantic re-extraction pass
//!
//! When keyword extraction finds too little, each document is re-read in
//! large segments with a prompt asking for content semantically related to
//! the keywords (synonyms, related concepts), not only literal matches.
//! Items go through the same field validator as the primary pass, in its
//! lenient [`ItemValidator::semantic`] form.

use crate::config::SemanticConfig;
use crate::extractor::ExtractionResult;
use crate::parser::{parse_items_response, ItemValidator};
use crate::prompt::semantic_request;
use crate::recovery::ResponseRecovery;
use lexcard_domain::{ChatModel, Document};
use lexcard_llm::chat_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Sentence terminator preferred as a segment boundary
const SENTENCE_END: char = '。';

/// Split `text` into semantic segments
///
/// Windows are `segment_size` characters, overlapping by `overlap`. A window
/// that is not the last is cut back to its final `。` when that falls in the
/// window's last fifth. At most `max_segments` segments are returned.
pub fn segment_text<'a>(text: &'a str, config: &SemanticConfig) -> Vec<&'a str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let n = chars.len();
    let byte_at = |idx: usize| chars.get(idx).map_or(text.len(), |(b, _)| *b);

    if n <= config.segment_size {
        return vec![text];
    }

    let mut segments = Vec::new();
    let mut start = 0;
    loop {
        let mut end = (start + config.segment_size).min(n);
        if end < n {
            let window = end - start;
            if let Some(pos) = chars[start..end].iter().rposition(|(_, c)| *c == SENTENCE_END) {
                if pos * 5 > window * 4 {
                    end = start + pos + 1;
                }
            }
        }

        segments.push(&text[byte_at(start)..byte_at(end)]);
        if end == n || segments.len() >= config.max_segments {
            break;
        }

        let next = end.saturating_sub(config.overlap);
        start = if next > start { next } else { end };
    }
    segments
}

/// Re-extracts items from whole documents with a semantic prompt
pub struct SemanticExtractor<M: ?Sized> {
    model: Arc<M>,
    model_name: String,
    config: SemanticConfig,
    temperature: f32,
    max_concurrency: usize,
    recovery: ResponseRecovery,
}

impl<M> SemanticExtractor<M>
where
    M: ChatModel + ?Sized + 'static,
{
    /// Create a new semantic extractor
    pub fn new(model: Arc<M>, model_name: impl Into<String>, config: SemanticConfig) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            config,
            temperature: 0.0,
            max_concurrency: 4,
            recovery: ResponseRecovery::default(),
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of concurrent model calls
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Use a custom recovery chain
    pub fn with_recovery(mut self, recovery: ResponseRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    /// Extract semantically related items from every document
    ///
    /// Items keep the name of the document they were read from and come back
    /// in (document, segment, item) order.
    pub async fn extract(&self, documents: &[Document], keywords: &[String]) -> ExtractionResult {
        let mut owners = Vec::new();
        let mut requests = Vec::new();

        for doc in documents.iter().filter(|d| !d.is_blank()) {
            let segments = segment_text(&doc.text, &self.config);
            debug!("Semantic pass: '{}' split into {} segments", doc.name, segments.len());
            for segment in segments {
                owners.push(doc.name.as_str());
                requests.push(semantic_request(segment, keywords, &self.model_name, self.temperature));
            }
        }

        let replies = chat_all(Arc::clone(&self.model), requests, self.max_concurrency).await;

        let validator = ItemValidator::semantic();
        let mut result = ExtractionResult {
            chunks_processed: replies.len(),
            ..ExtractionResult::default()
        };
        for (doc_name, reply) in owners.into_iter().zip(replies) {
            let Some(reply) = reply else { continue };
            let parsed = parse_items_response(&reply, &self.recovery, &validator, doc_name);
            result.items.extend(parsed.items);
            result.rejected.extend(parsed.rejected);
        }

        info!(
            "Semantic pass found {} items in {} segments",
            result.items.len(),
            result.chunks_processed
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcard_domain::ItemType;
    use lexcard_llm::MockProvider;

    fn config(segment_size: usize, overlap: usize, max_segments: usize) -> SemanticConfig {
        SemanticConfig {
            trigger_below: Some(1),
            segment_size,
            overlap,
            max_segments,
        }
    }

    #[test]
    fn test_short_text_is_one_segment() {
        assert_eq!(segment_text("短文本", &config(10, 2, 10)), vec!["短文本"]);
    }

    #[test]
    fn test_segments_overlap() {
        let segments = segment_text("abcdefghijkl", &config(5, 1, 10));
        assert_eq!(segments, vec!["abcde", "efghi", "ijkl"]);
    }

    #[test]
    fn test_cut_at_sentence_end_in_last_fifth() {
        // Window of 20; '。' at index 17 is past 80%, so the cut moves there.
        let text = "一二三四五六七八九十一二三四五六七。甲乙丙丁戊己";
        let segments = segment_text(text, &config(20, 2, 10));
        assert_eq!(segments[0], "一二三四五六七八九十一二三四五六七。");
        assert!(segments[1].starts_with("七。"));
    }

    #[test]
    fn test_early_sentence_end_is_ignored() {
        let segments = segment_text("一。三四五六七八九十甲乙", &config(10, 2, 10));
        assert_eq!(segments[0].chars().count(), 10);
    }

    #[test]
    fn test_max_segments_caps_output() {
        let text = "x".repeat(100);
        let segments = segment_text(&text, &config(10, 1, 3));
        assert_eq!(segments.len(), 3);
    }

    #[tokio::test]
    async fn test_semantic_items_keep_document_name() {
        let model = Arc::new(MockProvider::new(
            r#"{"items": [{"title": "相关概念", "content": "摘要", "semantic_matches": ["垄断"]}, {"type": "Nonsense"}]}"#,
        ));
        let extractor = SemanticExtractor::new(Arc::clone(&model), "m", SemanticConfig::default());
        let docs = vec![Document::new("law.pdf", "/tmp/law.pdf", "经营者不得滥用市场支配地位。", 1)];

        let result = extractor.extract(&docs, &["垄断".to_string()]).await;

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.items[0].item_type, ItemType::KeywordHit);
        assert_eq!(result.items[0].doc_name, "law.pdf");
        assert_eq!(result.items[0].keywords(), ["垄断".to_string()]);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_documents_are_not_sent() {
        let model = Arc::new(MockProvider::new(r#"{"items": []}"#));
        let extractor = SemanticExtractor::new(Arc::clone(&model), "m", SemanticConfig::default());
        let docs = vec![Document::new("blank.txt", "blank.txt", "   ", 0)];

        let result = extractor.extract(&docs, &["垄断".to_string()]).await;

        assert!(result.items.is_empty());
        assert_eq!(model.call_count(), 0);
    }
}
