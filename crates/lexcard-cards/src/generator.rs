//! Core Card Generator implementation

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::parser::{parse_cards_response, CardRejection};
use crate::prompt::card_request;
use lexcard_domain::{Card, ChatModel, ExtractedItem};
use lexcard_extractor::ResponseRecovery;
use lexcard_llm::chat_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cards produced by one generation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResult {
    /// Cards in (item, card) order
    pub cards: Vec<Card>,

    /// Items whose call failed or whose reply held no usable card
    pub items_without_cards: usize,

    /// Card entries dropped by the parser
    pub rejected: Vec<CardRejection>,
}

/// The Card Generator turns extracted items into flashcards
///
/// Each item gets its own model call. A failed or unparseable reply costs
/// that item's cards only; the rest of the batch carries on.
pub struct CardGenerator<M: ?Sized> {
    model: Arc<M>,
    model_name: String,
    config: GeneratorConfig,
    recovery: ResponseRecovery,
}

impl<M> CardGenerator<M>
where
    M: ChatModel + ?Sized + 'static,
{
    /// Create a new Card Generator
    pub fn new(model: Arc<M>, model_name: impl Into<String>, config: GeneratorConfig) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            config,
            recovery: ResponseRecovery::default(),
        }
    }

    /// Use a custom recovery chain
    pub fn with_recovery(mut self, recovery: ResponseRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate cards for every item
    ///
    /// At most `max_cards_per_item` cards are kept per item, in the order the
    /// model listed them.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Config`] if the configuration is invalid.
    pub async fn generate(&self, items: &[ExtractedItem]) -> Result<GenerationResult, GeneratorError> {
        self.config.validate().map_err(GeneratorError::Config)?;

        let max_cards = self.config.max_cards_per_item;
        let requests: Vec<_> = items
            .iter()
            .map(|item| card_request(item, max_cards, &self.model_name, self.config.temperature))
            .collect();

        info!("Generating cards for {} items", items.len());
        let replies = chat_all(Arc::clone(&self.model), requests, self.config.max_concurrency).await;

        let mut result = GenerationResult::default();
        for (idx, (item, reply)) in items.iter().zip(replies).enumerate() {
            let Some(reply) = reply.filter(|r| !r.trim().is_empty()) else {
                warn!("Item {} of '{}' got no reply", idx + 1, item.doc_name);
                result.items_without_cards += 1;
                continue;
            };

            let mut parsed = parse_cards_response(&reply, item, &self.recovery);
            if parsed.cards.len() > max_cards {
                debug!(
                    "Item {} returned {} cards, keeping {}",
                    idx + 1,
                    parsed.cards.len(),
                    max_cards
                );
                parsed.cards.truncate(max_cards);
            }
            if parsed.cards.is_empty() {
                result.items_without_cards += 1;
            }

            result.cards.extend(parsed.cards);
            result.rejected.extend(parsed.rejected);
        }

        info!(
            "Generated {} cards ({} items produced none, {} entries rejected)",
            result.cards.len(),
            result.items_without_cards,
            result.rejected.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcard_domain::ItemType;
    use lexcard_llm::MockProvider;

    fn raw_item(text: &str) -> ExtractedItem {
        ExtractedItem::raw_text(text, "law.txt")
    }

    #[tokio::test]
    async fn test_single_item_single_card() {
        let model = Arc::new(MockProvider::new(
            r#"{"cards":[{"type":"basic","Question":"Q1","Answer":"A1","quality":0.9}]}"#,
        ));
        let generator = CardGenerator::new(Arc::clone(&model), "DeepSeek-V3", GeneratorConfig::default());

        let result = generator.generate(&[raw_item("第一条 经营者不得……")]).await.unwrap();

        assert_eq!(result.cards.len(), 1);
        assert_eq!(result.cards[0].quality, 0.9);
        assert_eq!(result.cards[0].tags, vec!["rawtext"]);
        assert_eq!(result.cards[0].source_doc, "law.txt");

        let request = &model.requests()[0];
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.model, "DeepSeek-V3");
    }

    #[tokio::test]
    async fn test_cards_are_truncated_per_item() {
        let cards: Vec<String> = (0..5)
            .map(|i| format!(r#"{{"Question":"Q{}","Answer":"A{}"}}"#, i, i))
            .collect();
        let model = Arc::new(MockProvider::new(format!(r#"{{"cards":[{}]}}"#, cards.join(","))));
        let config = GeneratorConfig {
            max_cards_per_item: 2,
            ..GeneratorConfig::default()
        };
        let generator = CardGenerator::new(model, "m", config);

        let result = generator.generate(&[raw_item("x")]).await.unwrap();

        let questions: Vec<_> = result.cards.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["Q0", "Q1"]);
    }

    #[tokio::test]
    async fn test_failed_item_does_not_abort_batch() {
        let mut model = MockProvider::default();
        model.add_failure("坏条文");
        model.add_response("好条文", r#"{"cards":[{"Question":"Q","Answer":"A"}]}"#);
        model.add_response("乱码", "```json\n{not json\n```");
        let generator = CardGenerator::new(Arc::new(model), "m", GeneratorConfig::default());

        let items = vec![raw_item("坏条文"), raw_item("好条文"), raw_item("乱码")];
        let result = generator.generate(&items).await.unwrap();

        assert_eq!(result.cards.len(), 1);
        assert_eq!(result.items_without_cards, 2);
    }

    #[tokio::test]
    async fn test_cards_follow_item_order() {
        let mut model = MockProvider::default();
        let mut items = Vec::new();
        for i in 0..8 {
            model.add_response(
                format!("条文{}号", i),
                format!(r#"{{"cards":[{{"Question":"Q{}a","Answer":"A"}},{{"Question":"Q{}b","Answer":"A"}}]}}"#, i, i),
            );
            let mut item = ExtractedItem::new(ItemType::Statute, "law.txt");
            item.text = Some(format!("条文{}号", i));
            items.push(item);
        }
        let generator = CardGenerator::new(Arc::new(model), "m", GeneratorConfig::default());

        let result = generator.generate(&items).await.unwrap();

        let expected: Vec<String> = (0..8)
            .flat_map(|i| [format!("Q{}a", i), format!("Q{}b", i)])
            .collect();
        let questions: Vec<String> = result.cards.iter().map(|c| c.question.clone()).collect();
        assert_eq!(questions, expected);
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let config = GeneratorConfig {
            max_cards_per_item: 9,
            ..GeneratorConfig::default()
        };
        let generator = CardGenerator::new(Arc::new(MockProvider::default()), "m", config);

        assert!(matches!(
            generator.generate(&[raw_item("x")]).await,
            Err(GeneratorError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_no_items_no_calls() {
        let model = Arc::new(MockProvider::default());
        let generator = CardGenerator::new(Arc::clone(&model), "m", GeneratorConfig::default());

        let result = generator.generate(&[]).await.unwrap();

        assert!(result.cards.is_empty());
        assert_eq!(model.call_count(), 0);
    }
}
