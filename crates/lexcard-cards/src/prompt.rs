//! LLM prompts for card generation

use lexcard_domain::{ChatRequest, ExtractedItem};
use serde_json::json;

/// Build the system prompt for a card call
pub fn card_system(max_cards_per_item: usize) -> String {
    format!(
        "你是制卡助手。只使用提供的证据片段生成学习卡片，禁止引入原文之外的解释或扩展。\n\
         输出多种问法的 Q/A 与（可选）Cloze，覆盖法条要点、解释要点、案例裁判要旨。\n\
         每张卡输出字段：type(\"basic\"|\"cloze\"), Question, Answer, Difficulty(可选), quality(0~1 数值)。\n\
         Question 简洁；Answer 必须能在证据中原文核对。最多 {} 张卡/知识点。严格只输出 JSON。",
        max_cards_per_item
    )
}

/// Build the user prompt: a JSON payload carrying the item's evidence and context
///
/// # Examples
///
/// ```
/// use lexcard_cards::prompt::build_card_prompt;
/// use lexcard_domain::{ExtractedItem, ItemType};
///
/// let mut item = ExtractedItem::new(ItemType::Statute, "law.pdf");
/// item.text = Some("经营者不得滥用市场支配地位".to_string());
///
/// let payload: serde_json::Value = serde_json::from_str(&build_card_prompt(&item, 2)).unwrap();
/// assert_eq!(payload["instruction"]["max_cards"], 2);
/// assert_eq!(payload["evidence"], "经营者不得滥用市场支配地位");
/// ```
pub fn build_card_prompt(item: &ExtractedItem, max_cards_per_item: usize) -> String {
    let payload = json!({
        "instruction": {
            "max_cards": max_cards_per_item,
            "type": item.item_type.as_str(),
            "source": item.source_label(),
            "docName": item.doc_name,
            "articleNo": item.article_no
        },
        "evidence": item.evidence(),
        "expected_schema": {
            "cards": [{
                "type": "basic",
                "Question": "...",
                "Answer": "...",
                "Difficulty": "easy|medium|hard",
                "quality": 0.8
            }]
        }
    });
    payload.to_string()
}

/// Build the full chat request for one item
pub fn card_request(
    item: &ExtractedItem,
    max_cards_per_item: usize,
    model: &str,
    temperature: f32,
) -> ChatRequest {
    ChatRequest::new(
        card_system(max_cards_per_item),
        build_card_prompt(item, max_cards_per_item),
        model,
        temperature,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcard_domain::{ItemType, Role};
    use serde_json::Value;

    fn case_item() -> ExtractedItem {
        let mut item = ExtractedItem::new(ItemType::Case, "判例汇编.pdf");
        item.case_name = Some("甲公司诉乙公司垄断纠纷案".to_string());
        item.holding = Some("……".to_string());
        item.text = Some("  法院认为……  ".to_string());
        item
    }

    #[test]
    fn test_payload_fields() {
        let payload: Value = serde_json::from_str(&build_card_prompt(&case_item(), 3)).unwrap();

        assert_eq!(payload["instruction"]["type"], "Case");
        assert_eq!(payload["instruction"]["source"], "甲公司诉乙公司垄断纠纷案");
        assert_eq!(payload["instruction"]["docName"], "判例汇编.pdf");
        assert_eq!(payload["instruction"]["articleNo"], Value::Null);
        assert_eq!(payload["evidence"], "法院认为……");
        assert!(payload["expected_schema"]["cards"].is_array());
    }

    #[test]
    fn test_payload_keeps_chinese_unescaped() {
        assert!(build_card_prompt(&case_item(), 3).contains("判例汇编.pdf"));
    }

    #[test]
    fn test_system_prompt_carries_limit() {
        assert!(card_system(2).contains("最多 2 张卡"));
    }

    #[test]
    fn test_card_request() {
        let request = card_request(&case_item(), 3, "DeepSeek-V3", 0.2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.model, "DeepSeek-V3");
    }
}
