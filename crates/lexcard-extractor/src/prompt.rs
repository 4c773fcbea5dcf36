//! LLM prompts for item extraction

use lexcard_domain::ChatRequest;

/// System prompt for keyword-grounded extraction
pub const EXTRACT_SYSTEM: &str = "你是法律文档结构化助手。只基于提供的原文，禁止编造或补充任何未在原文出现的内容。\n\
任务：抽取法条/司法解释/案例/关键词命中，并返回严格 JSON，包含证据片段与定位（可用页码或字符区间）。\n\
要求：如果信息缺失，请留空或省略字段；items[].type ∈ {Statute, JudicialInterpretation, Case, KeywordHit}；只输出 JSON。";

/// System prompt for the semantic pass
pub const SEMANTIC_SYSTEM: &str = "你是法律文档语义分析助手。只基于提供的文档内容，保持原文准确性，不添加外部信息。只输出 JSON。";

const SEMANTIC_SCHEMA: &str = r#"{
  "items": [
    {
      "type": "Statute|JudicialInterpretation|Case|KeywordHit",
      "title": "知识点标题",
      "text": "原文证据",
      "semantic_matches": ["关键词1", "关键词2"]
    }
  ]
}"#;

/// Build the user prompt for one extraction window
///
/// # Examples
///
/// ```
/// use lexcard_extractor::prompt::build_extract_prompt;
///
/// let prompt = build_extract_prompt("第一条 ……", &["垄断".to_string(), "经营者".to_string()]);
/// assert!(prompt.starts_with("关键词：垄断, 经营者\n"));
/// assert!(prompt.ends_with("第一条 ……"));
/// ```
pub fn build_extract_prompt(chunk: &str, keywords: &[String]) -> String {
    format!(
        "关键词：{}\n请对下列原文做结构化抽取：\n{}",
        keywords.join(", "),
        chunk
    )
}

/// Build the full chat request for one extraction window
pub fn extract_request(chunk: &str, keywords: &[String], model: &str, temperature: f32) -> ChatRequest {
    ChatRequest::new(EXTRACT_SYSTEM, build_extract_prompt(chunk, keywords), model, temperature)
}

/// Build the user prompt for one semantic segment
pub fn build_semantic_prompt(segment: &str, keywords: &[String]) -> String {
    let joined = keywords.join(", ");
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "请分析以下法律文档内容，找出与关键词\"{}\"相关的知识点：\n\n",
        joined
    ));
    prompt.push_str(&format!("文档内容: {}\n", segment));
    prompt.push_str(&format!("关键词: {}\n\n", joined));
    prompt.push_str("要求：\n");
    prompt.push_str("1. 包括直接提及关键词的内容\n");
    prompt.push_str("2. 包括语义相关的内容（如同义词、相关概念）\n");
    prompt.push_str("3. 保持原文准确性，不添加外部信息\n\n");
    prompt.push_str("返回JSON格式：\n");
    prompt.push_str(SEMANTIC_SCHEMA);

    prompt
}

/// Build the full chat request for one semantic segment
pub fn semantic_request(segment: &str, keywords: &[String], model: &str, temperature: f32) -> ChatRequest {
    ChatRequest::new(SEMANTIC_SYSTEM, build_semantic_prompt(segment, keywords), model, temperature)
}
