//! Note types written into the collection

use crate::render::{render_difficulty, render_tags};
use lexcard_domain::{Card, CardType};
use serde_json::{json, Value};

/// Model id of the basic note type
pub const BASIC_MODEL_ID: i64 = 1607392319;

/// Model id of the cloze note type
pub const CLOZE_MODEL_ID: i64 = 998877665;

const BASIC_FIELDS: &[&str] = &[
    "Question", "Answer", "SourceDoc", "SourceLoc", "Tags", "Difficulty", "Evidence",
];

const CLOZE_FIELDS: &[&str] = &["Text", "SourceDoc", "SourceLoc", "Tags", "Difficulty", "Evidence"];

const META_BLOCK: &str = "<div class='meta-grid'>\
<div class='meta-item'><span class='label'>来源文档</span><span class='value'>{{SourceDoc}}</span></div>\
<div class='meta-item'><span class='label'>定位</span><span class='value'>{{SourceLoc}}</span></div>\
<div class='meta-item'><span class='label'>难度</span><span class='value'>{{Difficulty}}</span></div>\
<div class='meta-item'><span class='label'>标签</span><span class='value tags'>{{Tags}}</span></div>\
</div>\
<details class='evidence'><summary>证据片段</summary><div class='evidence-body'>{{Evidence}}</div></details>";

const CSS: &str = r#"
.card{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,'Noto Sans SC',sans-serif;line-height:1.6;font-size:16px;}
.wrap{max-width:760px;margin:0 auto;padding:8px 2px;}
.header{font-size:12px;color:#6e7781;letter-spacing:.12em;margin-bottom:12px;}
.question{font-size:22px;font-weight:700;margin:8px 0 2px;}
.cloze{font-size:20px;font-weight:600;}
.sep{border:none;border-top:1px solid #eaeef2;margin:10px 0;}
.card-block{border:1px solid #eaeef2;border-radius:10px;padding:14px 16px;margin:8px 0 14px;white-space:pre-wrap;}
.meta-grid{display:grid;grid-template-columns:1fr 1fr;gap:8px;margin:8px 0 6px;}
.meta-item{display:flex;gap:8px;align-items:baseline;border-left:3px solid #eaeef2;padding-left:8px;}
.label{color:#6e7781;font-size:12px;min-width:64px;}
.value{font-size:14px;}
.tags .tag{display:inline-block;background:#eef2ff;border:1px solid #c7d2fe;color:#3730a3;border-radius:999px;padding:2px 8px;margin-right:6px;font-size:12px;}
.badge{display:inline-block;border-radius:6px;padding:2px 8px;font-size:12px;border:1px solid #eaeef2}
.diff-easy{background:#dcfce7;border-color:#86efac;color:#166534}
.diff-medium{background:#fef9c3;border-color:#fde047;color:#854d0e}
.diff-hard{background:#fee2e2;border-color:#fca5a5;color:#7f1d1d}
.diff-unknown{background:#f6f8fa;color:#6e7781}
.evidence-body{margin-top:6px;border:1px dashed #eaeef2;border-radius:8px;padding:10px;white-space:pre-wrap;}
"#;

/// A note type: its fields and card template
#[derive(Debug, Clone, PartialEq)]
pub struct NoteModel {
    /// Model id
    pub id: i64,
    /// Display name
    pub name: &'static str,
    /// Basic or cloze
    pub kind: CardType,
    /// Field names in order
    pub fields: &'static [&'static str],
    qfmt: String,
    afmt: String,
}

impl NoteModel {
    /// The seven-field question/answer note type
    pub fn basic() -> Self {
        Self {
            id: BASIC_MODEL_ID,
            name: "Legal-Basic-Model",
            kind: CardType::Basic,
            fields: BASIC_FIELDS,
            qfmt: "<div class='wrap'><div class='header'>法律学习卡片</div>\
                   <div class='question'>{{Question}}</div></div>"
                .to_string(),
            afmt: format!(
                "{{{{FrontSide}}}}<hr class='sep'><div class='wrap'>\
                 <div class='answer card-block'>{{{{Answer}}}}</div>{}</div>",
                META_BLOCK
            ),
        }
    }

    /// The six-field cloze note type
    pub fn cloze() -> Self {
        Self {
            id: CLOZE_MODEL_ID,
            name: "Legal-Cloze-Model",
            kind: CardType::Cloze,
            fields: CLOZE_FIELDS,
            qfmt: "<div class='wrap'><div class='header'>法律学习卡片 · Cloze</div>\
                   <div class='cloze'>{{cloze:Text}}</div></div>"
                .to_string(),
            afmt: format!("{{{{FrontSide}}}}<hr class='sep'><div class='wrap'>{}</div>", META_BLOCK),
        }
    }

    /// The note type a card is written with
    pub fn for_card(card: &Card) -> Self {
        match card.card_type {
            CardType::Basic => Self::basic(),
            CardType::Cloze => Self::cloze(),
        }
    }

    /// Note field values for a card, in field order
    ///
    /// Cloze notes carry the Answer as their cloze text and no Question.
    pub fn field_values(&self, card: &Card) -> Vec<String> {
        let mut values = Vec::with_capacity(self.fields.len());
        if self.kind == CardType::Basic {
            values.push(card.question.clone());
        }
        values.extend([
            card.answer.clone(),
            card.source_doc.clone(),
            card.source_loc.clone(),
            render_tags(&card.tags),
            render_difficulty(card.difficulty.as_deref()),
            card.evidence.clone().unwrap_or_default(),
        ]);
        values
    }

    /// Model entry of the collection's `models` map
    pub fn to_json(&self, deck_id: i64, modified: i64) -> Value {
        let flds: Vec<Value> = self
            .fields
            .iter()
            .enumerate()
            .map(|(ord, name)| {
                json!({
                    "name": name,
                    "ord": ord,
                    "sticky": false,
                    "rtl": false,
                    "font": "Arial",
                    "size": 20,
                    "media": []
                })
            })
            .collect();
        let (kind, template_name) = match self.kind {
            CardType::Basic => (0, "Card 1"),
            CardType::Cloze => (1, "Cloze"),
        };

        json!({
            "id": self.id,
            "name": self.name,
            "type": kind,
            "mod": modified,
            "usn": -1,
            "sortf": 0,
            "did": deck_id,
            "tmpls": [{
                "name": template_name,
                "ord": 0,
                "qfmt": self.qfmt,
                "afmt": self.afmt,
                "did": null,
                "bqfmt": "",
                "bafmt": ""
            }],
            "flds": flds,
            "css": CSS,
            "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\begin{document}\n",
            "latexPost": "\\end{document}",
            "tags": [],
            "vers": [],
            "req": [[0, "any", [0]]]
        })
    }
}
