//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lexcard_domain::{Card, CardType, PipelineResult, PipelineStats};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Widest Question/Answer cell in table output, in characters
const CELL_WIDTH: usize = 40;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format cards output.
    pub fn format_cards(&self, cards: &[Card]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(cards)?),
            OutputFormat::Table => Ok(self.format_cards_table(cards)),
            OutputFormat::Quiet => Ok(format_cards_quiet(cards)),
        }
    }

    /// Format a whole run: JSON emits the full result, other formats the cards.
    pub fn format_result(&self, result: &PipelineResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            _ => self.format_cards(&result.cards),
        }
    }

    /// Format cards as a table.
    fn format_cards_table(&self, cards: &[Card]) -> String {
        if cards.is_empty() {
            return self.colorize("No cards generated.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Type", "Question", "Answer", "Source", "Difficulty", "Quality"]);

        for (idx, card) in cards.iter().enumerate() {
            let source = if card.source_loc.is_empty() {
                card.source_doc.clone()
            } else {
                format!("{} ({})", card.source_doc, card.source_loc)
            };
            builder.push_record([
                (idx + 1).to_string(),
                card.card_type.as_str().to_string(),
                truncate(&card.question, CELL_WIDTH),
                truncate(&card.answer, CELL_WIDTH),
                source,
                card.difficulty.clone().unwrap_or_else(|| "N/A".to_string()),
                format!("{:.2}", card.quality),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format run statistics.
    pub fn stats(&self, stats: &PipelineStats) -> String {
        self.colorize(&stats.summary(), "cyan")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format export result.
    pub fn exported(&self, path: &str, count: usize) -> String {
        self.success(&format!("Exported {} card(s) to {}", count, path))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// One line per card: the Question, or the cloze text for cloze cards
fn format_cards_quiet(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| match c.card_type {
            CardType::Basic => c.question.as_str(),
            CardType::Cloze => c.answer.as_str(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
