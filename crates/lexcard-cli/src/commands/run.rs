//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexcard_anki::AnkiExporter;
use lexcard_domain::{Card, PackageExporter, PipelineResult};
use lexcard_pipeline::{Pipeline, PipelineConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pipeline_config = build_pipeline_config(&args, config)?;

    info!(files = args.files.len(), keywords = args.keywords.len(), "Starting run");
    let result = Pipeline::new(pipeline_config)
        .run(&args.files, &args.keywords)
        .await;

    println!("{}", formatter.format_result(&result)?);
    report(&result, formatter);

    if is_fatal(&result) {
        return Err(CliError::Pipeline(result.errors.join("; ")));
    }

    if args.export {
        let deck = args.deck.unwrap_or_else(default_deck_name);
        let dir = args
            .export_dir
            .unwrap_or_else(|| config.settings.export_dir.clone());
        export_cards(&result.cards, &deck, &dir, formatter)?;
    }

    Ok(())
}

/// Pipeline settings: profile and file settings, then command-line overrides
pub fn build_pipeline_config(args: &RunArgs, config: &Config) -> Result<PipelineConfig> {
    let api_key = args.api_key.as_deref().unwrap_or_default();
    let mut pipeline = config.pipeline_config(api_key)?;

    if let Some(min_quality) = args.min_quality {
        pipeline.min_quality = min_quality;
    }
    if let Some(threshold) = args.dedup_threshold {
        pipeline.dedup_threshold = threshold;
    }
    if let Some(max_cards) = args.max_cards {
        pipeline.max_cards_per_item = max_cards;
    }
    Ok(pipeline)
}

/// Write the cards as an Anki package
///
/// Returns `None` without touching the filesystem when there is nothing to
/// export.
pub fn export_cards(
    cards: &[Card],
    deck: &str,
    dir: &Path,
    formatter: &Formatter,
) -> Result<Option<PathBuf>> {
    if cards.is_empty() {
        eprintln!("{}", formatter.warning("No cards to export"));
        return Ok(None);
    }

    let path = AnkiExporter::new(dir).export(deck, cards)?;
    eprintln!(
        "{}",
        formatter.exported(&path.display().to_string(), cards.len())
    );
    Ok(Some(path))
}

fn report(result: &PipelineResult, formatter: &Formatter) {
    for err in &result.errors {
        eprintln!("{}", formatter.error(err));
    }
    if formatter.format() == OutputFormat::Table {
        eprintln!("{}", formatter.stats(&result.stats));
    }
}

/// A fatal run loads nothing and reports why
fn is_fatal(result: &PipelineResult) -> bool {
    result.documents.is_empty() && result.has_errors()
}

fn default_deck_name() -> String {
    chrono::Local::now().format("Law-Notes-%Y%m%d-%H%M").to_string()
}
