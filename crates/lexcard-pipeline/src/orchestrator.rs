//! Pipeline orchestrator
//!
//! Stages run strictly in sequence:
//!
//! 1. Config validation (fatal)
//! 2. Ingest (fatal)
//! 3. Extraction, or raw-text chunking when no keywords are given
//! 4. Card generation
//! 5. Quality gate and deduplication
//!
//! A failure in stages 3-5 is recorded in `errors` and that stage's output
//! becomes an empty list; the run still returns a complete result.

use crate::{PipelineConfig, PipelineError};
use lexcard_cards::CardGenerator;
use lexcard_domain::{
    Card, ChatModel, Document, DocumentLoader, ExtractedItem, PipelineResult, PipelineStats,
};
use lexcard_extractor::{chunk_to_items, Extractor};
use lexcard_gatekeeper::Gatekeeper;
use lexcard_ingest::{load_documents, FsDocumentLoader};
use lexcard_llm::OpenAiCompatibleProvider;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Configured pipeline, ready to run over a batch of files
///
/// # Examples
///
/// ```no_run
/// use lexcard_pipeline::{Pipeline, PipelineConfig};
///
/// # async fn example() {
/// let config = PipelineConfig::new("https://api.deepseek.com/v1", "sk-...");
/// let result = Pipeline::new(config)
///     .run(&["反垄断法.pdf"], &["垄断协议".to_string()])
///     .await;
///
/// for err in &result.errors {
///     eprintln!("{}", err);
/// }
/// println!("{} cards", result.cards.len());
/// # }
/// ```
pub struct Pipeline<L = FsDocumentLoader> {
    config: PipelineConfig,
    model: Option<Arc<dyn ChatModel>>,
    loader: L,
}

impl Pipeline<FsDocumentLoader> {
    /// Pipeline reading files from disk and calling the configured endpoint
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            model: None,
            loader: FsDocumentLoader::new(),
        }
    }
}

impl<L> Pipeline<L>
where
    L: DocumentLoader,
{
    /// Use `model` instead of an HTTP provider built from the config
    pub fn with_chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Read documents with `loader`
    pub fn with_loader<L2: DocumentLoader>(self, loader: L2) -> Pipeline<L2> {
        Pipeline {
            config: self.config,
            model: self.model,
            loader,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over `paths`
    ///
    /// Never fails: fatal problems come back as a result whose only content
    /// is one message in `errors`.
    pub async fn run<P: AsRef<Path>>(&self, paths: &[P], keywords: &[String]) -> PipelineResult {
        let started = Instant::now();
        let mut result = match self.run_stages(paths, keywords).await {
            Ok(result) => result,
            Err(e) => {
                error!("{}", e);
                PipelineResult::fatal(e.to_string())
            }
        };
        result.stats.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!("Pipeline finished in {}ms", result.stats.elapsed_ms);
        result
    }

    async fn run_stages<P: AsRef<Path>>(
        &self,
        paths: &[P],
        keywords: &[String],
    ) -> Result<PipelineResult, PipelineError> {
        self.config.validate()?;
        let model = self.chat_model()?;

        let documents = load_documents(&self.loader, paths)
            .map_err(|e| PipelineError::Ingest(e.to_string()))?;
        info!("Loaded {} documents", documents.len());

        Ok(self.process(&model, documents, keywords).await)
    }

    /// Stages 3-5 over loaded documents; never fails
    async fn process(
        &self,
        model: &Arc<dyn ChatModel>,
        documents: Vec<Document>,
        keywords: &[String],
    ) -> PipelineResult {
        let mut errors = Vec::new();
        let mut stats = PipelineStats {
            documents_loaded: documents.len(),
            ..PipelineStats::default()
        };

        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        let (items, chunks) =
            run_stage(&mut errors, self.extract(model, &documents, &keywords)).await;
        stats.chunks_processed = chunks;
        stats.items_extracted = items.len();

        let generated = run_stage(&mut errors, self.generate(model, &items)).await;
        stats.cards_generated = generated.len();

        let gatekeeper = Gatekeeper::new(self.config.gate_config());
        let report = run_stage(&mut errors, async {
            gatekeeper.review(generated).map_err(PipelineError::from)
        })
        .await;
        stats.dropped_low_quality = report.dropped_low_quality;
        stats.dropped_duplicates = report.dropped_duplicates;
        stats.cards_kept = report.cards.len();

        PipelineResult {
            documents,
            extracted_items: items,
            cards: report.cards,
            errors,
            stats,
        }
    }

    fn chat_model(&self) -> Result<Arc<dyn ChatModel>, PipelineError> {
        if let Some(model) = &self.model {
            return Ok(Arc::clone(model));
        }
        let provider = OpenAiCompatibleProvider::new(&self.config.api_base, &self.config.api_key)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Ok(Arc::new(provider))
    }

    async fn extract(
        &self,
        model: &Arc<dyn ChatModel>,
        documents: &[Document],
        keywords: &[String],
    ) -> Result<(Vec<ExtractedItem>, usize), PipelineError> {
        let extraction = if keywords.is_empty() {
            chunk_to_items(documents, &self.config.extractor).map_err(PipelineError::Chunking)?
        } else {
            Extractor::new(
                Arc::clone(model),
                self.config.extract_model.clone(),
                self.config.extractor.clone(),
            )
            .extract(documents, keywords)
            .await
            .map_err(PipelineError::Extraction)?
        };
        Ok((extraction.items, extraction.chunks_processed))
    }

    async fn generate(
        &self,
        model: &Arc<dyn ChatModel>,
        items: &[ExtractedItem],
    ) -> Result<Vec<Card>, PipelineError> {
        let generation = CardGenerator::new(
            Arc::clone(model),
            self.config.card_model.clone(),
            self.config.generator_config(),
        )
        .generate(items)
        .await?;
        Ok(generation.cards)
    }
}

/// Await a stage whose failure degrades the run instead of ending it
///
/// The error message goes into `errors` and the stage yields its empty
/// output, so later stages still run.
async fn run_stage<T, F>(errors: &mut Vec<String>, stage: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, PipelineError>>,
{
    match stage.await {
        Ok(output) => output,
        Err(e) => {
            warn!("{}", e);
            errors.push(e.to_string());
            T::default()
        }
    }
}

/// Run the whole pipeline over `paths` with the given settings
///
/// Endpoint, model names, thresholds and the card limit all come from
/// `config`; see [`Pipeline`] to swap the model or the document loader.
pub async fn run_pipeline<P: AsRef<Path>>(
    paths: &[P],
    keywords: &[String],
    config: PipelineConfig,
) -> PipelineResult {
    Pipeline::new(config).run(paths, keywords).await
}
