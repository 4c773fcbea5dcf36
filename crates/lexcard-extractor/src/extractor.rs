//! Core Extractor implementation

use crate::chunking::{chunk_documents_to_items, TextChunker};
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{parse_items_response, ItemRejection, ItemValidator};
use crate::prompt::extract_request;
use crate::recovery::ResponseRecovery;
use crate::semantic::SemanticExtractor;
use lexcard_domain::{ChatModel, Document, ExtractedItem};
use lexcard_llm::chat_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Items produced by one extraction run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    /// Validated items in (document, chunk, item) order
    pub items: Vec<ExtractedItem>,

    /// Windows sent to the model, or raw-text windows produced
    pub chunks_processed: usize,

    /// Items dropped by the validator
    pub rejected: Vec<ItemRejection>,
}

/// The Extractor turns documents into structured legal items
///
/// With keywords, every window of every document is sent to the model and
/// the replies are recovered and validated. Without keywords no model call
/// is made: each raw-text window becomes a `RawText` item.
pub struct Extractor<M: ?Sized> {
    model: Arc<M>,
    model_name: String,
    config: ExtractorConfig,
    recovery: ResponseRecovery,
}

impl<M> Extractor<M>
where
    M: ChatModel + ?Sized + 'static,
{
    /// Create a new Extractor
    pub fn new(model: Arc<M>, model_name: impl Into<String>, config: ExtractorConfig) -> Self {
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
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract items from documents
    ///
    /// Empty `keywords` selects the raw-text fallback. Model failures and
    /// malformed replies reduce the affected window to zero items.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Config`] if the configuration is invalid.
    pub async fn extract(
        &self,
        documents: &[Document],
        keywords: &[String],
    ) -> Result<ExtractionResult, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;

        if keywords.is_empty() {
            info!("No keywords given, producing raw-text items");
            return chunk_to_items(documents, &self.config);
        }

        let mut result = self.extract_with_keywords(documents, keywords).await?;

        if self.config.semantic.should_run(result.items.len()) {
            info!(
                "Keyword extraction found {} items, running semantic pass",
                result.items.len()
            );
            let semantic = SemanticExtractor::new(
                Arc::clone(&self.model),
                self.model_name.clone(),
                self.config.semantic.clone(),
            )
            .with_temperature(self.config.temperature)
            .with_max_concurrency(self.config.max_concurrency)
            .with_recovery(self.recovery.clone())
            .extract(documents, keywords)
            .await;

            result.items.extend(semantic.items);
            result.rejected.extend(semantic.rejected);
            result.chunks_processed += semantic.chunks_processed;
        }

        Ok(result)
    }

    /// Keyword-grounded extraction over every window of every document
    async fn extract_with_keywords(
        &self,
        documents: &[Document],
        keywords: &[String],
    ) -> Result<ExtractionResult, ExtractorError> {
        let chunker = TextChunker::for_extraction(&self.config)?;

        let mut owners = Vec::new();
        let mut requests = Vec::new();
        for doc in documents {
            let chunks = chunker.chunk(&doc.text);
            debug!("Document '{}' split into {} chunks", doc.name, chunks.len());
            for chunk in chunks {
                if chunk.trim().is_empty() {
                    continue;
                }
                owners.push(doc.name.as_str());
                requests.push(extract_request(
                    chunk,
                    keywords,
                    &self.model_name,
                    self.config.temperature,
                ));
            }
        }

        info!(
            "Extracting from {} chunks across {} documents",
            requests.len(),
            documents.len()
        );

        let replies = chat_all(Arc::clone(&self.model), requests, self.config.max_concurrency).await;

        let validator = ItemValidator::strict();
        let mut result = ExtractionResult {
            chunks_processed: replies.len(),
            ..ExtractionResult::default()
        };
        for (idx, (doc_name, reply)) in owners.into_iter().zip(replies).enumerate() {
            let reply = reply.unwrap_or_default();
            if reply.trim().is_empty() {
                warn!("Chunk {} of '{}' got an empty reply", idx + 1, doc_name);
                continue;
            }
            debug!("Chunk {} reply length: {} chars", idx + 1, reply.len());

            let parsed = parse_items_response(&reply, &self.recovery, &validator, doc_name);
            if !parsed.rejected.is_empty() {
                warn!(
                    "Chunk {} of '{}': dropped {} malformed items",
                    idx + 1,
                    doc_name,
                    parsed.rejected.len()
                );
            }
            result.items.extend(parsed.items);
            result.rejected.extend(parsed.rejected);
        }

        info!(
            "Extraction complete: {} items, {} rejected",
            result.items.len(),
            result.rejected.len()
        );
        Ok(result)
    }
}

/// Keyword-free fallback: one `RawText` item per raw-text window
///
/// # Errors
///
/// Returns [`ExtractorError::InvalidChunking`] if the raw-text window is
/// misconfigured.
pub fn chunk_to_items(
    documents: &[Document],
    config: &ExtractorConfig,
) -> Result<ExtractionResult, ExtractorError> {
    let chunker = TextChunker::for_raw_text(config)?;
    let items = chunk_documents_to_items(documents, &chunker);
    info!("Produced {} raw-text items", items.len());

    Ok(ExtractionResult {
        chunks_processed: items.len(),
        items,
        rejected: Vec::new(),
    })
}
