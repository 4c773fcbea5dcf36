//! Card review: quality gate followed by deduplication

use crate::dedup::find_duplicate;
use crate::quality::{check_quality, QualityIssue};
use crate::{GateConfig, GatekeeperError};
use lexcard_domain::Card;
use tracing::{debug, info};

/// Why a card did not survive review
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Question or Answer was blank
    MissingText {
        /// Position in the reviewed list
        index: usize,
    },

    /// Quality score below the minimum
    LowQuality {
        /// Position in the reviewed list
        index: usize,
        /// The card's score
        quality: f64,
        /// The configured minimum
        min_quality: f64,
    },

    /// Near-duplicate of a card kept earlier
    Duplicate {
        /// Position in the reviewed list
        index: usize,
        /// Position of the kept card in the output list
        kept_index: usize,
        /// Similarity that triggered the drop
        similarity: f64,
    },
}

/// Outcome of one review
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateReport {
    /// Surviving cards in input order
    pub cards: Vec<Card>,

    /// Cards removed by the quality gate (including blank ones)
    pub dropped_low_quality: usize,

    /// Cards removed as near-duplicates
    pub dropped_duplicates: usize,

    /// One entry per removed card, in input order
    pub reasons: Vec<RejectionReason>,
}

/// Reviews generated cards before export
pub struct Gatekeeper {
    config: GateConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(GateConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run the quality gate, then deduplicate the survivors
    ///
    /// Cards must arrive in their final (document, item, card) order; the
    /// earliest of a group of near-duplicates is the one kept.
    pub fn review(&self, cards: Vec<Card>) -> Result<GateReport, GatekeeperError> {
        self.config.validate().map_err(GatekeeperError::Config)?;

        let total = cards.len();
        let mut report = GateReport::default();

        for (index, card) in cards.into_iter().enumerate() {
            match check_quality(&card, self.config.min_quality) {
                Some(QualityIssue::MissingText) => {
                    report.dropped_low_quality += 1;
                    report.reasons.push(RejectionReason::MissingText { index });
                    continue;
                }
                Some(QualityIssue::BelowMinimum { quality, min_quality }) => {
                    report.dropped_low_quality += 1;
                    report.reasons.push(RejectionReason::LowQuality {
                        index,
                        quality,
                        min_quality,
                    });
                    continue;
                }
                None => {}
            }

            if let Some((kept_index, similarity)) =
                find_duplicate(&card, &report.cards, self.config.dedup_threshold)
            {
                debug!(index, kept_index, similarity, "Dropping near-duplicate card");
                report.dropped_duplicates += 1;
                report.reasons.push(RejectionReason::Duplicate {
                    index,
                    kept_index,
                    similarity,
                });
                continue;
            }

            report.cards.push(card);
        }

        info!(
            total,
            kept = report.cards.len(),
            low_quality = report.dropped_low_quality,
            duplicates = report.dropped_duplicates,
            "Card review complete"
        );

        Ok(report)
    }
}
