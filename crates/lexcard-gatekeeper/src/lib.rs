//! Lexcard Gatekeeper
//!
//! Filters generated cards before export.
//!
//! The Gatekeeper provides:
//! - A quality gate (non-blank Question and Answer, `quality >= min_quality`)
//! - Token-set fuzzy similarity between texts
//! - Greedy first-seen-wins deduplication over Questions and Answers
//!
//! # Examples
//!
//! ```
//! use lexcard_domain::Card;
//! use lexcard_gatekeeper::{GateConfig, Gatekeeper};
//!
//! let gatekeeper = Gatekeeper::new(GateConfig::default());
//! let report = gatekeeper
//!     .review(vec![
//!         Card::basic("什么是垄断协议", "排除、限制竞争的协议").with_quality(0.9),
//!         Card::basic("什么是垄断协议", "排除、限制竞争的协议").with_quality(0.8),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(report.cards.len(), 1);
//! assert_eq!(report.dropped_duplicates, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod dedup;
mod error;
mod gatekeeper;
mod quality;
mod similarity;

pub use config::{GateConfig, DEDUP_THRESHOLD_RANGE, MIN_QUALITY_RANGE};
pub use dedup::{card_similarity, deduplicate, find_duplicate};
pub use error::GatekeeperError;
pub use gatekeeper::{GateReport, Gatekeeper, RejectionReason};
pub use quality::{check_quality, quality_gate, QualityIssue};
pub use similarity::{indel_distance, indel_ratio, token_set_ratio};
