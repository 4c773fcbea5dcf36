//! `.apkg` package exporter

use crate::collection::Collection;
use crate::error::{ExportError, Result};
use lexcard_domain::{Card, PackageExporter};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// Deck id of every exported deck
pub const DECK_ID: i64 = 2059400110;

/// Writes cards into `<output_dir>/<deck_name>.apkg`
#[derive(Debug, Clone)]
pub struct AnkiExporter {
    output_dir: PathBuf,
}

impl AnkiExporter {
    /// Create an exporter writing into `output_dir` (created on demand)
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory packages are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the package for `deck_name` is written to
    pub fn package_path(&self, deck_name: &str) -> Result<PathBuf> {
        let trimmed = deck_name.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(ExportError::InvalidDeckName(deck_name.to_string()));
        }
        Ok(self.output_dir.join(format!("{}.apkg", trimmed)))
    }

    fn write_package(&self, deck_name: &str, cards: &[Card]) -> Result<PathBuf> {
        let package_path = self.package_path(deck_name)?;
        std::fs::create_dir_all(&self.output_dir)?;

        let collection_path = self.output_dir.join(format!(".{}.anki2.tmp", deck_name.trim()));
        if collection_path.exists() {
            std::fs::remove_file(&collection_path)?;
        }

        let result = self.write_archive(&collection_path, &package_path, deck_name.trim(), cards);
        // Best effort: the temporary collection is never part of the output.
        let _ = std::fs::remove_file(&collection_path);
        result?;

        Ok(package_path)
    }

    fn write_archive(
        &self,
        collection_path: &Path,
        package_path: &Path,
        deck_name: &str,
        cards: &[Card],
    ) -> Result<()> {
        let mut collection = Collection::create(collection_path, DECK_ID, deck_name, now_ms())?;
        for card in cards {
            collection.add_card(card)?;
        }
        let (notes, card_count) = (collection.note_count(), collection.card_count());
        collection.close()?;

        let db_bytes = std::fs::read(collection_path)?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut zip = zip::ZipWriter::new(File::create(package_path)?);
        zip.start_file("collection.anki2", options)?;
        zip.write_all(&db_bytes)?;
        zip.start_file("media", options)?;
        zip.write_all(b"{}")?;
        zip.finish()?;

        info!(
            path = %package_path.display(),
            notes,
            cards = card_count,
            "Package written"
        );
        Ok(())
    }
}

impl PackageExporter for AnkiExporter {
    type Error = ExportError;

    fn export(&self, deck_name: &str, cards: &[Card]) -> Result<PathBuf> {
        self.write_package(deck_name, cards)
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
