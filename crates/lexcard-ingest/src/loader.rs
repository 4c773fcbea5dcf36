//! Filesystem document loader

use crate::error::{IngestError, Result};
use crate::format::{self, FileFormat};
use lexcard_domain::{Document, DocumentLoader, LoadedText};
use std::path::Path;
use tracing::{debug, info};

/// Reads `.txt`, `.pdf` and `.docx` files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentLoader;

impl FsDocumentLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self
    }

    fn format_of(path: &Path) -> Option<FileFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(FileFormat::from_extension)
    }
}

impl DocumentLoader for FsDocumentLoader {
    type Error = IngestError;

    fn supports(&self, path: &Path) -> bool {
        Self::format_of(path).is_some()
    }

    fn load(&self, path: &Path) -> Result<LoadedText> {
        let format =
            Self::format_of(path).ok_or_else(|| IngestError::Unsupported(path.to_path_buf()))?;
        let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (text, page_count) = match format {
            FileFormat::Text => format::read_text(&bytes),
            FileFormat::Pdf => format::read_pdf(&bytes).map_err(|message| IngestError::Pdf {
                path: path.to_path_buf(),
                message,
            })?,
            FileFormat::Docx => format::read_docx(&bytes).map_err(|message| IngestError::Docx {
                path: path.to_path_buf(),
                message,
            })?,
        };

        debug!(path = %path.display(), chars = text.chars().count(), page_count, "Loaded file");
        Ok(LoadedText { text, page_count })
    }
}

/// Load every supported file, skipping the rest
///
/// Documents come back in the order of `paths`. The first read failure
/// aborts the whole load.
pub fn load_documents<L, P>(loader: &L, paths: &[P]) -> std::result::Result<Vec<Document>, L::Error>
where
    L: DocumentLoader + ?Sized,
    P: AsRef<Path>,
{
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        if !loader.supports(path) {
            info!(path = %path.display(), "Skipping unsupported file");
            continue;
        }
        let loaded = loader.load(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(Document::new(
            name,
            path.display().to_string(),
            loaded.text,
            loaded.page_count,
        ));
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn minimal_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            let body: String = paragraphs
                .iter()
                .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
                .collect();
            let xml = format!(
                "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
                body
            );
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_load_txt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("反垄断法.TXT");
        std::fs::write(&path, "第一条 经营者不得滥用市场支配地位。").unwrap();

        let loaded = FsDocumentLoader::new().load(&path).unwrap();

        assert_eq!(loaded.text, "第一条 经营者不得滥用市场支配地位。");
        assert_eq!(loaded.page_count, 0);
    }

    #[test]
    fn test_load_docx() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("law.docx");
        std::fs::write(&path, minimal_docx(&["第一条", "第二条"])).unwrap();

        let loaded = FsDocumentLoader::new().load(&path).unwrap();

        assert_eq!(loaded.text, "第一条\n第二条");
        assert_eq!(loaded.page_count, 0);
    }

    #[test]
    fn test_empty_txt_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let loaded = FsDocumentLoader::new().load(&path).unwrap();
        assert_eq!(loaded, LoadedText::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FsDocumentLoader::new()
            .load(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    #[test]
    fn test_corrupt_docx_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"not a zip").unwrap();

        let err = FsDocumentLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, IngestError::Docx { .. }));
        assert!(err.to_string().contains("broken.docx"));
    }

    #[test]
    fn test_pdf_parser_panic_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_mediabox.pdf");
        let pdf = format::build_pdf(
            "<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>",
        );
        std::fs::write(&path, pdf).unwrap();

        let err = FsDocumentLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, IngestError::Pdf { .. }));
        assert!(err.to_string().contains("no_mediabox.pdf"));
    }

    #[test]
    fn test_load_documents_skips_unsupported() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("notes.md");
        let c = dir.path().join("c.txt");
        std::fs::write(&a, "A").unwrap();
        std::fs::write(&b, "B").unwrap();
        std::fs::write(&c, "C").unwrap();

        let docs = load_documents(&FsDocumentLoader::new(), &[&a, &b, &c]).unwrap();

        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "c.txt"]);
        assert_eq!(docs[0].text, "A");
        assert_eq!(docs[0].path, a.display().to_string());
    }

    #[test]
    fn test_load_documents_fails_on_unreadable() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.pdf");
        assert!(load_documents(&FsDocumentLoader::new(), &[missing]).is_err());
    }
}
