//! Per-format text extraction
//!
//! Each reader returns the text plus a page count (0 when the format has
//! no pages).

use std::any::Any;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};

/// Maximum decompressed size of `word/document.xml` (zip-bomb guard)
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// File formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Plain text, read as lossy UTF-8
    Text,
    /// PDF
    Pdf,
    /// Office Open XML word document
    Docx,
}

impl FileFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(FileFormat::Text),
            "pdf" => Some(FileFormat::Pdf),
            "docx" => Some(FileFormat::Docx),
            _ => None,
        }
    }
}

pub(crate) fn read_text(bytes: &[u8]) -> (String, u32) {
    (String::from_utf8_lossy(bytes).into_owned(), 0)
}

/// Text of every page, joined by newlines
///
/// pdf-extract panics on some structurally valid but unusual files (missing
/// `MediaBox`, unknown font encodings); those panics come back as errors.
pub(crate) fn read_pdf(bytes: &[u8]) -> Result<(String, u32), String> {
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|payload| format!("PDF parser panicked: {}", panic_message(payload.as_ref())))?
    .map_err(|e| e.to_string())?;
    let page_count = u32::try_from(pages.len()).unwrap_or(u32::MAX);
    Ok((pages.join("\n"), page_count))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

pub(crate) fn read_docx(bytes: &[u8]) -> Result<(String, u32), String> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|_| "word/document.xml not found".to_string())?;

    let mut xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| e.to_string())?;
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err("word/document.xml exceeds size limit".to_string());
    }

    Ok((docx_paragraphs(&xml)?.join("\n"), 0))
}

/// Text of every `w:p` paragraph, built from its `w:t` runs
fn docx_paragraphs(xml: &[u8]) -> Result<Vec<String>, String> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"p" => paragraphs.push(String::new()),
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }
    Ok(paragraphs)
}

/// Minimal PDF with a correct xref table; `page` and `font` are the
/// page and font dictionaries.
#[cfg(test)]
pub(crate) fn build_pdf(page: &str, font: &str) -> Vec<u8> {
    let content = "BT /F1 12 Tf 72 712 Td (Hello) Tj ET";
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        page.to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
        font.to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", idx + 1, body));
    }
    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    pdf.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"";

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("PDF"), Some(FileFormat::Pdf));
        assert_eq!(FileFormat::from_extension("Docx"), Some(FileFormat::Docx));
        assert_eq!(FileFormat::from_extension("txt"), Some(FileFormat::Text));
        assert_eq!(FileFormat::from_extension("doc"), None);
    }

    #[test]
    fn test_paragraphs_join_runs() {
        let xml = format!(
            "<w:document {NS}><w:body>\
             <w:p><w:r><w:t>第一条 </w:t></w:r><w:r><w:t>经营者</w:t></w:r></w:p>\
             <w:p></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">a &amp; b</w:t></w:r></w:p>\
             </w:body></w:document>"
        );
        let paragraphs = docx_paragraphs(xml.as_bytes()).unwrap();
        assert_eq!(paragraphs, vec!["第一条 经营者", "", "a & b"]);
    }

    #[test]
    fn test_lossy_text() {
        let (text, pages) = read_text(b"ok\xffok");
        assert_eq!(text, "ok\u{fffd}ok");
        assert_eq!(pages, 0);
    }

    const PAGE_WITHOUT_MEDIABOX: &str =
        "<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>";
    const PAGE: &str = "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                        /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>";
    const HELVETICA: &str = "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>";

    #[test]
    fn test_pdf_without_mediabox_is_an_error() {
        let bytes = build_pdf(PAGE_WITHOUT_MEDIABOX, HELVETICA);
        assert!(read_pdf(&bytes).is_err());
    }

    #[test]
    fn test_pdf_with_unknown_encoding_is_an_error() {
        let font = "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /BogusEncoding >>";
        assert!(read_pdf(&build_pdf(PAGE, font)).is_err());
    }

    #[test]
    fn test_type0_font_without_descendants_is_an_error() {
        let font = "<< /Type /Font /Subtype /Type0 /BaseFont /Foo /Encoding /Identity-H >>";
        assert!(read_pdf(&build_pdf(PAGE, font)).is_err());
    }

    #[test]
    fn test_panic_message_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("MediaBox"));
        let borrowed: Box<dyn Any + Send> = Box::new("Font");
        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(owned.as_ref()), "MediaBox");
        assert_eq!(panic_message(borrowed.as_ref()), "Font");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    #[test]
    fn test_invalid_archives() {
        assert!(read_docx(b"not a zip").is_err());
        assert!(read_pdf(b"not a pdf").is_err());
    }
}
