//! File-to-text extraction for the supported document kinds.

use crate::errors::SummarizeError;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Plain,
    Markdown,
    Pdf,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self, SummarizeError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Ok(DocumentKind::Plain),
            "md" => Ok(DocumentKind::Markdown),
            "pdf" => Ok(DocumentKind::Pdf),
            _ => Err(SummarizeError::UnsupportedFormat(format!(".{ext}"))),
        }
    }
}

/// Text read from a file, tagged with the kind it was read as.
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: DocumentKind,
    pub text: String,
}

/// One way of pulling the text layer out of a PDF, page by page.
pub trait PdfTextExtractor {
    fn name(&self) -> &'static str;
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, String>;
}

/// Walks the page tree with `lopdf` and extracts each page separately.
pub struct LopdfExtractor;

impl PdfTextExtractor for LopdfExtractor {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, String> {
        let doc = lopdf::Document::load(path).map_err(|e| e.to_string())?;
        let pages = doc
            .get_pages()
            .keys()
            .map(|&number| match doc.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(page = number, error=%e, "page has no extractable text");
                    String::new()
                }
            })
            .collect();
        Ok(pages)
    }
}

/// Whole-document extraction with `pdf-extract`, split on form feeds.
pub struct PdfExtractCrate;

impl PdfTextExtractor for PdfExtractCrate {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, String> {
        let text = pdf_extract::extract_text(path).map_err(|e| e.to_string())?;
        Ok(text.split('\x0C').map(str::to_string).collect())
    }
}

// Both PDF crates panic on some malformed inputs (a page without a MediaBox,
// for one). Contain that to the file being read.
fn run_extractor(extractor: &dyn PdfTextExtractor, path: &Path) -> Result<Vec<String>, String> {
    panic::catch_unwind(AssertUnwindSafe(|| extractor.extract_pages(path))).unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(format!("panicked: {msg}"))
    })
}

fn joined_text(pages: &[String]) -> Option<String> {
    let text = pages.join("\n");
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Runs `primary`; only when it yields no non-whitespace text is
/// `secondary` tried, once.
pub fn extract_pdf_with(
    path: &Path,
    primary: &dyn PdfTextExtractor,
    secondary: &dyn PdfTextExtractor,
) -> Result<String, SummarizeError> {
    let primary_err = match run_extractor(primary, path) {
        Ok(pages) => match joined_text(&pages) {
            Some(text) => return Ok(text),
            None => format!("{} found no text", primary.name()),
        },
        Err(e) => {
            tracing::warn!(extractor = primary.name(), error=%e, path=%path.display(), "pdf extraction failed");
            format!("{}: {e}", primary.name())
        }
    };

    tracing::debug!(extractor = secondary.name(), "trying secondary pdf extractor");
    let secondary_err = match run_extractor(secondary, path) {
        Ok(pages) => match joined_text(&pages) {
            Some(text) => return Ok(text),
            None => format!("{} found no text", secondary.name()),
        },
        Err(e) => {
            tracing::warn!(extractor = secondary.name(), error=%e, path=%path.display(), "pdf extraction failed");
            format!("{}: {e}", secondary.name())
        }
    };

    Err(SummarizeError::Extraction {
        path: path.display().to_string(),
        reason: format!("{primary_err}; {secondary_err}"),
    })
}

pub fn extract_pdf(path: &Path) -> Result<String, SummarizeError> {
    extract_pdf_with(path, &LopdfExtractor, &PdfExtractCrate)
}

pub fn load_document(path: &Path) -> Result<Document, SummarizeError> {
    let kind = DocumentKind::from_path(path)?;
    // Surface a missing file as io, before any pdf parser sees it.
    std::fs::metadata(path)?;
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(path)?,
        DocumentKind::Plain | DocumentKind::Markdown => std::fs::read_to_string(path)?,
    };
    tracing::debug!(path=%path.display(), ?kind, chars = text.len(), "document loaded");
    Ok(Document { kind, text })
}

pub fn extract_text(path: &Path) -> Result<String, SummarizeError> {
    load_document(path).map(|doc| doc.text)
}
