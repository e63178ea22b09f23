
use std::path::Path;

use tracing::debug;

use crate::{IngestError, Result};

/// One page of extracted document text. Page numbers are 1-based; pages
/// without extractable text are never represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub text: String,
}

/// Extract the text of each page of a PDF file.
///
/// Pages that yield no text (scanned images, separators) are omitted
/// rather than returned empty.
#[inline]
pub fn extract_pdf_pages(path: &Path) -> Result<Vec<Page>> {
    debug!("Extracting text from {}", path.display());

    let raw_pages = pdf_extract::extract_text_by_pages(path).map_err(|e| {
        IngestError::Extraction(format!("failed to read {}: {}", path.display(), e))
    })?;

    let pages = pages_from_raw(raw_pages);
    debug!(
        "Extracted {} non-empty page(s) from {}",
        pages.len(),
        path.display()
    );
    Ok(pages)
}

/// Number pages 1-based and drop the ones with no extractable text.
fn pages_from_raw(raw_pages: Vec<String>) -> Vec<Page> {
    raw_pages
        .into_iter()
        .enumerate()
        .filter_map(|(i, text)| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(Page {
                number: (i + 1) as u32,
                text: trimmed.to_string(),
            })
        })
        .collect()
}
