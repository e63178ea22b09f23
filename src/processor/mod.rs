#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunking::{ChunkingConfig, chunk_text};
use crate::config::ConfigError;
use crate::extractor::Page;

/// A chunk of document text with its provenance, ready for embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Deterministic key, `{source_stem}_p{page}_c{chunk}`. Stable across
    /// re-runs with identical input, so re-ingesting overwrites in place.
    pub id: String,
    /// Whole sentences joined by single spaces.
    pub content: String,
    /// Human-readable title derived from the source file name.
    pub title: String,
    /// Source file name, extension included.
    pub source: String,
    pub page_number: u32,
    pub chunk_index: u32,
}

/// Turns extracted pages into provenance-tagged chunks.
pub struct DocumentProcessor {
    chunking: ChunkingConfig,
}

impl DocumentProcessor {
    /// Rejects degenerate chunking parameters up front; the chunker itself
    /// is total once configured.
    #[inline]
    pub fn new(chunking: ChunkingConfig) -> Result<Self, ConfigError> {
        chunking.validate()?;
        Ok(Self { chunking })
    }

    /// Chunk every page of a document. Chunk indices restart at 0 on each
    /// page; output order follows page order.
    #[inline]
    pub fn process(&self, source: &str, pages: &[Page]) -> Vec<DocumentChunk> {
        let stem = source_stem(source);
        let title = title_from_stem(stem);

        let mut chunks = Vec::new();
        for page in pages {
            for (chunk_index, content) in
                chunk_text(&page.text, &self.chunking).into_iter().enumerate()
            {
                chunks.push(DocumentChunk {
                    id: format!("{}_p{}_c{}", stem, page.number, chunk_index),
                    content,
                    title: title.clone(),
                    source: source.to_string(),
                    page_number: page.number,
                    chunk_index: chunk_index as u32,
                });
            }
        }

        debug!(
            "Produced {} chunk(s) from {} page(s) of {}",
            chunks.len(),
            pages.len(),
            source
        );
        chunks
    }
}

/// File name without its final extension.
fn source_stem(source: &str) -> &str {
    source.rsplit_once('.').map_or(source, |(stem, _)| stem)
}

/// "hr_leave_policy" becomes "Hr Leave Policy".
fn title_from_stem(stem: &str) -> String {
    stem.split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
