
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::Result;
use crate::embeddings::EmbeddingProvider;
use crate::extractor::Page;
use crate::index::{IndexDocument, IndexStore};
use crate::processor::DocumentProcessor;

/// Progress counters accumulated across an ingest run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub documents: usize,
    pub pages: usize,
    pub chunks: usize,
    pub embedded: usize,
    pub uploaded: usize,
    pub failed: usize,
}

/// Summary of a completed ingest run, written next to the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestManifest {
    pub index_name: String,
    pub document_count: usize,
    pub sources: Vec<String>,
    pub completed_at: String,
}

impl IngestManifest {
    #[inline]
    pub fn new(index_name: String, document_count: usize, sources: Vec<String>) -> Self {
        Self {
            index_name,
            document_count,
            sources,
            completed_at: Utc::now().to_rfc3339(),
        }
    }

    #[inline]
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("failed to serialize manifest: {}", e))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Orchestrates chunking, embedding, and upsert for whole documents.
///
/// Takes already-extracted pages; each document flows through chunk,
/// embed, upsert. The pipeline never mutates a chunk after the processor
/// emits it.
pub struct IngestPipeline<'a> {
    processor: DocumentProcessor,
    embedder: &'a dyn EmbeddingProvider,
    store: &'a mut dyn IndexStore,
    batch_size: usize,
    stats: IngestStats,
}

impl<'a> IngestPipeline<'a> {
    #[inline]
    pub fn new(
        processor: DocumentProcessor,
        embedder: &'a dyn EmbeddingProvider,
        store: &'a mut dyn IndexStore,
        batch_size: usize,
    ) -> Self {
        Self {
            processor,
            embedder,
            store,
            batch_size: batch_size.max(1),
            stats: IngestStats::default(),
        }
    }

    /// Create or update the target index before any uploads.
    #[inline]
    pub fn prepare(&mut self) -> Result<()> {
        self.store.ensure_index(self.embedder.dimension())
    }

    /// Run one document through the pipeline. Returns the number of chunks
    /// that reached the store.
    #[inline]
    pub fn ingest_document(&mut self, source: &str, pages: &[Page]) -> Result<usize> {
        let chunks = self.processor.process(source, pages);

        self.stats.documents += 1;
        self.stats.pages += pages.len();
        self.stats.chunks += chunks.len();

        if chunks.is_empty() {
            debug!("No chunks produced for {}", source);
            return Ok(0);
        }

        let mut uploaded = 0;
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts)?;
            self.stats.embedded += embeddings.len();

            let documents: Vec<IndexDocument> = batch
                .iter()
                .cloned()
                .zip(embeddings)
                .map(|(chunk, embedding)| IndexDocument { chunk, embedding })
                .collect();

            uploaded += self.upsert_with_retry(&documents)?;
        }

        self.stats.uploaded += uploaded;
        info!("Ingested {}: {} of {} chunk(s) stored", source, uploaded, chunks.len());
        Ok(uploaded)
    }

    /// Upsert a batch, then retry just the records the store rejected.
    /// Chunk IDs are stable and upserts idempotent, so resending only the
    /// failures cannot duplicate anything.
    fn upsert_with_retry(&mut self, documents: &[IndexDocument]) -> Result<usize> {
        let outcomes = self.store.upsert(documents)?;

        let failed_keys: HashSet<String> = outcomes
            .iter()
            .filter(|outcome| !outcome.succeeded)
            .map(|outcome| outcome.key.clone())
            .collect();

        if failed_keys.is_empty() {
            return Ok(documents.len());
        }

        warn!(
            "{} of {} upsert(s) failed, retrying those records",
            failed_keys.len(),
            documents.len()
        );

        let retry_batch: Vec<IndexDocument> = documents
            .iter()
            .filter(|document| failed_keys.contains(&document.chunk.id))
            .cloned()
            .collect();

        let retry_outcomes = self.store.upsert(&retry_batch)?;
        let still_failed = retry_outcomes
            .iter()
            .filter(|outcome| !outcome.succeeded)
            .count();

        if still_failed > 0 {
            warn!("{} upsert(s) failed after retry", still_failed);
            self.stats.failed += still_failed;
        }

        Ok(documents.len() - still_failed)
    }

    #[inline]
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    #[inline]
    pub fn into_stats(self) -> IngestStats {
        self.stats
    }
}
