
use std::collections::BTreeMap;

use super::{IndexDocument, IndexStore, UpsertOutcome};
use crate::Result;

/// In-process index store for driving the pipeline without a live search
/// service.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    documents: BTreeMap<String, IndexDocument>,
    dimension: Option<usize>,
}

impl MemoryIndex {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&IndexDocument> {
        self.documents.get(key)
    }

    /// Keys in sorted order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

impl IndexStore for MemoryIndex {
    #[inline]
    fn ensure_index(&mut self, dimension: usize) -> Result<()> {
        self.dimension = Some(dimension);
        Ok(())
    }

    #[inline]
    fn upsert(&mut self, documents: &[IndexDocument]) -> Result<Vec<UpsertOutcome>> {
        let mut outcomes = Vec::with_capacity(documents.len());

        for document in documents {
            // Mirror a real index: reject vectors that do not match the
            // declared dimension instead of storing them.
            let dimension_ok = self
                .dimension
                .is_none_or(|dimension| document.embedding.len() == dimension);

            if dimension_ok {
                self.documents
                    .insert(document.chunk.id.clone(), document.clone());
            }

            outcomes.push(UpsertOutcome {
                key: document.chunk.id.clone(),
                succeeded: dimension_ok,
                status_code: Some(if dimension_ok { 200 } else { 400 }),
            });
        }

        Ok(outcomes)
    }
}
