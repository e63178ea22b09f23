// Index module
// Stores embedded chunks keyed by their deterministic IDs

pub mod memory;
pub mod search;

pub use memory::MemoryIndex;
pub use search::SearchIndexClient;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::processor::DocumentChunk;

/// A fully-populated chunk record ready for upsert into a search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(flatten)]
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}

/// Per-record result of a batch upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub key: String,
    pub succeeded: bool,
    pub status_code: Option<u16>,
}

/// A store that persists embedded chunks.
///
/// Upserts are keyed by chunk ID: re-sending a record with the same ID
/// overwrites the previous version, so whole-document re-ingestion is
/// idempotent.
pub trait IndexStore {
    /// Create the index if needed, with vector fields sized to `dimension`.
    /// Safe to call repeatedly.
    fn ensure_index(&mut self, dimension: usize) -> Result<()>;

    /// Upsert a batch of documents. Returns one outcome per input record,
    /// in input order.
    fn upsert(&mut self, documents: &[IndexDocument]) -> Result<Vec<UpsertOutcome>>;
}
